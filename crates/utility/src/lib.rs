pub mod get_optional_env_value;
pub mod shutdown_signal;
