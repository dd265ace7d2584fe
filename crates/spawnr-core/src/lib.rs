pub mod constants;
pub mod determiners;
pub mod error;
pub mod formatters;
pub mod job_template;
pub mod models;
pub mod schemas;
