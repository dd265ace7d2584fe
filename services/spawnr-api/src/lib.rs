pub mod app;
pub mod config;
pub mod error;
pub mod features;
pub mod implementations;
pub mod services;
pub mod utilities;
