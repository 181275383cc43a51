pub mod config;
pub mod delegation;
pub mod error;
pub mod import;
pub mod telemetry;
