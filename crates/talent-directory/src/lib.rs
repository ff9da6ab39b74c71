pub mod config;
pub mod error;
pub mod talents;
pub mod telemetry;
