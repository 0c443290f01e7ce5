pub mod config;
pub mod error;
pub mod session;
pub mod telemetry;
pub mod workflows;
