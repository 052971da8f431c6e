pub mod config;
pub mod telemetry;

pub use config::Config;
