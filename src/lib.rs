//! Runtime configuration service for a multi-credential chat gateway.

pub mod admin;
pub mod config;
pub mod http;
pub mod rotation;

pub use config::{ConfigError, ConfigInput, ConfigManager, ConfigRecord, ConfigStore, UpdateOutcome};
pub use http::HttpServer;
pub use rotation::SessionRotor;
