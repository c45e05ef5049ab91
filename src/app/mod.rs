pub mod config;

pub use config::{AppConfig, InferenceConfig, LoggingConfig, UIConfig};
