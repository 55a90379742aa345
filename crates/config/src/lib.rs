// Configuration loading

pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{Settings, DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS, ENV_TIMEOUT_SECS, ENV_URI};
