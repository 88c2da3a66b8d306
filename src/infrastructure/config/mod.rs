//! Infrastructure configuration modules.

pub mod allocation;
pub mod logging;
pub mod settings;

pub use settings::{Config, DEFAULT_CONFIG_PATH};
