//! Parsing and validation of `xbit.toml` tool configuration files.
//!
//! The configuration supplies defaults for the command-line tools: which
//! family and geometry file to use, how to frame written bitstreams, and
//! package options such as a COR0 override.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{discover_config, load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
