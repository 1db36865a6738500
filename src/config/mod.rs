//! Configuration module for the extractor
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! A configuration file is optional: [`Config::default`] describes a complete,
//! valid setup and command-line flags override individual values.
//!
//! # Example
//!
//! ```no_run
//! use bandcamp_extractor::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("extractor.toml")).unwrap();
//! println!("Workers: {}", config.extractor.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, ExtractorConfig, OutputConfig, PlatformBackend, PlatformConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
