//! Configuration module for Sumi-Links
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so running without a file
//! behaves exactly like an empty one.
//!
//! # Example
//!
//! ```no_run
//! use sumi_links::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sumi-links.toml")).unwrap();
//! println!("Requests time out after {}s", config.fetcher.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetcherConfig, DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENTS};

// Re-export parser functions
pub use parser::{load_config, parse_config};
