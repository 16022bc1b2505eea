//! Parsing and validation of `rowfit.toml` legalizer configuration files.
//!
//! This crate reads the configuration file and produces a strongly-typed
//! [`RowfitConfig`] whose [`LegalizerConfig`] section carries the knobs the
//! legalization engine consumes (seed, displacement limit, move cap, routing
//! blockages, pin spacing, target utilization).

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_from_str, CONFIG_FILE_NAME};
pub use types::*;
