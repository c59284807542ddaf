//! Configuration management for the story terminal.
//!
//! Settings resolve from built-in defaults, then the TOML config file, then
//! command line arguments and environment variables.

mod config;

pub use config::*;
