//! Core types for the swi-hle firmware call layer
//!
//! This crate provides the error types, configuration, and logging
//! infrastructure shared by the memory and firmware call crates.

pub mod config;
pub mod error;
pub mod logging;

pub use config::Config;
pub use error::{ConfigError, DecompressError, HleError, MemoryError, Result};
