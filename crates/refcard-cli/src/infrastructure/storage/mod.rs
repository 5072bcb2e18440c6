//! Storage infrastructure: configuration and catalog files.
//!
//! This module provides a thin adapter between the application and the
//! file system:
//!
//! - `config` reads and writes the TOML configuration file from the
//!   platform-appropriate directory, with defaults on first run.
//! - `catalog` reads the TOML catalog of commands, devices and hit-boxes.
//!
//! Keeping storage concerns here means the application layer only ever sees
//! parsed values, never paths.

pub mod catalog;
pub mod config;
