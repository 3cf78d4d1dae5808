//! Logging utilities.
//!
//! The library only talks to the `log` facade; this module installs the
//! `env_logger` backend for the command-line tool.

mod init;

pub use init::{init_logging, LoggingConfig};
