//! # waitcheck CLI Library
//!
//! Command line front end for the waitcheck lint engine.
//!
//! ## Modules
//!
//! - [`commands`] - CLI command implementations
//! - [`config`] - `waitcheck.toml` loading and command line overrides
//! - [`errors`] - Error handling and display
//! - [`exit_codes`] - Standard exit codes
//! - [`output`] - Rendering of lint results
//! - [`session`] - File discovery and fix application

pub mod commands;
pub mod config;
pub mod errors;
pub mod exit_codes;
pub mod output;
pub mod session;

pub use config::{ConfigOverrides, load_config};
