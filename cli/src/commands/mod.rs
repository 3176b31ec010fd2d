//! # CLI Command Implementations
//!
//! ## Available Commands
//!
//! - [`check`] - Lint test files for unhandled async utilities and related mistakes

pub mod check;
