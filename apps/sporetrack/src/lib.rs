//! # Sporetrack Application Library
//!
//! The HTTP API, configuration and file input of the `sporetrack` binary,
//! exposed as a library for integration tests.

pub mod api;
pub mod config;
pub mod input;
