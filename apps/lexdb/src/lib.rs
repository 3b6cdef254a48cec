//! # lexdb
//!
//! Command-line front end of lexdb-core. The library target exposes the
//! CLI and registry config so integration tests can drive the commands.

pub mod cli;
pub mod config;
