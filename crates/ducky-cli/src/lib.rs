//! ducky library - expose modules for testing
//!
//! This library exposes core modules needed for testing and integration.

pub mod commands;
pub mod common;
pub mod errors;
pub mod nuget_cli;
pub mod nuget_config;
pub mod worker;

pub use common::GlobalOpts;
pub use errors::CliError;
