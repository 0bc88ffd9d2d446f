//! Library components of the vorpack CLI.
//!
//! The binary stays thin; argument definitions, command logic, and logging
//! setup live here so integration tests can drive them directly.

pub mod cli;
pub mod commands;
pub mod logging;
