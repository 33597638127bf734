//! Endorsement CLI Library
//!
//! Builds a registry from a TOML config file and replays scripted
//! operations against it.

/// Command handlers for CLI operations
pub mod commands;

/// Operation scripts and their execution
pub mod script;
