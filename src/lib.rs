// ABOUTME: Library root for tagkeep - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod commands;
pub mod config;
pub mod error;
pub mod output;
pub mod runtime;
pub mod secret;
pub mod state;
pub mod tag;
pub mod types;
