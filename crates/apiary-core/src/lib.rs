//! Shared types, configuration, and error base for the apiary unit server.

pub mod config;
pub mod constants;
pub mod error;
pub mod types;
pub mod util;
