//! Storage Layer
//!
//! Handles persistence of the JSON relay config.

pub mod config;

pub use config::*;
