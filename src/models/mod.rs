//! Data Models
//!
//! Contains the configuration structures used throughout the crate.

pub mod settings;

pub use settings::*;
