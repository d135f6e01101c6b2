//! Utilities
//!
//! Common utilities used throughout the application.

pub mod error;
pub mod json;
pub mod logging;
pub mod paths;

pub use error::*;
pub use json::extract_json_object;
pub use logging::init_tracing;
pub use paths::*;
