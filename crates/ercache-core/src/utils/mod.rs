//! Utility functions for string cleanup.

pub mod sanitize;

pub use sanitize::{cache_label, sanitize_name};
