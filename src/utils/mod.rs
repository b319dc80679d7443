//! Utility functions shared across the codebase

pub mod text;

// Re-export commonly used utilities
pub use text::{CharSlicer, normalize_whitespace, truncate_chars};
