//! Utility functions for formatting values for display.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_currency, format_optional, time_ago, time_ago_since, truncate_string};
