//! Utility functions for string and date formatting.

pub mod format;

// Re-export commonly used functions at module level
pub use format::{format_date, format_gestational_age, format_opt_date, format_optional, truncate_string};
