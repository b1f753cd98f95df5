//! Utility functions for dates and display strings.

pub mod format;

pub use format::{format_header_date, format_timestamp, is_iso_date, today_iso, truncate};
