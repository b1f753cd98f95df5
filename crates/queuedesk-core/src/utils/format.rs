use chrono::{DateTime, Local, NaiveDate, Utc};

/// Today's local date as `YYYY-MM-DD`, the queue endpoints' date format
pub fn today_iso() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}

/// Short header date, e.g. "Sun, Oct 18"
pub fn format_header_date(date: NaiveDate) -> String {
    date.format("%a, %b %d").to_string()
}

/// Queue timestamps in local time, e.g. "Oct 18 09:30"
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%b %d %H:%M").to_string()
}

/// Check a `YYYY-MM-DD` date typed by an operator
pub fn is_iso_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}
