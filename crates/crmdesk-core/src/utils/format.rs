use chrono::{NaiveDateTime, Utc};

/// Entries older than this many days show their date instead of an age
const RELATIVE_TIME_MAX_DAYS: i64 = 30;

/// Format an amount as dollars with two decimals
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", -amount)
    } else {
        format!("${:.2}", amount)
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, using "-" when missing or blank
pub fn format_optional(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "-".to_string(),
    }
}

/// How long ago a backend timestamp (UTC, no offset) was
pub fn time_ago(time: NaiveDateTime) -> String {
    time_ago_since(time, Utc::now().naive_utc())
}

pub fn time_ago_since(time: NaiveDateTime, now: NaiveDateTime) -> String {
    let elapsed = now - time;
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if elapsed.num_seconds() < 60 {
        // Also covers clock skew
        "just now".to_string()
    } else if minutes < 60 {
        plural(minutes, "minute")
    } else if hours < 24 {
        plural(hours, "hour")
    } else if days < RELATIVE_TIME_MAX_DAYS {
        plural(days, "day")
    } else {
        time.format("%Y-%m-%d").to_string()
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {} ago", unit)
    } else {
        format!("{} {}s ago", count, unit)
    }
}
