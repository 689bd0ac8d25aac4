//! Duration formatting: seconds to HH:MM, signed differences, etc.

/// `HH:MM` (seconds ignored). Negative values keep a leading `-`.
pub fn format_hm(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "" };
    let s = seconds.abs();
    format!("{}{:02}:{:02}", sign, s / 3600, (s % 3600) / 60)
}

/// `HH:MM:SS`
pub fn format_hms(seconds: i64) -> String {
    let s = seconds.max(0);
    format!("{:02}:{:02}:{:02}", s / 3600, (s % 3600) / 60, s % 60)
}

/// `+HH:MM` / `-HH:MM`; zero is shown as an overage (`+00:00`).
pub fn format_difference(seconds: i64) -> String {
    let sign = if seconds < 0 { "-" } else { "+" };
    let s = seconds.abs();
    format!("{}{:02}:{:02}", sign, s / 3600, (s % 3600) / 60)
}

/// CSS class for a signed difference.
pub fn difference_class(seconds: i64) -> &'static str {
    if seconds < 0 { "negative" } else { "positive" }
}

/// `7h 30m`
pub fn minutes_readable(minutes: i64) -> String {
    format!("{}h {}m", minutes / 60, minutes % 60)
}

/// Hours and minutes form fields to minutes. `None` on overflow.
pub fn hm_to_minutes(hours: i64, minutes: i64) -> Option<i64> {
    hours.checked_mul(60)?.checked_add(minutes)
}

/// Hours and minutes form fields to seconds. `None` on overflow.
pub fn hm_to_seconds(hours: i64, minutes: i64) -> Option<i64> {
    hm_to_minutes(hours, minutes)?.checked_mul(60)
}
