/// Compact interval for tables: `1d`, `6h`, `30m`
pub fn format_interval_short(seconds: u64) -> String {
    if seconds >= 86_400 {
        format!("{}d", seconds / 86_400)
    } else if seconds >= 3_600 {
        format!("{}h", seconds / 3_600)
    } else {
        format!("{}m", seconds / 60)
    }
}

/// Interval for detail views: `1 day(s)`, `6 hour(s)`, `30 minute(s)`
pub fn format_interval_long(seconds: u64) -> String {
    if seconds >= 86_400 {
        format!("{} day(s)", seconds / 86_400)
    } else if seconds >= 3_600 {
        format!("{} hour(s)", seconds / 3_600)
    } else {
        format!("{} minute(s)", seconds / 60)
    }
}

/// Seconds for a named schedule; unknown names fall back to daily.
pub fn interval_seconds(name: &str) -> u64 {
    match name.to_ascii_lowercase().as_str() {
        "hourly" => 3_600,
        "weekly" => 604_800,
        _ => 86_400,
    }
}

/// Keep the first `keep` characters and append `suffix` when `text` is longer
/// than `max` characters.
pub fn truncate(text: &str, max: usize, keep: usize, suffix: &str) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(suffix);
    out
}

/// Pad or cut a cell to exactly `width` characters.
pub fn cell(text: &str, width: usize) -> String {
    let cut: String = text.chars().take(width).collect();
    format!("{:<width$}", cut, width = width)
}
