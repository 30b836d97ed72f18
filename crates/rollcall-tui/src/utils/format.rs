use chrono::NaiveDate;

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
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

/// "Mon, Oct 19" for the title bar
pub fn format_today(date: NaiveDate) -> String {
    date.format("%a, %b %d").to_string()
}

/// Spaces needed to push `right` to the far edge of a `width`-column line.
pub fn pad_between(left: &str, right: &str, width: usize) -> String {
    let used = left.chars().count() + right.chars().count();
    " ".repeat(width.saturating_sub(used))
}
