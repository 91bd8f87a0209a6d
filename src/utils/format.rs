/// Format a gestational age given in days for display.
/// Whole weeks round up once the age reaches a week.
pub fn format_gestational_age(days: Option<i64>) -> String {
    match days {
        None => "N/A".to_string(),
        Some(d) if d < 7 => format!("{} days", d),
        Some(d) => format!("{} weeks", (d + 6) / 7),
    }
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    // Try to parse ISO format and convert to readable
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        // Try to parse YYYY-MM-DD format
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

/// Format an optional date string, returning "-" if missing
pub fn format_opt_date(date: &Option<String>) -> String {
    match date {
        Some(d) if !d.is_empty() => format_date(d),
        _ => "-".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_gestational_age() {
        assert_eq!(format_gestational_age(None), "N/A");
        assert_eq!(format_gestational_age(Some(0)), "0 days");
        assert_eq!(format_gestational_age(Some(4)), "4 days");
        assert_eq!(format_gestational_age(Some(7)), "1 weeks");
        assert_eq!(format_gestational_age(Some(10)), "2 weeks");
        assert_eq!(format_gestational_age(Some(63)), "9 weeks");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2020-04-21T00:00:00Z"), "Apr 21, 2020");
        assert_eq!(format_date("2020-04-21"), "2020-04-21");
        assert_eq!(format_date("n/a"), "n/a");
    }

    #[test]
    fn test_format_opt_date() {
        assert_eq!(format_opt_date(&Some("2020-04-21T00:00:00Z".to_string())), "Apr 21, 2020");
        assert_eq!(format_opt_date(&None), "-");
        assert_eq!(format_opt_date(&Some(String::new())), "-");
    }
}
