//! Formatting utilities

use chrono::{DateTime, Local};

/// Format a timestamp as HH:MM:SS
pub fn time(dt: DateTime<Local>) -> String {
    dt.format("%H:%M:%S").to_string()
}

/// Truncate a string to max characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

/// Replace a secret value with a fixed-width mask
///
/// The mask length does not depend on the value so nothing leaks through it.
pub fn mask(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "••••••••"
    }
}

/// Presence marker for diagnostics: credentials are reported, never printed
pub fn presence(value: &str) -> &'static str {
    if value.trim().is_empty() {
        "✗"
    } else {
        "✓"
    }
}

/// "1 secret" / "3 secrets"
pub fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{} {}", count, noun)
    } else {
        format!("{} {}s", count, noun)
    }
}
