//! Shared utility functions.

use chrono::{DateTime, Utc};

/// Placeholder replaced by the ticket number in a guild's `ticket_format`.
pub const TICKET_NUMBER_PLACEHOLDER: &str = "{number}";

/// Formats a timestamp for display.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

/// Truncates a string to a maximum number of characters with ellipsis.
pub fn truncate_string(input: &str, max_length: usize) -> String {
    if input.chars().count() <= max_length {
        input.to_string()
    } else {
        let kept: String = input.chars().take(max_length.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Builds a Discord text-channel name from a guild's ticket format.
///
/// Discord lowercases channel names and rejects most punctuation, so the
/// result is normalized the same way before it is sent.
pub fn ticket_channel_name(format: &str, number: u64) -> String {
    let rendered = if format.contains(TICKET_NUMBER_PLACEHOLDER) {
        format.replace(TICKET_NUMBER_PLACEHOLDER, &number.to_string())
    } else {
        format!("{format}-{number}")
    };

    let slug: String = rendered
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                Some(c.to_lowercase().next().unwrap_or(c))
            } else if c.is_whitespace() {
                Some('-')
            } else {
                None
            }
        })
        .collect();

    truncate_string(slug.trim_matches('-'), 100)
}
