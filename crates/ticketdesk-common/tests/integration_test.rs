//! Integration tests for ticketdesk-common crate.

use chrono::{TimeZone, Utc};
use ticketdesk_common::{
    format_timestamp, ticket_channel_name, truncate_string, ChannelId, TicketDeskError, UserId,
    TICKET_NUMBER_PLACEHOLDER,
};

#[test]
fn test_channel_id_display() {
    let channel_id = ChannelId(123456789);
    assert_eq!(format!("{}", channel_id), "123456789");
}

#[test]
fn test_user_id_display() {
    let user_id = UserId(987654321);
    assert_eq!(format!("{}", user_id), "987654321");
}

#[test]
fn test_format_timestamp() {
    let timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
    let formatted = format_timestamp(timestamp);
    assert_eq!(formatted, "2024-01-01 12:00:00 UTC");
}

#[test]
fn test_truncate_string() {
    let input = "This is a very long string that should be truncated";
    let truncated = truncate_string(input, 20);
    assert_eq!(truncated, "This is a very lo...");

    let short = "Short";
    let not_truncated = truncate_string(short, 20);
    assert_eq!(not_truncated, "Short");
}

#[test]
fn test_channel_name_uses_placeholder() {
    let format = format!("ticket-{}", TICKET_NUMBER_PLACEHOLDER);
    assert_eq!(ticket_channel_name(&format, 42), "ticket-42");
    assert_eq!(ticket_channel_name("{number}-support", 1), "1-support");
}

#[test]
fn test_channel_name_is_discord_safe() {
    let name = ticket_channel_name("Urgent Help: {number}", 9);
    assert_eq!(name, "urgent-help-9");
    assert!(name.len() <= 100);

    let long = "x".repeat(200);
    assert!(ticket_channel_name(&long, 1).chars().count() <= 100);
}

#[test]
fn test_error_user_facing_classification() {
    assert!(TicketDeskError::validation("bad color").is_user_facing());
    assert!(TicketDeskError::not_found("Panel").is_user_facing());
    assert!(!TicketDeskError::Storage("disk full".to_string()).is_user_facing());
    assert_eq!(TicketDeskError::not_found("Panel").to_string(), "Panel not found");
}
