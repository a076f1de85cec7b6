//! Conversions between Discord ids and the store's id newtypes.
//!
//! Discord ids are never zero, so a zero read back from the store converts
//! to `None` instead of panicking.

use poise::serenity_prelude as serenity;
use ticketdesk_common::{ChannelId, GuildId, RoleId, UserId};

/// Store key of a guild.
pub const fn guild_key(id: serenity::GuildId) -> GuildId {
    GuildId(id.get())
}

/// Store key of a channel.
pub const fn channel_key(id: serenity::ChannelId) -> ChannelId {
    ChannelId(id.get())
}

/// Store id of a user.
pub const fn user_key(id: serenity::UserId) -> UserId {
    UserId(id.get())
}

/// Store id of a role.
pub const fn role_key(id: serenity::RoleId) -> RoleId {
    RoleId(id.get())
}

/// Discord guild id of a stored guild.
pub fn to_guild(id: GuildId) -> Option<serenity::GuildId> {
    (id.0 != 0).then(|| serenity::GuildId::new(id.0))
}

/// Discord user id of a stored user.
pub fn to_user(id: UserId) -> Option<serenity::UserId> {
    (id.0 != 0).then(|| serenity::UserId::new(id.0))
}

/// Discord role id of a stored role.
pub fn to_role(id: RoleId) -> Option<serenity::RoleId> {
    (id.0 != 0).then(|| serenity::RoleId::new(id.0))
}

/// Discord channel id of a stored channel.
pub fn to_channel(id: ChannelId) -> Option<serenity::ChannelId> {
    (id.0 != 0).then(|| serenity::ChannelId::new(id.0))
}

/// Reads a user from a mention (`<@123>`, `<@!123>`) or a bare id.
pub fn parse_user_mention(raw: &str) -> Option<UserId> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("<@")
        .and_then(|rest| rest.strip_suffix('>'))
        .map_or(trimmed, |inner| inner.trim_start_matches('!'));
    digits.parse::<UserId>().ok().filter(|id| id.0 != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_user_mention() {
        assert_eq!(parse_user_mention("<@123>"), Some(UserId(123)));
        assert_eq!(parse_user_mention("<@!456>"), Some(UserId(456)));
        assert_eq!(parse_user_mention(" 789 "), Some(UserId(789)));
        assert_eq!(parse_user_mention("<@&1>"), None);
        assert_eq!(parse_user_mention("0"), None);
        assert_eq!(parse_user_mention("someone"), None);
    }

    #[test]
    fn test_zero_ids_do_not_convert() {
        assert!(to_role(RoleId(0)).is_none());
        assert_eq!(to_user(UserId(5)).map(serenity::UserId::get), Some(5));
    }
}
