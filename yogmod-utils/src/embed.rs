use poise::serenity_prelude as serenity;

/// Default embed color used across the bot UI.
pub const DEFAULT_EMBED_COLOR: u32 = 0x90_55_30;

/// Zero-width space after `@` so user text can't ping anyone.
pub fn escape_mentions(text: &str) -> String {
    text.replace('@', "@\u{200B}")
}

/// DM sent to a member right before they are banned.
pub fn ban_notice_embed(
    guild_name: &str,
    reason: &str,
    duration: Option<&str>,
    expires: Option<&str>,
) -> serenity::CreateEmbed {
    let mut lines = vec![format!("**Reason :** {}", escape_mentions(reason))];

    match duration {
        Some(duration) => lines.push(format!("**Duration :** {duration}")),
        None => lines.push("**Duration :** Permanent".to_owned()),
    }

    if let Some(expires) = expires {
        lines.push(format!("**Expires :** {expires}"));
    }

    serenity::CreateEmbed::new()
        .color(DEFAULT_EMBED_COLOR)
        .title(format!("You have been banned from {guild_name}"))
        .description(lines.join("\n"))
}
