/// Embed builders shared across commands.
pub mod embed;
/// Pure parser helpers for form input.
pub mod parse;
/// Permission helper utilities.
pub mod permissions;
/// Transport-agnostic replies.
pub mod reply;
/// Shared time helpers.
pub mod time;

use poise::serenity_prelude as serenity;

/// Name used for moderation reasons and audit entries.
pub fn acting_user_name(user: &serenity::User) -> String {
    user.global_name.clone().unwrap_or_else(|| user.name.clone())
}
