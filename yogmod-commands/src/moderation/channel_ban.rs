use tracing::info;

use poise::serenity_prelude as serenity;

use crate::moderation::api::{GuildApi, GuildMembers, TargetMember};
use crate::moderation::messages::{
    BAN_APPLIED, BAN_LIFTED, channel_ban_not_configured, channel_ban_usage, guild_only_message,
};
use yogmod_core::{ChannelBan, Context, Error};
use yogmod_utils::acting_user_name;
use yogmod_utils::permissions::{has_user_permission, permission_denied_message};
use yogmod_utils::reply::Reply;

const UNKNOWN_ISSUER: &str = "unknown";

/// Toggle `role` on the single mentioned member.
///
/// Anything other than exactly one mention leaves the guild untouched and
/// answers with the usage line. The reply is only built once the role change
/// has resolved. A missing `issuer` is recorded as `unknown`.
pub async fn toggle_channel_ban<G: GuildMembers>(
    guild: &G,
    kind: ChannelBan,
    role: serenity::RoleId,
    mentioned: &[TargetMember],
    issuer: Option<&str>,
    prefix: &str,
) -> Result<Reply, Error> {
    let [member] = mentioned else {
        return Ok(Reply::public(channel_ban_usage(prefix, kind.command_name())));
    };

    let issuer = issuer.unwrap_or(UNKNOWN_ISSUER);

    if member.has_role(role) {
        guild
            .remove_role(member.id, role, &format!("Ban lifted by {issuer}"))
            .await?;
        info!(
            command = kind.command_name(),
            user_id = member.id.get(),
            issuer,
            "channel ban lifted"
        );
        return Ok(Reply::public(BAN_LIFTED));
    }

    guild
        .add_role(member.id, role, &format!("Ban applied by {issuer}"))
        .await?;
    info!(
        command = kind.command_name(),
        user_id = member.id.get(),
        issuer,
        "channel ban applied"
    );
    Ok(Reply::public(BAN_APPLIED))
}

/// Members mentioned in a message, with the roles Discord sent alongside.
pub fn mentioned_members(message: &serenity::Message) -> Vec<TargetMember> {
    message
        .mentions
        .iter()
        .filter_map(|user| {
            let member = user.member.as_ref()?;
            Some(TargetMember {
                id: user.id,
                display_name: member
                    .nick
                    .clone()
                    .unwrap_or_else(|| acting_user_name(user)),
                role_ids: member.roles.clone(),
            })
        })
        .collect()
}

async fn run_channel_ban(ctx: Context<'_>, kind: ChannelBan) -> Result<(), Error> {
    let Some(guild_id) = ctx.guild_id() else {
        ctx.say(guild_only_message()).await?;
        return Ok(());
    };

    if !has_user_permission(
        ctx.http(),
        guild_id,
        ctx.author().id,
        serenity::Permissions::BAN_MEMBERS,
    )
    .await?
    {
        ctx.say(permission_denied_message()).await?;
        return Ok(());
    }

    let config = &ctx.data().config;
    let Some(role) = config.channel_ban_role(kind) else {
        ctx.say(channel_ban_not_configured(kind.command_name())).await?;
        return Ok(());
    };

    let poise::Context::Prefix(prefix_ctx) = ctx else {
        ctx.say(channel_ban_usage(&config.command_prefix, kind.command_name()))
            .await?;
        return Ok(());
    };

    // Bot and webhook authors never reach here; poise drops them before dispatch.
    let message = prefix_ctx.msg;
    let mentioned = mentioned_members(message);
    let issuer = acting_user_name(&message.author);

    let guild = GuildApi::new(
        ctx.serenity_context().http.clone(),
        guild_id,
        ctx.data().unban_timers.clone(),
    );
    let reply = toggle_channel_ban(
        &guild,
        kind,
        role,
        &mentioned,
        Some(&issuer),
        &config.command_prefix,
    )
    .await?;

    ctx.send(reply.into_create_reply()).await?;
    Ok(())
}

/// Toggle the lore channel ban on a member.
#[poise::command(prefix_command, guild_only, category = "Moderation")]
pub async fn loreban(
    ctx: Context<'_>,
    #[description = "Member to toggle"]
    #[rest]
    _member: Option<String>,
) -> Result<(), Error> {
    run_channel_ban(ctx, ChannelBan::Lore).await
}

/// Toggle the mentor channel ban on a member.
#[poise::command(prefix_command, guild_only, category = "Moderation")]
pub async fn mentorban(
    ctx: Context<'_>,
    #[description = "Member to toggle"]
    #[rest]
    _member: Option<String>,
) -> Result<(), Error> {
    run_channel_ban(ctx, ChannelBan::Mentor).await
}

/// Toggle the wiki channel ban on a member.
#[poise::command(prefix_command, guild_only, category = "Moderation")]
pub async fn wikiban(
    ctx: Context<'_>,
    #[description = "Member to toggle"]
    #[rest]
    _member: Option<String>,
) -> Result<(), Error> {
    run_channel_ban(ctx, ChannelBan::Wiki).await
}

pub fn command_for(kind: ChannelBan) -> poise::Command<yogmod_core::Data, Error> {
    match kind {
        ChannelBan::Lore => loreban(),
        ChannelBan::Mentor => mentorban(),
        ChannelBan::Wiki => wikiban(),
    }
}
