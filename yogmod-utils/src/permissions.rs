use poise::serenity_prelude as serenity;

pub fn permission_denied_message() -> &'static str {
    "You do not have permission to use this command."
}

/// Resolve a member's effective guild-level permissions from the guild's roles.
///
/// The guild owner resolves to every permission.
pub async fn resolve_user_permissions(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
) -> anyhow::Result<serenity::Permissions> {
    let guild = guild_id.to_partial_guild(http).await?;
    if guild.owner_id == user_id {
        return Ok(serenity::Permissions::all());
    }

    let member = guild_id.member(http, user_id).await?;
    Ok(combine_role_permissions(
        guild_id,
        &member.roles,
        guild.roles.values(),
    ))
}

/// OR together `@everyone` and every role the member holds.
pub fn combine_role_permissions<'a>(
    guild_id: serenity::GuildId,
    member_roles: &[serenity::RoleId],
    guild_roles: impl IntoIterator<Item = &'a serenity::Role>,
) -> serenity::Permissions {
    let everyone_role_id = serenity::RoleId::new(guild_id.get());

    guild_roles
        .into_iter()
        .filter(|role| role.id == everyone_role_id || member_roles.contains(&role.id))
        .fold(serenity::Permissions::empty(), |resolved, role| {
            resolved | role.permissions
        })
}

pub fn grants(perms: serenity::Permissions, required: serenity::Permissions) -> bool {
    perms.contains(serenity::Permissions::ADMINISTRATOR) || perms.contains(required)
}

pub async fn has_user_permission(
    http: &serenity::Http,
    guild_id: serenity::GuildId,
    user_id: serenity::UserId,
    required: serenity::Permissions,
) -> anyhow::Result<bool> {
    let perms = resolve_user_permissions(http, guild_id, user_id).await?;

    Ok(grants(perms, required))
}
