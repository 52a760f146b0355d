use std::collections::HashMap;

use anyhow::{Context as _, anyhow};
use poise::serenity_prelude as serenity;

pub const DEFAULT_COMMAND_PREFIX: &str = "!";

/// Channel bans are implemented as a marker role that channel overwrites deny.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelBan {
    Lore,
    Mentor,
    Wiki,
}

impl ChannelBan {
    pub const ALL: [ChannelBan; 3] = [ChannelBan::Lore, ChannelBan::Mentor, ChannelBan::Wiki];

    pub fn command_name(self) -> &'static str {
        match self {
            ChannelBan::Lore => "loreban",
            ChannelBan::Mentor => "mentorban",
            ChannelBan::Wiki => "wikiban",
        }
    }

    pub fn role_env_key(self) -> &'static str {
        match self {
            ChannelBan::Lore => "LOREBAN_ROLE_ID",
            ChannelBan::Mentor => "MENTORBAN_ROLE_ID",
            ChannelBan::Wiki => "WIKIBAN_ROLE_ID",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BotConfig {
    pub token: String,
    pub guild_id: serenity::GuildId,
    pub command_prefix: String,
    channel_ban_roles: HashMap<ChannelBan, serenity::RoleId>,
}

impl BotConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let token = get("DISCORD_TOKEN").context("DISCORD_TOKEN must be set")?;
        let guild_id = get("DISCORD_GUILD_ID").context("DISCORD_GUILD_ID must be set")?;
        let guild_id = serenity::GuildId::new(parse_snowflake("DISCORD_GUILD_ID", &guild_id)?);

        let command_prefix =
            get("COMMAND_PREFIX").unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_owned());

        let mut channel_ban_roles = HashMap::new();
        for kind in ChannelBan::ALL {
            if let Some(raw) = get(kind.role_env_key()) {
                let role_id = parse_snowflake(kind.role_env_key(), &raw)?;
                channel_ban_roles.insert(kind, serenity::RoleId::new(role_id));
            }
        }

        Ok(Self {
            token,
            guild_id,
            command_prefix,
            channel_ban_roles,
        })
    }

    pub fn channel_ban_role(&self, kind: ChannelBan) -> Option<serenity::RoleId> {
        self.channel_ban_roles.get(&kind).copied()
    }

    /// Channel-ban kinds with a configured role, in declaration order.
    pub fn enabled_channel_bans(&self) -> Vec<ChannelBan> {
        ChannelBan::ALL
            .into_iter()
            .filter(|kind| self.channel_ban_roles.contains_key(kind))
            .collect()
    }
}

fn parse_snowflake(key: &str, raw: &str) -> anyhow::Result<u64> {
    match raw.parse::<u64>() {
        Ok(0) => Err(anyhow!("{key} must not be zero")),
        Ok(id) => Ok(id),
        Err(source) => Err(anyhow!("{key} is not a valid id ({raw:?}): {source}")),
    }
}
