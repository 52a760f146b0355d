pub mod interactions;
pub mod moderation;

use yogmod_core::{BotConfig, Data, Error};

/// Commands to register for `config`. Channel bans without a configured role
/// are left out entirely.
pub fn commands(config: &BotConfig) -> Vec<poise::Command<Data, Error>> {
    let mut commands = vec![moderation::softban()];
    commands.extend(
        config
            .enabled_channel_bans()
            .into_iter()
            .map(moderation::channel_ban::command_for),
    );
    commands
}
