mod events;

use poise::serenity_prelude as serenity;
use tracing::{debug, error, info};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use rustls::crypto::ring::default_provider;

use yogmod_core::{BotConfig, Data, Error, ExpiryTimers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_filter(filter_fn(|metadata| {
        if *metadata.level() > tracing::Level::INFO {
            return false;
        }

        let target = metadata.target();
        !(target.starts_with("serenity::gateway::bridge::shard_manager")
            || target.starts_with("serenity::gateway::bridge::shard_runner"))
    }));

    tracing_subscriber::registry().with(fmt_layer).init();

    default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("failed to install rustls ring provider"))?;

    dotenvy::dotenv().ok();

    let config = BotConfig::from_env()?;
    let enabled: Vec<_> = config
        .enabled_channel_bans()
        .into_iter()
        .map(|kind| kind.command_name())
        .collect();
    info!(
        prefix = %config.command_prefix,
        channel_bans = ?enabled,
        "configuration loaded."
    );

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let token = config.token.clone();
    let guild_id = config.guild_id;
    let prefix = config.command_prefix.clone();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: yogmod_commands::commands(&config),
            event_handler: |ctx, event, framework, data| {
                Box::pin(events::handle_event(ctx, event, framework, data))
            },
            on_error: |error| Box::pin(on_error(error)),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                mention_as_prefix: false,
                ..Default::default()
            },
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("yogmod is online.");

                poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                    .await?;

                Ok(Data {
                    config,
                    unban_timers: ExpiryTimers::new(),
                })
            })
        })
        .build();

    info!("yogmod is connecting...");

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    client.start().await?;
    Ok(())
}

async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!(?error, command = %ctx.command().qualified_name, "command error");

            let embed = serenity::CreateEmbed::new()
                .title("Command Error")
                .description("Something went wrong while running this command.")
                .color(yogmod_utils::embed::DEFAULT_EMBED_COLOR);

            let _ = ctx
                .send(poise::CreateReply::default().ephemeral(true).embed(embed))
                .await;
        }
        poise::FrameworkError::ArgumentParse { ctx, input, .. } => {
            let usage = format!(
                "Usage: `{}{}`",
                ctx.prefix(),
                ctx.command().qualified_name
            );
            let description = match input {
                Some(input) => format!("Invalid argument: `{input}`\n{usage}"),
                None => format!("Missing required argument.\n{usage}"),
            };

            let _ = ctx.say(description).await;
        }
        poise::FrameworkError::EventHandler { error, event, .. } => {
            error!(?error, event = event.snake_case_name(), "event handler error");
        }
        poise::FrameworkError::UnknownCommand { .. } => {
            debug!("unknown command invocation");
        }
        other => {
            error!(?other, "framework error");
        }
    }
}
