pub mod config;
pub mod timers;

pub use config::{BotConfig, ChannelBan};
pub use timers::ExpiryTimers;

pub type Error = anyhow::Error;

#[derive(Clone, Debug)]
pub struct Data {
    pub config: BotConfig,
    pub unban_timers: ExpiryTimers,
}

pub type Context<'a> = poise::Context<'a, Data, Error>;
