use poise::serenity_prelude as serenity;

use yogmod_core::{Data, Error};

pub async fn handle_event(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::InteractionCreate {
        interaction: serenity::Interaction::Modal(modal),
    } = event
    {
        yogmod_commands::interactions::handle_modal_submit(ctx, data, modal).await?;
    }

    Ok(())
}
