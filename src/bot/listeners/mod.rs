pub mod ready;

use poise::serenity_prelude as serenity;

use crate::bot::Error;
use crate::bot::data::BotData;

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, BotData, Error>,
    data: &BotData,
) -> Result<(), Error> {
    if let serenity::FullEvent::InteractionCreate {
        interaction: serenity::Interaction::Component(interaction),
    } = event
    {
        if !data.components.dispatch(ctx, interaction, data).await? {
            log::debug!("No component owns custom id {}", interaction.data.custom_id);
        }
    }

    Ok(())
}
