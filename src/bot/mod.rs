pub mod commands;
pub mod components;
pub mod data;
pub mod listeners;

pub type Error = anyhow::Error;
pub type Context<'a> = poise::Context<'a, data::BotData, Error>;

pub async fn on_error(error: poise::FrameworkError<'_, data::BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            log::error!("Command `{}` failed: {:#}", ctx.command().qualified_name, error);
            if let Err(why) = ctx.say("Something went wrong while running this command.").await {
                log::error!("Failed to send error reply: {}", why);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                log::error!("Error while handling error: {}", e);
            }
        }
    }
}

pub fn commands() -> Vec<poise::Command<data::BotData, Error>> {
    vec![
        commands::staff::staff(),
        commands::setup::staff_setup(),
        commands::help::help(),
    ]
}

pub fn components() -> components::ComponentRegistry {
    components::ComponentRegistry::new().register(components::undo::UndoToggle)
}
