use crate::bot::components::undo::undo_row;
use crate::bot::data::BotData;
use crate::bot::{Context, Error};
use crate::utils::role_toggle::{
    STAFF_ROLE_KEY, SerenityRoleGateway, TargetMember, ToggleOutcome, toggle_role,
};
use anyhow::anyhow;
use poise::{CreateReply, serenity_prelude as serenity};

/// Give or take the staff role
#[poise::command(
    prefix_command,
    slash_command,
    aliases("admin"),
    guild_only,
    user_cooldown = 5,
    required_permissions = "MANAGE_ROLES",
    required_bot_permissions = "MANAGE_ROLES",
    category = "Moderation",
    on_error = "staff_error"
)]
pub async fn staff(
    ctx: Context<'_>,
    #[description = "Member to toggle the staff role on"] user: Option<serenity::Member>,
) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or_else(|| anyhow!("staff command invoked outside a guild"))?;
    log::info!(
        "Executing staff toggle by {} in guild {}",
        ctx.author().id,
        guild_id
    );

    let target = user.as_ref().map(TargetMember::from);
    let gateway = SerenityRoleGateway::new(ctx.serenity_context().http.clone(), &ctx.author().tag());

    let outcome = toggle_role(
        &ctx.data().roles,
        &gateway,
        guild_id,
        STAFF_ROLE_KEY,
        target.as_ref(),
    )
    .await?;

    let mut reply = CreateReply::default().content(outcome.reply());
    if let Some(change) = outcome.change() {
        if let Some(target) = &target {
            reply = reply.components(vec![undo_row(target.id, change)]);
        }
    }
    ctx.send(reply).await?;

    Ok(())
}

/// A target that does not resolve to a guild member gets the same reply as a
/// missing one.
fn invalid_target_reply() -> String {
    ToggleOutcome::MissingTarget.reply()
}

async fn staff_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::ArgumentParse {
            ctx, input, error, ..
        } => {
            log::info!("Unresolved staff target {:?}: {}", input, error);
            if let Err(why) = ctx.say(invalid_target_reply()).await {
                log::error!("Failed to send invalid target reply: {}", why);
            }
        }
        other => crate::bot::on_error(other).await,
    }
}
