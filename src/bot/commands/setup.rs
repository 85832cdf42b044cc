use crate::bot::{Context, Error};
use crate::utils::role_toggle::STAFF_ROLE_KEY;
use anyhow::anyhow;
use poise::serenity_prelude::{self as serenity, GuildId, Mentionable, RoleId};

/// Bind the role that `/staff` toggles. Leave empty to clear it.
#[poise::command(
    slash_command,
    prefix_command,
    rename = "staff-setup",
    guild_only,
    required_permissions = "MANAGE_GUILD",
    category = "Moderation"
)]
pub async fn staff_setup(
    ctx: Context<'_>,
    #[description = "Role to use as the staff role"] role: Option<serenity::Role>,
) -> Result<(), Error> {
    let guild_id = ctx
        .guild_id()
        .ok_or_else(|| anyhow!("staff-setup invoked outside a guild"))?;
    let store = &ctx.data().roles;

    let Some(role) = role else {
        let message = if store.clear_role(guild_id, STAFF_ROLE_KEY).await? {
            log::info!("Cleared staff role binding for guild {}", guild_id);
            "The staff role binding has been cleared."
        } else {
            "No staff role was set up for this server."
        };
        ctx.say(message).await?;
        return Ok(());
    };

    if let Some(problem) = unassignable_reason(guild_id, role.id, role.managed) {
        ctx.say(problem).await?;
        return Ok(());
    }

    store.set_role(guild_id, STAFF_ROLE_KEY, role.id).await?;
    log::info!("Staff role for guild {} set to {}", guild_id, role.id);
    ctx.say(format!("The staff role is now {}.", role.id.mention()))
        .await?;

    Ok(())
}

/// Roles that cannot be handed out through member role edits.
fn unassignable_reason(guild_id: GuildId, role_id: RoleId, managed: bool) -> Option<&'static str> {
    if role_id.get() == guild_id.get() {
        Some("The @everyone role cannot be used as the staff role.")
    } else if managed {
        Some("That role is managed by an integration and cannot be assigned.")
    } else {
        None
    }
}
