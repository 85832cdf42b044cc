use async_trait::async_trait;
use poise::serenity_prelude::{ButtonStyle, CreateActionRow, CreateButton, Permissions, UserId};

use super::{Component, ComponentContext, ComponentOptions, ComponentReply, custom_id};
use crate::bot::Error;
use crate::utils::role_toggle::{
    RoleChange, STAFF_ROLE_KEY, SerenityRoleGateway, fetch_target, revert_role,
};

pub const UNDO_PREFIX: &str = "staff_undo";

/// "Undo" button under a staff toggle reply. Reverts the recorded change once.
pub struct UndoToggle;

/// Action row with the undo button for a `change` applied to `user_id`.
pub fn undo_row(user_id: UserId, change: RoleChange) -> CreateActionRow {
    CreateActionRow::Buttons(vec![
        CreateButton::new(undo_id(user_id, change))
            .label("Undo")
            .style(ButtonStyle::Secondary),
    ])
}

fn undo_id(user_id: UserId, change: RoleChange) -> String {
    custom_id(UNDO_PREFIX, &[user_id.to_string(), change.as_str().to_string()])
}

/// Custom-id args are `<user id>:<add|remove>`.
fn parse_args(args: &[&str]) -> Option<(UserId, RoleChange)> {
    let [user, change] = args else {
        return None;
    };
    let raw = user.parse::<u64>().ok().filter(|&id| id != 0)?;
    Some((UserId::new(raw), RoleChange::parse(change)?))
}

fn can_manage_roles(permissions: Option<Permissions>) -> bool {
    permissions.is_some_and(|p| p.administrator() || p.manage_roles())
}

#[async_trait]
impl Component for UndoToggle {
    fn id(&self) -> &'static str {
        UNDO_PREFIX
    }

    fn options(&self) -> ComponentOptions {
        ComponentOptions {
            enabled: true,
            disable_after_use: true,
        }
    }

    async fn exec(&self, ctx: ComponentContext<'_>, args: &[&str]) -> Result<ComponentReply, Error> {
        let Some(guild_id) = ctx.interaction.guild_id else {
            return Ok(ComponentReply::Rejected("This button only works in servers.".to_string()));
        };

        let clicker_permissions = ctx.interaction.member.as_ref().and_then(|m| m.permissions);
        if !can_manage_roles(clicker_permissions) {
            return Ok(ComponentReply::Rejected(
                "You need the Manage Roles permission to use this.".to_string(),
            ));
        }

        let Some((user_id, change)) = parse_args(args) else {
            log::warn!("Malformed undo button id: {}", ctx.interaction.data.custom_id);
            return Ok(ComponentReply::Rejected("This button is no longer valid.".to_string()));
        };

        let target = fetch_target(ctx.serenity, guild_id, user_id).await?;
        let gateway = SerenityRoleGateway::new(ctx.serenity.http.clone(), &ctx.interaction.user.tag());
        let outcome = revert_role(
            &ctx.data.roles,
            &gateway,
            guild_id,
            STAFF_ROLE_KEY,
            target.as_ref(),
            change,
        )
        .await?;

        if outcome.mutated() {
            Ok(ComponentReply::Done(outcome.reply()))
        } else {
            Ok(ComponentReply::Rejected(outcome.reply()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undo_id_round_trips_user_and_change() {
        let id = undo_id(UserId::new(1234), RoleChange::Remove);
        assert_eq!(id, "staff_undo:1234:remove");

        let args: Vec<&str> = id.split(':').skip(1).collect();
        assert_eq!(parse_args(&args), Some((UserId::new(1234), RoleChange::Remove)));
    }

    #[test]
    fn test_parse_args_rejects_malformed_ids() {
        assert_eq!(parse_args(&["1234"]), None);
        assert_eq!(parse_args(&["0", "add"]), None);
        assert_eq!(parse_args(&["abc", "add"]), None);
        assert_eq!(parse_args(&["1234", "flip"]), None);
        assert_eq!(parse_args(&["1234", "add", "extra"]), None);
        assert_eq!(parse_args(&[]), None);
    }

    #[test]
    fn test_manage_roles_required() {
        assert!(can_manage_roles(Some(Permissions::MANAGE_ROLES)));
        assert!(can_manage_roles(Some(Permissions::ADMINISTRATOR)));
        assert!(!can_manage_roles(Some(Permissions::SEND_MESSAGES)));
        assert!(!can_manage_roles(None));
    }

    #[test]
    fn test_undo_is_single_use() {
        let options = UndoToggle.options();
        assert!(options.enabled);
        assert!(options.disable_after_use);
    }
}
