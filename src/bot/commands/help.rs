use crate::bot::{Context, Error};
use poise::ChoiceParameter;

#[derive(Clone, Copy, Debug, ChoiceParameter)]
pub enum HelpMode {
    #[name = "summary"]
    Summary,
    #[name = "detailed"]
    Detailed,
}

const SUMMARY: &str = "Staff Bot commands:\n\
\n\
/staff <user> (alias: admin) - give or take the staff role.\n\
/staff-setup [role] - choose the staff role, or clear it.\n\
/help [summary|detailed] - show this list or the detailed version.";

const DETAILED: &str = r#"
# Staff Bot

## Toggling
- `/staff <user>` or `!staff @user` / `!admin @user`: gives the member the staff
  role, or takes it away if they already have it.
  - Needs **Manage Roles** for you and for the bot.
  - 5 second cooldown per user.
  - The reply has an **Undo** button that flips the change back once.

## Setup
- `/staff-setup <role>`: binds the role that `/staff` toggles. Needs **Manage Server**.
- `/staff-setup` with no role: clears the binding.
"#;

/// Show command help
#[poise::command(slash_command, prefix_command)]
pub async fn help(
    ctx: Context<'_>,
    #[description = "Display mode"] mode: Option<HelpMode>,
) -> Result<(), Error> {
    let prefix = ctx.data().config.lock().await.global.prefix.clone();
    let text = match mode.unwrap_or(HelpMode::Summary) {
        HelpMode::Summary => SUMMARY,
        HelpMode::Detailed => DETAILED,
    };
    ctx.say(format!("{}\n\nText command prefix: `{}`", text, prefix))
        .await?;

    Ok(())
}
