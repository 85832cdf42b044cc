use poise::serenity_prelude::Ready;
use serde::Serialize;

const NOTICE_USERNAME: &str = "staff-bot";

/// Body of the startup webhook message.
///
/// Built from the bot's public identity only; credentials never reach it.
#[derive(Debug, Serialize)]
pub struct StartupNotice {
    pub username: &'static str,
    pub content: String,
}

impl StartupNotice {
    pub fn new(bot_tag: &str, guild_count: usize) -> Self {
        Self {
            username: NOTICE_USERNAME,
            content: format!(
                "{} is online (v{}, {} guilds)",
                bot_tag,
                env!("CARGO_PKG_VERSION"),
                guild_count
            ),
        }
    }
}

pub async fn send_startup_notice(url: &str, notice: &StartupNotice) -> Result<(), reqwest::Error> {
    reqwest::Client::new()
        .post(url)
        .json(notice)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

/// Handles the first gateway ready: one log line and at most one webhook post.
///
/// The post is spawned and not retried; a failure is only logged.
pub fn on_ready(ready: &Ready, webhook_url: Option<String>) {
    let tag = ready.user.tag();
    let guild_count = ready.guilds.len();

    if let Some(url) = webhook_url {
        let notice = StartupNotice::new(&tag, guild_count);
        tokio::spawn(async move {
            if let Err(e) = send_startup_notice(&url, &notice).await {
                log::warn!("Startup notification failed: {}", e);
            }
        });
    }

    log::info!("{} is ready, serving {} guilds", tag, guild_count);
}
