mod bot;
mod models;
mod utils;

use std::collections::HashSet;
use std::env;
use std::sync::Arc;

use anyhow::anyhow;
use poise::serenity_prelude as serenity;
use tokio::sync::Mutex;

use crate::bot::data::BotData;
use crate::utils::config::ConfigManager;
use crate::utils::logger::BotLogger;
use crate::utils::role_store::RoleBindingStore;

#[tokio::main]
async fn main() -> Result<(), bot::Error> {
    dotenvy::dotenv().ok();

    let config_path = env::var("BOT_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config_manager =
        ConfigManager::new(&config_path).map_err(|e| anyhow!("Failed to load config: {}", e))?;

    if let Err(e) = BotLogger::init(config_manager.global.log_file.as_deref()) {
        eprintln!("Failed to initialise logging: {}", e);
    }

    let token = env::var("DISCORD_TOKEN")
        .map_err(|_| anyhow!("Expected DISCORD_TOKEN in the environment"))?;
    let webhook_url = env::var("STARTUP_WEBHOOK_URL")
        .ok()
        .filter(|url| !url.trim().is_empty())
        .filter(|_| config_manager.global.startup_notification);

    let database_path = env::var("DATABASE_PATH").unwrap_or_else(|_| "roles.db".to_string());
    let roles = RoleBindingStore::open(&database_path)
        .await
        .map_err(|e| anyhow!("Failed to open role database: {}", e))?;

    let prefix = config_manager.global.prefix.clone();
    let owners: HashSet<serenity::UserId> = config_manager
        .global
        .owners
        .iter()
        .copied()
        .filter(|&id| id != 0)
        .map(serenity::UserId::new)
        .collect();
    let shared_config = Arc::new(Mutex::new(config_manager));

    let intents = serenity::GatewayIntents::GUILDS
        | serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: bot::commands(),
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some(prefix),
                ..Default::default()
            },
            owners,
            on_error: |error| Box::pin(bot::on_error(error)),
            event_handler: |ctx, event, framework, data| {
                Box::pin(bot::listeners::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                bot::listeners::ready::on_ready(ready, webhook_url);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(BotData {
                    config: shared_config,
                    roles,
                    components: Arc::new(bot::components()),
                })
            })
        })
        .build();

    let mut client = serenity::ClientBuilder::new(&token, intents)
        .framework(framework)
        .await
        .map_err(|e| anyhow!("Failed to build Discord client: {}", e))?;

    client
        .start()
        .await
        .map_err(|e| anyhow!("Bot stopped with an error: {}", e))?;

    Ok(())
}
