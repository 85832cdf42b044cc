use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Prefix for text commands, e.g. `!staff @user`.
    pub prefix: String,
    /// Users that bypass command checks.
    #[serde(default)]
    pub owners: Vec<u64>,
    #[serde(default = "default_log_file")]
    pub log_file: Option<String>,
    /// Sends the startup notification when a webhook URL is configured.
    #[serde(default = "default_true")]
    pub startup_notification: bool,
}

fn default_log_file() -> Option<String> {
    Some("bot.log".to_string())
}

fn default_true() -> bool {
    true
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            prefix: "!".to_string(),
            owners: Vec::new(),
            log_file: default_log_file(),
            startup_notification: true,
        }
    }
}
