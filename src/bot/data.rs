use std::sync::Arc;
use tokio::sync::Mutex;

use crate::bot::components::ComponentRegistry;
use crate::utils::config::ConfigManager;
use crate::utils::role_store::RoleBindingStore;

#[derive(Clone)]
pub struct BotData {
    pub config: Arc<Mutex<ConfigManager>>,
    pub roles: RoleBindingStore,
    pub components: Arc<ComponentRegistry>,
}
