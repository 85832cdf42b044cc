pub mod config;
pub mod logger;
pub mod role_store;
pub mod role_toggle;
