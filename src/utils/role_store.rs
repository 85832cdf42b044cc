use poise::serenity_prelude::{GuildId, RoleId};
use thiserror::Error;
use tokio_rusqlite::{Connection, OptionalExtension, params};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),
    #[error("stored role id {0} is not a valid snowflake")]
    InvalidRoleId(i64),
}

/// Per-guild `key -> role id` bindings, e.g. `staff -> 1234`.
#[derive(Clone)]
pub struct RoleBindingStore {
    conn: Connection,
}

impl RoleBindingStore {
    pub async fn open(path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(path).await?;
        Self::init(conn).await
    }

    #[cfg(test)]
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory().await?;
        Self::init(conn).await
    }

    async fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.call(|conn| {
            conn.execute(
                "CREATE TABLE IF NOT EXISTS role_bindings (
                    guild_id INTEGER NOT NULL,
                    binding_key TEXT NOT NULL,
                    role_id INTEGER NOT NULL,
                    PRIMARY KEY (guild_id, binding_key)
                )",
                [],
            )?;
            Ok(())
        })
        .await?;

        Ok(Self { conn })
    }

    pub async fn get_role(&self, guild_id: GuildId, key: &str) -> Result<Option<RoleId>, StoreError> {
        let guild = guild_id.get() as i64;
        let key = key.to_string();

        let raw: Option<i64> = self
            .conn
            .call(move |conn| {
                let role = conn
                    .query_row(
                        "SELECT role_id FROM role_bindings WHERE guild_id = ?1 AND binding_key = ?2",
                        params![guild, key],
                        |row| row.get(0),
                    )
                    .optional()?;
                Ok(role)
            })
            .await?;

        match raw {
            None => Ok(None),
            Some(id) if id > 0 => Ok(Some(RoleId::new(id as u64))),
            Some(id) => Err(StoreError::InvalidRoleId(id)),
        }
    }

    pub async fn set_role(&self, guild_id: GuildId, key: &str, role_id: RoleId) -> Result<(), StoreError> {
        let guild = guild_id.get() as i64;
        let role = role_id.get() as i64;
        let key = key.to_string();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO role_bindings (guild_id, binding_key, role_id) VALUES (?1, ?2, ?3)
                     ON CONFLICT(guild_id, binding_key) DO UPDATE SET role_id = excluded.role_id",
                    params![guild, key, role],
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    /// Returns whether a binding was removed.
    pub async fn clear_role(&self, guild_id: GuildId, key: &str) -> Result<bool, StoreError> {
        let guild = guild_id.get() as i64;
        let key = key.to_string();

        let removed = self
            .conn
            .call(move |conn| {
                let n = conn.execute(
                    "DELETE FROM role_bindings WHERE guild_id = ?1 AND binding_key = ?2",
                    params![guild, key],
                )?;
                Ok(n)
            })
            .await?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_binding_is_none() {
        let store = RoleBindingStore::open_in_memory().await.unwrap();
        let role = store.get_role(GuildId::new(1), "staff").await.unwrap();
        assert!(role.is_none());
    }

    #[tokio::test]
    async fn test_set_then_get_and_overwrite() {
        let store = RoleBindingStore::open_in_memory().await.unwrap();
        let guild = GuildId::new(10);

        store.set_role(guild, "staff", RoleId::new(100)).await.unwrap();
        assert_eq!(store.get_role(guild, "staff").await.unwrap(), Some(RoleId::new(100)));

        store.set_role(guild, "staff", RoleId::new(200)).await.unwrap();
        assert_eq!(store.get_role(guild, "staff").await.unwrap(), Some(RoleId::new(200)));
    }

    #[tokio::test]
    async fn test_bindings_are_scoped_by_guild_and_key() {
        let store = RoleBindingStore::open_in_memory().await.unwrap();
        store.set_role(GuildId::new(1), "staff", RoleId::new(5)).await.unwrap();

        assert!(store.get_role(GuildId::new(2), "staff").await.unwrap().is_none());
        assert!(store.get_role(GuildId::new(1), "muted").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_role() {
        let store = RoleBindingStore::open_in_memory().await.unwrap();
        let guild = GuildId::new(3);
        store.set_role(guild, "staff", RoleId::new(9)).await.unwrap();

        assert!(store.clear_role(guild, "staff").await.unwrap());
        assert!(!store.clear_role(guild, "staff").await.unwrap());
        assert!(store.get_role(guild, "staff").await.unwrap().is_none());
    }
}
