use std::sync::Arc;

use anyhow::Error;
use async_trait::async_trait;
use poise::serenity_prelude::{self as serenity, CacheHttp, GuildId, Http, HttpError, Member, RoleId, UserId};

use crate::utils::role_store::RoleBindingStore;

/// Binding key the toggle command reads.
pub const STAFF_ROLE_KEY: &str = "staff";

/// Discord JSON error codes for a member or user that cannot be found.
const UNKNOWN_MEMBER: isize = 10007;
const UNKNOWN_USER: isize = 10013;

/// The parts of a guild member the toggle needs.
#[derive(Debug, Clone)]
pub struct TargetMember {
    pub id: UserId,
    pub tag: String,
    pub roles: Vec<RoleId>,
}

impl From<&Member> for TargetMember {
    fn from(member: &Member) -> Self {
        Self {
            id: member.user.id,
            tag: member.user.tag(),
            roles: member.roles.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleChange {
    Add,
    Remove,
}

impl RoleChange {
    pub fn inverse(self) -> Self {
        match self {
            Self::Add => Self::Remove,
            Self::Remove => Self::Add,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    MissingTarget,
    NotSetUp,
    RoleMissing,
    Added { role_name: String, member_tag: String },
    Removed { role_name: String, member_tag: String },
    /// A requested change was already in effect.
    Unchanged { role_name: String, member_tag: String, holds: bool },
}

impl ToggleOutcome {
    pub fn reply(&self) -> String {
        match self {
            Self::MissingTarget => "Please provide a valid user.".to_string(),
            Self::NotSetUp => {
                "The staff role is not set up for this server. Use `/staff-setup` first.".to_string()
            }
            Self::RoleMissing => "The configured staff role is not present in this server anymore.".to_string(),
            Self::Added { role_name, member_tag } => {
                format!("Added the **{}** role to {}.", role_name, member_tag)
            }
            Self::Removed { role_name, member_tag } => {
                format!("Removed the **{}** role from {}.", role_name, member_tag)
            }
            Self::Unchanged { role_name, member_tag, holds: true } => {
                format!("Nothing to change, {} already has the **{}** role.", member_tag, role_name)
            }
            Self::Unchanged { role_name, member_tag, holds: false } => {
                format!("Nothing to change, {} does not have the **{}** role.", member_tag, role_name)
            }
        }
    }

    /// The role change that was applied, if any.
    pub fn change(&self) -> Option<RoleChange> {
        match self {
            Self::Added { .. } => Some(RoleChange::Add),
            Self::Removed { .. } => Some(RoleChange::Remove),
            _ => None,
        }
    }

    pub fn mutated(&self) -> bool {
        self.change().is_some()
    }
}

/// Read side of the guild role bindings.
#[async_trait]
pub trait RoleBindings: Send + Sync {
    async fn role_for(&self, guild_id: GuildId, key: &str) -> Result<Option<RoleId>, Error>;
}

#[async_trait]
impl RoleBindings for RoleBindingStore {
    async fn role_for(&self, guild_id: GuildId, key: &str) -> Result<Option<RoleId>, Error> {
        Ok(self.get_role(guild_id, key).await?)
    }
}

/// Role lookups and membership changes on the platform.
#[async_trait]
pub trait RoleGateway: Send + Sync {
    /// Name of the role, or `None` if it no longer exists in the guild.
    async fn role_name(&self, guild_id: GuildId, role_id: RoleId) -> Result<Option<String>, Error>;
    async fn add_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<(), Error>;
    async fn remove_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<(), Error>;
}

pub struct SerenityRoleGateway {
    http: Arc<Http>,
    reason: String,
}

impl SerenityRoleGateway {
    pub fn new(http: Arc<Http>, actor_tag: &str) -> Self {
        Self {
            http,
            reason: format!("staff toggle by {}", actor_tag),
        }
    }
}

#[async_trait]
impl RoleGateway for SerenityRoleGateway {
    async fn role_name(&self, guild_id: GuildId, role_id: RoleId) -> Result<Option<String>, Error> {
        let roles = guild_id.roles(&self.http).await?;
        Ok(roles.get(&role_id).map(|role| role.name.clone()))
    }

    async fn add_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<(), Error> {
        self.http
            .add_member_role(guild_id, user_id, role_id, Some(self.reason.as_str()))
            .await?;
        Ok(())
    }

    async fn remove_role(&self, guild_id: GuildId, user_id: UserId, role_id: RoleId) -> Result<(), Error> {
        self.http
            .remove_member_role(guild_id, user_id, role_id, Some(self.reason.as_str()))
            .await?;
        Ok(())
    }
}

fn is_missing_member_response(status: u16, code: isize) -> bool {
    status == 404 && (code == UNKNOWN_MEMBER || code == UNKNOWN_USER)
}

/// Whether `error` says the user is not a member of the guild.
pub fn is_unknown_member(error: &serenity::Error) -> bool {
    match error {
        serenity::Error::Http(HttpError::UnsuccessfulRequest(response)) => {
            is_missing_member_response(response.status_code.as_u16(), response.error.code)
        }
        _ => false,
    }
}

/// Fetches `user_id` as a member of `guild_id`.
///
/// A user who is not in the guild is `Ok(None)`; other failures are returned.
pub async fn fetch_target(
    cache_http: impl CacheHttp,
    guild_id: GuildId,
    user_id: UserId,
) -> Result<Option<TargetMember>, Error> {
    match guild_id.member(cache_http, user_id).await {
        Ok(member) => Ok(Some(TargetMember::from(&member))),
        Err(e) if is_unknown_member(&e) => {
            log::info!("User {} is not a member of guild {}", user_id, guild_id);
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Flips the role bound under `key` on `target`.
///
/// Checks run in order: target present, binding present, role still exists.
/// The first failed check is returned as an outcome without touching roles.
/// Store and platform errors are returned as `Err`.
pub async fn toggle_role<B, G>(
    bindings: &B,
    gateway: &G,
    guild_id: GuildId,
    key: &str,
    target: Option<&TargetMember>,
) -> Result<ToggleOutcome, Error>
where
    B: RoleBindings + ?Sized,
    G: RoleGateway + ?Sized,
{
    change_role(bindings, gateway, guild_id, key, target, None).await
}

/// Reverts a `previous` change.
///
/// Yields `Unchanged` without touching roles when the member is already in
/// the state the revert would produce.
pub async fn revert_role<B, G>(
    bindings: &B,
    gateway: &G,
    guild_id: GuildId,
    key: &str,
    target: Option<&TargetMember>,
    previous: RoleChange,
) -> Result<ToggleOutcome, Error>
where
    B: RoleBindings + ?Sized,
    G: RoleGateway + ?Sized,
{
    change_role(bindings, gateway, guild_id, key, target, Some(previous.inverse())).await
}

async fn change_role<B, G>(
    bindings: &B,
    gateway: &G,
    guild_id: GuildId,
    key: &str,
    target: Option<&TargetMember>,
    wanted: Option<RoleChange>,
) -> Result<ToggleOutcome, Error>
where
    B: RoleBindings + ?Sized,
    G: RoleGateway + ?Sized,
{
    let Some(target) = target else {
        return Ok(ToggleOutcome::MissingTarget);
    };

    let Some(role_id) = bindings.role_for(guild_id, key).await? else {
        return Ok(ToggleOutcome::NotSetUp);
    };

    let Some(role_name) = gateway.role_name(guild_id, role_id).await? else {
        return Ok(ToggleOutcome::RoleMissing);
    };

    let member_tag = target.tag.clone();
    let holds = target.roles.contains(&role_id);
    let change = if holds { RoleChange::Remove } else { RoleChange::Add };
    if wanted.is_some_and(|wanted| wanted != change) {
        return Ok(ToggleOutcome::Unchanged { role_name, member_tag, holds });
    }

    match change {
        RoleChange::Remove => {
            gateway.remove_role(guild_id, target.id, role_id).await?;
            log::info!("Removed role {} from {} in guild {}", role_id, target.id, guild_id);
            Ok(ToggleOutcome::Removed { role_name, member_tag })
        }
        RoleChange::Add => {
            gateway.add_role(guild_id, target.id, role_id).await?;
            log::info!("Added role {} to {} in guild {}", role_id, target.id, guild_id);
            Ok(ToggleOutcome::Added { role_name, member_tag })
        }
    }
}
