//! Interactive message components (buttons).
//!
//! A component owns a custom-id prefix. Ids are encoded as
//! `prefix:arg:arg`, and the registry routes an interaction to the component
//! whose prefix matches the first segment.

use std::fmt::Display;
use std::future::Future;

use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, CreateInteractionResponse, CreateInteractionResponseMessage,
};

use crate::bot::Error;
use crate::bot::data::BotData;

pub mod undo;

const ID_SEPARATOR: char = ':';
const DISABLED_REPLY: &str = "This button is disabled.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentOptions {
    /// Whether the component may run at all.
    pub enabled: bool,
    /// Strip the message's components after one successful run.
    pub disable_after_use: bool,
}

impl Default for ComponentOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            disable_after_use: false,
        }
    }
}

/// Result of a component run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComponentReply {
    /// The component did its work.
    Done(String),
    /// The click was refused; shown only to the clicker and the component stays usable.
    Rejected(String),
}

pub struct ComponentContext<'a> {
    pub serenity: &'a serenity::Context,
    pub interaction: &'a serenity::ComponentInteraction,
    pub data: &'a BotData,
}

#[async_trait]
pub trait Component: Send + Sync {
    /// Custom-id prefix, without the separator.
    fn id(&self) -> &'static str;

    fn options(&self) -> ComponentOptions {
        ComponentOptions::default()
    }

    /// `args` are the custom-id segments after the prefix.
    async fn exec(&self, ctx: ComponentContext<'_>, args: &[&str]) -> Result<ComponentReply, Error>;
}

/// Builds a custom id that routes back to the component with `prefix`.
pub fn custom_id<T: Display>(prefix: &str, args: &[T]) -> String {
    let mut id = prefix.to_string();
    for arg in args {
        id.push(ID_SEPARATOR);
        id.push_str(&arg.to_string());
    }
    id
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ResponsePlan {
    Ephemeral(String),
    Message(String),
    UpdateAndDisable(String),
}

/// Decides the response for a click. `exec` is only awaited when the
/// component is enabled.
async fn plan_response<F>(options: ComponentOptions, exec: F) -> Result<ResponsePlan, Error>
where
    F: Future<Output = Result<ComponentReply, Error>>,
{
    if !options.enabled {
        return Ok(ResponsePlan::Ephemeral(DISABLED_REPLY.to_string()));
    }
    let reply = exec.await?;
    Ok(ResponsePlan::new(options, reply))
}

impl ResponsePlan {
    fn new(options: ComponentOptions, reply: ComponentReply) -> Self {
        match reply {
            ComponentReply::Rejected(content) => Self::Ephemeral(content),
            ComponentReply::Done(content) if options.disable_after_use => {
                Self::UpdateAndDisable(content)
            }
            ComponentReply::Done(content) => Self::Message(content),
        }
    }

    fn into_response(self) -> CreateInteractionResponse {
        match self {
            Self::Ephemeral(content) => CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .ephemeral(true),
            ),
            Self::Message(content) => CreateInteractionResponse::Message(
                CreateInteractionResponseMessage::new().content(content),
            ),
            Self::UpdateAndDisable(content) => CreateInteractionResponse::UpdateMessage(
                CreateInteractionResponseMessage::new()
                    .content(content)
                    .components(Vec::new()),
            ),
        }
    }
}

#[derive(Default)]
pub struct ComponentRegistry {
    components: Vec<Box<dyn Component>>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(mut self, component: impl Component + 'static) -> Self {
        if self.components.iter().any(|c| c.id() == component.id()) {
            log::warn!("Component prefix `{}` registered twice, keeping the first", component.id());
            return self;
        }
        self.components.push(Box::new(component));
        self
    }

    fn resolve<'a, 'b>(&'a self, custom_id: &'b str) -> Option<(&'a dyn Component, Vec<&'b str>)> {
        let mut segments = custom_id.split(ID_SEPARATOR);
        let prefix = segments.next()?;
        let component = self.components.iter().find(|c| c.id() == prefix)?;
        Some((component.as_ref(), segments.collect()))
    }

    /// Runs the component owning the interaction's custom id.
    ///
    /// Returns `Ok(false)` when no registered component owns it.
    pub async fn dispatch(
        &self,
        ctx: &serenity::Context,
        interaction: &serenity::ComponentInteraction,
        data: &BotData,
    ) -> Result<bool, Error> {
        let Some((component, args)) = self.resolve(&interaction.data.custom_id) else {
            return Ok(false);
        };

        let options = component.options();
        if options.enabled {
            log::info!(
                "Running component `{}` for user {}",
                component.id(),
                interaction.user.id
            );
        } else {
            log::debug!("Component `{}` is disabled, ignoring click", component.id());
        }

        let component_ctx = ComponentContext {
            serenity: ctx,
            interaction,
            data,
        };
        let plan = plan_response(options, component.exec(component_ctx, &args)).await?;

        interaction.create_response(ctx, plan.into_response()).await?;
        Ok(true)
    }
}
