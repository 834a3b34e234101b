use crate::{
    cache_keys::ServicesKey,
    commands::{command_specs, register_commands},
    dispatcher::dispatch,
    event::{CommandInvocation, InboundEvent, ModalSubmission},
    reply::{InteractionReply, InteractionTarget, ReplyHandle},
};
use serenity::{
    async_trait,
    http::client::Http,
    model::{application::interaction::Interaction, prelude::Ready},
    prelude::*,
};
use std::sync::Arc;
use tracing::{error, info};

pub struct Handler;

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, context: Context, ready: Ready) {
        info!("HD | Connected as user '{}'.", ready.user.name);
        if let Err(why) = register_commands(&context.http, &command_specs()).await {
            error!("HD | Failed to register slash commands: {why:?}");
        }
    }

    async fn interaction_create(&self, context: Context, interaction: Interaction) {
        let Some((event, reply)) = split_interaction(context.http.clone(), interaction) else {
            return;
        };
        let services = match context.data.read().await.get::<ServicesKey>() {
            Some(services) => services.clone(),
            None => {
                error!("HD | Services missing from client data.");
                return;
            }
        };
        let label = match &event {
            InboundEvent::CommandInvocation(invocation) => format!("command '{}'", invocation.name),
            InboundEvent::ModalSubmission(submission) => format!("form '{}'", submission.form_id),
        };
        info!("HD | Handling {label}.");
        if let Err(why) = dispatch(&services, event, reply).await {
            error!("HD | Handling {label} failed: {why:?}");
        }
    }
}

/// Pairs the handled interaction kinds with a reply handle. Everything else
/// (pings, components, autocomplete) yields `None`.
fn split_interaction(
    http: Arc<Http>,
    interaction: Interaction,
) -> Option<(InboundEvent, Arc<dyn ReplyHandle>)> {
    let (event, target) = match interaction {
        Interaction::ApplicationCommand(command) => (
            InboundEvent::CommandInvocation(CommandInvocation::from(&command)),
            InteractionTarget::Command(command),
        ),
        Interaction::ModalSubmit(modal) => (
            InboundEvent::ModalSubmission(ModalSubmission::from(&modal)),
            InteractionTarget::Modal(modal),
        ),
        _ => return None,
    };
    let reply: Arc<dyn ReplyHandle> = Arc::new(InteractionReply::new(http, target));
    Some((event, reply))
}
