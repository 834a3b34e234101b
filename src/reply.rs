use anyhow::{bail, Result as AnyResult};
use serenity::{
    async_trait,
    http::client::Http,
    model::application::{
        component::InputTextStyle,
        interaction::{
            application_command::ApplicationCommandInteraction, modal::ModalSubmitInteraction,
            InteractionResponseType,
        },
    },
};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// What a handler wants the user to see.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Attachment(PathBuf),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldStyle {
    Short,
    Paragraph,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormField {
    pub custom_id: &'static str,
    pub label: &'static str,
    pub style: FieldStyle,
    pub placeholder: Option<&'static str>,
    pub required: bool,
}

/// A modal form shown in response to a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormSpec {
    pub custom_id: &'static str,
    pub title: &'static str,
    pub fields: Vec<FormField>,
}

/// Outbound side of a single interaction.
///
/// `acknowledge` may be called at most once. Once the interaction has been
/// acknowledged or completed, every further `complete` edits the original
/// reply instead of creating a new one.
#[async_trait]
pub trait ReplyHandle: Send + Sync {
    async fn acknowledge(&self) -> AnyResult<()>;
    async fn complete(&self, reply: Reply) -> AnyResult<()>;
    async fn present_form(&self, form: &FormSpec) -> AnyResult<()>;
}

pub enum InteractionTarget {
    Command(ApplicationCommandInteraction),
    Modal(ModalSubmitInteraction),
}

// Both interaction kinds expose the same response API, without a shared trait.
macro_rules! on_target {
    ($target:expr, $interaction:ident => $body:expr) => {
        match $target {
            InteractionTarget::Command($interaction) => $body,
            InteractionTarget::Modal($interaction) => $body,
        }
    };
}

/// `ReplyHandle` backed by a live serenity interaction.
pub struct InteractionReply {
    http: Arc<Http>,
    target: InteractionTarget,
    responded: AtomicBool,
}

impl InteractionReply {
    pub fn new(http: Arc<Http>, target: InteractionTarget) -> Self {
        InteractionReply {
            http,
            target,
            responded: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ReplyHandle for InteractionReply {
    async fn acknowledge(&self) -> AnyResult<()> {
        if self.responded.swap(true, Ordering::SeqCst) {
            bail!("Interaction was already acknowledged.");
        }
        on_target!(&self.target, interaction => {
            interaction
                .create_interaction_response(&self.http, |response| {
                    response.kind(InteractionResponseType::DeferredChannelMessageWithSource)
                })
                .await?
        });
        Ok(())
    }

    async fn complete(&self, reply: Reply) -> AnyResult<()> {
        if self.responded.swap(true, Ordering::SeqCst) {
            let content = match reply {
                Reply::Text(content) => content,
                Reply::Attachment(path) => {
                    bail!("Cannot attach '{}' to an edited reply.", path.display())
                }
            };
            on_target!(&self.target, interaction => {
                interaction
                    .edit_original_interaction_response(&self.http, |edit| edit.content(&content))
                    .await?
            });
        } else {
            on_target!(&self.target, interaction => {
                interaction
                    .create_interaction_response(&self.http, |response| {
                        response
                            .kind(InteractionResponseType::ChannelMessageWithSource)
                            .interaction_response_data(|data| match &reply {
                                Reply::Text(content) => data.content(content),
                                Reply::Attachment(path) => data.add_file(path.as_path()),
                            })
                    })
                    .await?
            });
        }
        Ok(())
    }

    async fn present_form(&self, form: &FormSpec) -> AnyResult<()> {
        let InteractionTarget::Command(command) = &self.target else {
            bail!("Forms can only be presented in response to a command.");
        };
        if self.responded.swap(true, Ordering::SeqCst) {
            bail!("Interaction was already responded to.");
        }
        command
            .create_interaction_response(&self.http, |response| {
                response
                    .kind(InteractionResponseType::Modal)
                    .interaction_response_data(|data| {
                        data.custom_id(form.custom_id)
                            .title(form.title)
                            .components(|components| {
                                for field in &form.fields {
                                    components.create_action_row(|row| {
                                        row.create_input_text(|input| {
                                            input
                                                .custom_id(field.custom_id)
                                                .label(field.label)
                                                .style(match field.style {
                                                    FieldStyle::Short => InputTextStyle::Short,
                                                    FieldStyle::Paragraph => {
                                                        InputTextStyle::Paragraph
                                                    }
                                                })
                                                .required(field.required);
                                            if let Some(placeholder) = field.placeholder {
                                                input.placeholder(placeholder);
                                            }
                                            input
                                        })
                                    });
                                }
                                components
                            })
                    })
            })
            .await?;
        Ok(())
    }
}
