use serenity::model::{
    application::{
        component::ActionRowComponent,
        interaction::{
            application_command::{ApplicationCommandInteraction, CommandDataOptionValue},
            modal::ModalSubmitInteraction,
        },
    },
    id::UserId,
};
use std::collections::HashMap;

/// An inbound interaction, narrowed to the kinds the bot handles.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InboundEvent {
    CommandInvocation(CommandInvocation),
    ModalSubmission(ModalSubmission),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandInvocation {
    pub name: String,
    pub user: UserId,
    /// String-typed option values by option name. Other option types are not
    /// used by any command and are left out.
    pub options: HashMap<String, String>,
}

impl CommandInvocation {
    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalSubmission {
    pub form_id: String,
    pub user: UserId,
    pub fields: HashMap<String, String>,
}

impl ModalSubmission {
    pub fn field(&self, custom_id: &str) -> Option<&str> {
        self.fields.get(custom_id).map(String::as_str)
    }
}

impl From<&ApplicationCommandInteraction> for CommandInvocation {
    fn from(command: &ApplicationCommandInteraction) -> Self {
        let options = command
            .data
            .options
            .iter()
            .filter_map(|option| match &option.resolved {
                Some(CommandDataOptionValue::String(value)) => {
                    Some((option.name.clone(), value.clone()))
                }
                _ => None,
            })
            .collect();
        CommandInvocation {
            name: command.data.name.clone(),
            user: command.user.id,
            options,
        }
    }
}

impl From<&ModalSubmitInteraction> for ModalSubmission {
    fn from(modal: &ModalSubmitInteraction) -> Self {
        let fields = modal
            .data
            .components
            .iter()
            .flat_map(|row| row.components.iter())
            .filter_map(|component| match component {
                ActionRowComponent::InputText(input) => {
                    Some((input.custom_id.clone(), input.value.clone()))
                }
                _ => None,
            })
            .collect();
        ModalSubmission {
            form_id: modal.data.custom_id.clone(),
            user: modal.user.id,
            fields,
        }
    }
}
