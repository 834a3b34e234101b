use anyhow::Result as AnyResult;
use serenity::{
    http::client::Http,
    model::application::command::{Command, CommandOptionType},
};
use tracing::info;

pub const GOOD_MORNING: &str = "goodmorning";
pub const GOOD_NIGHT: &str = "goodnight";
pub const WEATHER: &str = "weather";
pub const IMAGE: &str = "image";
pub const DELAYED_MESSAGE: &str = "delay";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Declaration of one slash command. All options are strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub options: Vec<OptionSpec>,
}

impl CommandSpec {
    fn new(name: &'static str, description: &'static str) -> Self {
        CommandSpec {
            name,
            description,
            options: Vec::new(),
        }
    }

    fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }
}

pub fn command_specs() -> Vec<CommandSpec> {
    vec![
        CommandSpec::new(GOOD_MORNING, "おはようと返します"),
        CommandSpec::new(GOOD_NIGHT, "こんばんはと返します"),
        CommandSpec::new(WEATHER, "指定した都市の天気予報を表示します").with_option(
            OptionSpec {
                name: crate::weather::CITY_OPTION,
                description: "例：edinburgh",
                required: true,
            },
        ),
        CommandSpec::new(IMAGE, "画像を返します"),
        CommandSpec::new(DELAYED_MESSAGE, "指定した日時にメッセージを送ります"),
    ]
}

/// Replaces every global command registered for the application with `specs`.
pub async fn register_commands(http: impl AsRef<Http>, specs: &[CommandSpec]) -> AnyResult<()> {
    info!("IN | Registering {} slash commands.", specs.len());
    let registered = Command::set_global_application_commands(http, |commands| {
        for spec in specs {
            commands.create_application_command(|command| {
                command.name(spec.name).description(spec.description);
                for option in &spec.options {
                    command.create_option(|opt| {
                        opt.name(option.name)
                            .description(option.description)
                            .kind(CommandOptionType::String)
                            .required(option.required)
                    });
                }
                command
            });
        }
        commands
    })
    .await?;
    info!("IN | Registered {} slash commands.", registered.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn command_names_are_unique() {
        let specs = command_specs();
        let names = specs.iter().map(|spec| spec.name).collect::<HashSet<_>>();
        assert_eq!(names.len(), specs.len());
    }

    #[test]
    fn only_weather_takes_a_required_city() {
        for spec in command_specs() {
            if spec.name == WEATHER {
                assert_eq!(spec.options.len(), 1);
                assert_eq!(spec.options[0].name, "city");
                assert!(spec.options[0].required);
            } else {
                assert!(spec.options.is_empty(), "{}", spec.name);
            }
        }
    }
}
