//! Commands every console carries.

use crate::adapter::{Value, ValueKind};
use crate::command::{CommandBuilder, CommandDefinition};
use crate::console::Directory;
use crate::parameter::ParameterDescriptor;

const RULE_WIDTH: usize = 80;

/// `help [command]`: lists every command, or shows the detailed help of one.
pub fn help<C: 'static>(directory: Directory) -> CommandBuilder<C> {
    let names = directory.clone();

    CommandDefinition::builder("help")
        .description("Prints out short descriptions for all available commands, or a longer help text if a command is provided.")
        .permission("")
        .parameter(
            ParameterDescriptor::new("command", ValueKind::String)
                .optional()
                .with_suggester(move |_, _| {
                    Ok(names.names().into_iter().map(Value::from).collect())
                }),
        )
        .handler(move |command: Option<String>| match command {
            None => list_commands(&directory),
            Some(name) => describe_command(&directory, &name),
        })
}

fn list_commands(directory: &Directory) -> String {
    directory
        .list()
        .iter()
        .map(|c| format!("{} - {}", c.usage, c.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_command(directory: &Directory, name: &str) -> String {
    let Some(command) = directory.get(name) else {
        return format!("No help available for command '{name}'. Unknown command.");
    };

    let rule = "=".repeat(RULE_WIDTH);
    let mut lines = vec![rule.clone(), command.usage, rule.clone()];
    let body = if !command.help_text.is_empty() {
        Some(command.help_text)
    } else if !command.description.is_empty() {
        Some(command.description)
    } else {
        None
    };
    if let Some(body) = body {
        lines.push(body);
        lines.push(rule);
    }
    lines.join("\n")
}
