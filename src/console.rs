//! Line-level dispatcher.
//!
//! Turns a typed console line into a command invocation: tokenizes it, resolves
//! the command, checks permission and argument count, and renders the result
//! or failure as [`ConsoleOutput`]. Also drives line-level completion.

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, warn};

use crate::adapter::AdapterRegistry;
use crate::command::{CommandBuilder, CommandDefinition};
use crate::config::ConsoleConfig;
use crate::error::{ConsoleError, Result};
use crate::registry::CommandRegistry;
use crate::tokenizer::{ends_with_separator, tokenize, CommandLine};

/// The issuer of a command, as seen by the console.
pub trait CommandCaller: Clone {
    /// Returns true if the caller holds `permission`.
    fn has_permission(&self, permission: &str) -> bool;
}

/// Output of one executed console line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConsoleOutput {
    /// Nothing to print.
    None,
    /// Text produced by the command.
    Info { message: String },
    /// The line was rejected or the command failed.
    Error { message: String },
    /// The command must run on the authoritative side; the embedding network
    /// layer is responsible for sending it there.
    Forward {
        command: String,
        arguments: Vec<String>,
    },
}

impl ConsoleOutput {
    /// Creates an info output.
    pub fn info(message: impl Into<String>) -> Self {
        Self::Info {
            message: message.into(),
        }
    }

    /// Creates an error output.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Returns the printable text, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Info { message } | Self::Error { message } => Some(message),
            Self::None | Self::Forward { .. } => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

/// Help-facing metadata for one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandSummary {
    pub name: String,
    pub usage: String,
    pub description: String,
    pub help_text: String,
}

impl CommandSummary {
    fn of<C>(definition: &CommandDefinition<C>) -> Self {
        Self {
            name: definition.name().to_string(),
            usage: definition.usage().to_string(),
            description: definition.description().to_string(),
            help_text: definition.help_text().to_string(),
        }
    }
}

/// Shared, read-only view of the registered commands.
///
/// Commands that list other commands (such as `help`) capture a clone of this
/// handle; the console keeps it in sync with its registry.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    entries: Arc<RwLock<BTreeMap<String, CommandSummary>>>,
}

impl Directory {
    /// Looks up a command by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<CommandSummary> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&name.to_lowercase())
            .cloned()
    }

    /// All commands, sorted by name.
    pub fn list(&self) -> Vec<CommandSummary> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Command names, sorted.
    pub fn names(&self) -> Vec<String> {
        self.list().into_iter().map(|c| c.name).collect()
    }

    fn insert(&self, summary: CommandSummary) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(summary.name.to_lowercase(), summary);
    }

    fn remove(&self, name: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&name.to_lowercase());
    }
}

/// Command console: registry, adapters and dispatch settings.
pub struct Console<C> {
    registry: CommandRegistry<C>,
    adapters: AdapterRegistry,
    directory: Directory,
    config: ConsoleConfig,
}

impl<C: CommandCaller + 'static> Console<C> {
    /// Creates a console with no commands.
    pub fn new(adapters: AdapterRegistry, config: ConsoleConfig) -> Self {
        Self {
            registry: CommandRegistry::new(),
            adapters,
            directory: Directory::default(),
            config,
        }
    }

    pub fn registry(&self) -> &CommandRegistry<C> {
        &self.registry
    }

    pub fn adapters(&self) -> &AdapterRegistry {
        &self.adapters
    }

    /// Mutable access to the adapter table, for registering custom kinds before
    /// the commands that use them.
    pub fn adapters_mut(&mut self) -> &mut AdapterRegistry {
        &mut self.adapters
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// Validates and registers one command.
    pub fn register(&mut self, builder: CommandBuilder<C>) -> Result<()> {
        let definition = builder.build(&self.adapters)?;
        debug!(command = definition.name(), "Registered command");
        self.directory.insert(CommandSummary::of(&definition));
        self.registry.register(definition);
        Ok(())
    }

    /// Registers every command it can. Each command is validated on its own, so
    /// one invalid declaration does not keep the others out; the failures are
    /// logged and returned.
    pub fn register_all<I>(&mut self, builders: I) -> Vec<ConsoleError>
    where
        I: IntoIterator<Item = CommandBuilder<C>>,
    {
        builders
            .into_iter()
            .filter_map(|builder| {
                self.register(builder)
                    .map_err(|e| {
                        warn!("{}: {}", e.category(), e);
                        e
                    })
                    .err()
            })
            .collect()
    }

    /// Removes a command, returning true if it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        self.directory.remove(name);
        self.registry.remove(name).is_some()
    }

    /// Executes one console line on behalf of `caller`.
    pub fn execute(&self, line: &str, caller: &C) -> ConsoleOutput {
        let Some(CommandLine { name, arguments }) = CommandLine::parse(line) else {
            return ConsoleOutput::None;
        };

        let Some(command) = self.registry.get(&name) else {
            return ConsoleOutput::error(format!("Unknown command '{name}'"));
        };

        let permission = command.required_permission();
        if !permission.is_empty() && !caller.has_permission(permission) {
            return ConsoleOutput::error(format!(
                "You do not have enough permissions to execute this command ({permission})."
            ));
        }

        if arguments.len() < command.required_parameter_count() {
            return ConsoleOutput::error(format!(
                "Please, provide required arguments marked by <>.\n{}",
                command.usage()
            ));
        }

        if !command.ends_with_varargs() && arguments.len() > command.parameter_count() {
            return ConsoleOutput::error(format!("Too many arguments.\n{}", command.usage()));
        }

        if command.is_run_on_server() && !self.config.authority {
            debug!(command = command.name(), "Forwarding command to the server");
            return ConsoleOutput::Forward {
                command: command.name().to_string(),
                arguments,
            };
        }

        debug!(command = command.name(), args = arguments.len(), "Executing command");
        match command.execute_raw(&arguments, caller) {
            Ok(Some(text)) if !text.is_empty() => ConsoleOutput::info(text),
            Ok(_) => ConsoleOutput::None,
            Err(ConsoleError::Execution { command, source }) => {
                let cause = format!("{source:#}");
                warn!(%command, %cause, "Command execution failed");
                ConsoleOutput::error(format!(
                    "An error occurred while executing command '{command}': {cause}"
                ))
            }
            Err(other) => ConsoleOutput::error(other.to_string()),
        }
    }

    /// Completion candidates for the last word of `line`, sorted.
    pub fn complete(&self, line: &str, caller: &C) -> Result<Vec<String>> {
        let tokens = tokenize(line);
        let word_finished = line.is_empty() || ends_with_separator(line);

        let mut candidates: Vec<String> = match tokens.split_first() {
            None => self.registry.names(),
            Some((name, [])) if !word_finished => {
                let prefix = name.to_lowercase();
                self.registry
                    .names()
                    .into_iter()
                    .filter(|n| n.to_lowercase().starts_with(&prefix))
                    .collect()
            }
            Some((name, arguments)) => {
                let Some(command) = self.registry.get(name) else {
                    return Ok(Vec::new());
                };
                let permission = command.required_permission();
                if !permission.is_empty() && !caller.has_permission(permission) {
                    return Ok(Vec::new());
                }

                let (current, completed) = match arguments.split_last() {
                    Some((last, rest)) if !word_finished => (Some(last.as_str()), rest),
                    _ => (None, arguments),
                };
                command
                    .suggest_raw(current, completed, caller)?
                    .into_iter()
                    .collect()
            }
        };

        candidates.sort();
        candidates.truncate(self.config.max_suggestions);
        Ok(candidates)
    }
}
