//! Case-insensitive command directory.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::command::CommandDefinition;

/// Maps lower-cased command names to definitions.
///
/// Every key is lower-cased before it reaches the map, so `Teleport`,
/// `teleport` and `TELEPORT` name the same entry. Registering a name twice
/// replaces the earlier definition.
pub struct CommandRegistry<C> {
    commands: HashMap<String, Arc<CommandDefinition<C>>>,
}

impl<C> Default for CommandRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> CommandRegistry<C> {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Look up a command by name
    pub fn get(&self, name: &str) -> Option<Arc<CommandDefinition<C>>> {
        self.commands.get(&name.to_lowercase()).cloned()
    }

    /// Insert `definition` under `name`, returning the definition it replaced.
    pub fn put(
        &mut self,
        name: &str,
        definition: Arc<CommandDefinition<C>>,
    ) -> Option<Arc<CommandDefinition<C>>> {
        let previous = self.commands.insert(name.to_lowercase(), definition);
        if previous.is_some() {
            debug!(command = name, "Replaced previously registered command");
        }
        previous
    }

    /// Register a command under its own name
    pub fn register(
        &mut self,
        definition: CommandDefinition<C>,
    ) -> Option<Arc<CommandDefinition<C>>> {
        let name = definition.name().to_string();
        self.put(&name, Arc::new(definition))
    }

    /// Check if a command exists
    pub fn contains_key(&self, name: &str) -> bool {
        self.commands.contains_key(&name.to_lowercase())
    }

    /// Remove a command, returning it if it was registered
    pub fn remove(&mut self, name: &str) -> Option<Arc<CommandDefinition<C>>> {
        self.commands.remove(&name.to_lowercase())
    }

    /// All commands, sorted by name.
    pub fn commands(&self) -> Vec<Arc<CommandDefinition<C>>> {
        let mut commands: Vec<_> = self.commands.values().cloned().collect();
        commands.sort_by_key(|c| c.name().to_lowercase());
        commands
    }

    /// Command names as registered, sorted.
    pub fn names(&self) -> Vec<String> {
        self.commands()
            .iter()
            .map(|c| c.name().to_string())
            .collect()
    }

    /// Get the number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
