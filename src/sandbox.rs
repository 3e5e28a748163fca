//! A stand-in player with movement state, and the debug commands that tweak it.
//!
//! The binary runs console lines on behalf of a [`Player`]; embedding engines
//! use their own caller type.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::bail;

use crate::adapter::{Value, ValueKind};
use crate::command::{CommandBuilder, CommandDefinition};
use crate::config::CallerConfig;
use crate::console::CommandCaller;
use crate::handler::Caller;
use crate::parameter::ParameterDescriptor;

/// Named places `teleport` accepts, with their ground height.
pub const LOCATIONS: [(&str, f32); 4] = [
    ("spawn", 40.0),
    ("origin", 0.0),
    ("lighthouse", 72.5),
    ("caves", -18.0),
];

/// Movement parameters of a player.
#[derive(Debug, Clone, PartialEq)]
pub struct Movement {
    pub speed_multiplier: f32,
    pub jump_speed: f32,
    pub step_height: f32,
    pub slope_factor: f32,
    pub run_factor: f32,
    pub location: String,
    pub height: f32,
}

impl Default for Movement {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            jump_speed: 12.0,
            step_height: 0.35,
            slope_factor: 0.6,
            run_factor: 1.5,
            location: "spawn".to_string(),
            height: 40.0,
        }
    }
}

impl Movement {
    /// Resets the speed values, leaving the position alone.
    fn restore_speed(&mut self) {
        let defaults = Movement::default();
        self.speed_multiplier = defaults.speed_multiplier;
        self.jump_speed = defaults.jump_speed;
        self.step_height = defaults.step_height;
        self.slope_factor = defaults.slope_factor;
        self.run_factor = defaults.run_factor;
    }
}

/// Cloneable handle to a player. Clones share movement state.
#[derive(Debug, Clone)]
pub struct Player {
    name: String,
    permissions: Vec<String>,
    movement: Arc<Mutex<Movement>>,
}

impl Player {
    pub fn new<I, S>(name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
            movement: Arc::new(Mutex::new(Movement::default())),
        }
    }

    pub fn from_config(config: &CallerConfig) -> Self {
        Self::new(config.name.clone(), config.permissions.iter().cloned())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current movement state.
    pub fn movement(&self) -> Movement {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, Movement> {
        self.movement.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CommandCaller for Player {
    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }
}

/// Builders for every sandbox command.
pub fn commands() -> Vec<CommandBuilder<Player>> {
    vec![
        CommandDefinition::builder("setSpeedMultiplier")
            .description("Set speed multiplier")
            .help_text("Sets the factor applied to the player's walking and running speed.")
            .run_on_server(true)
            .parameter(ParameterDescriptor::new("amount", ValueKind::Float))
            .context()
            .handler(|amount: f32, Caller(player): Caller<Player>| {
                let mut movement = player.lock();
                let old = std::mem::replace(&mut movement.speed_multiplier, amount);
                format!("Speed multiplier set to {amount} (was {old})")
            }),
        CommandDefinition::builder("setJumpSpeed")
            .description("Set jump speed")
            .run_on_server(true)
            .parameter(ParameterDescriptor::new("amount", ValueKind::Float))
            .context()
            .handler(|amount: f32, Caller(player): Caller<Player>| {
                let mut movement = player.lock();
                let old = std::mem::replace(&mut movement.jump_speed, amount);
                format!("Jump speed set to {amount} (was {old})")
            }),
        CommandDefinition::builder("stepHeight")
            .description("Sets the height the player can step up")
            .run_on_server(true)
            .parameter(ParameterDescriptor::new("height", ValueKind::Float))
            .context()
            .handler(|height: f32, Caller(player): Caller<Player>| {
                let mut movement = player.lock();
                let old = std::mem::replace(&mut movement.step_height, height);
                format!("Step height set to {height} (was {old})")
            }),
        CommandDefinition::builder("showMovement")
            .description("Show your movement stats")
            .permission("")
            .context()
            .handler(|Caller(player): Caller<Player>| {
                let m = player.movement();
                format!(
                    "Your SpeedMultiplier:{} JumpSpeed:{} StepHeight:{} SlopeFactor:{} RunFactor:{}",
                    m.speed_multiplier, m.jump_speed, m.step_height, m.slope_factor, m.run_factor
                )
            }),
        CommandDefinition::builder("restoreSpeed")
            .description("Restore normal speed values")
            .run_on_server(true)
            .context()
            .handler(|Caller(player): Caller<Player>| {
                player.lock().restore_speed();
                "Normal speed values restored"
            }),
        CommandDefinition::builder("say")
            .description("Sends a message to the chat")
            .permission("")
            .parameter(ParameterDescriptor::new("message", ValueKind::String).variadic())
            .context()
            .handler(|message: String, Caller(player): Caller<Player>| {
                format!("{}: {}", player.name(), message)
            }),
        CommandDefinition::builder("teleport")
            .description("Teleports you to a named location")
            .help_text("Moves you to one of the known locations, optionally at a given height above its ground.")
            .parameter(
                ParameterDescriptor::new("location", ValueKind::String).with_suggester(|_, _| {
                    Ok(LOCATIONS.iter().map(|(name, _)| Value::from(*name)).collect())
                }),
            )
            .parameter(ParameterDescriptor::new("height", ValueKind::Float).optional())
            .context()
            .handler(
                |location: String, height: Option<f32>, Caller(player): Caller<Player>| -> anyhow::Result<String> {
                    let Some((name, ground)) = LOCATIONS
                        .iter()
                        .find(|(name, _)| name.eq_ignore_ascii_case(&location))
                    else {
                        bail!("unknown location '{location}'");
                    };
                    let height = ground + height.unwrap_or(0.0);

                    let mut movement = player.lock();
                    movement.location = name.to_string();
                    movement.height = height;
                    Ok(format!("Teleported {} to {name} at height {height}", player.name()))
                },
            ),
    ]
}
