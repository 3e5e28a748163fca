//! devconsole - A typed command console for game developers and admins.
//!
//! Commands declare their parameters, bind a plain Rust closure as handler and
//! are validated against it when registered. The console then parses typed
//! lines, checks permissions, dispatches and autocompletes.

pub mod adapter;
pub mod builtins;
pub mod cli;
pub mod command;
pub mod config;
pub mod console;
pub mod error;
pub mod handler;
pub mod logging;
pub mod parameter;
pub mod registry;
pub mod sandbox;
pub mod session;
pub mod tokenizer;

pub use adapter::{AdapterRegistry, ParameterAdapter, Value, ValueKind};
pub use command::{CommandBuilder, CommandDefinition};
pub use console::{CommandCaller, Console, ConsoleOutput};
pub use error::{ConsoleError, Result};
pub use handler::Caller;
pub use parameter::ParameterDescriptor;
pub use registry::CommandRegistry;
