//! Error types for devconsole.
//!
//! Defines the error enums used by the command pipeline and the adapter table.

use thiserror::Error;

use crate::adapter::ValueKind;

/// Errors raised by a [`ParameterAdapter`](crate::adapter::ParameterAdapter)
/// or the [`AdapterRegistry`](crate::adapter::AdapterRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// No adapter is registered for the requested kind.
    #[error("No adapter registered for {0}")]
    NoAdapter(ValueKind),

    /// The text could not be converted into a value of the requested kind.
    #[error("Cannot parse '{text}' as {kind}: {cause}")]
    Parse {
        /// The offending input text.
        text: String,
        /// The kind the adapter produces.
        kind: ValueKind,
        /// Human-readable reason.
        cause: String,
    },

    /// A value was handed to an adapter for a different kind.
    #[error("Expected a {expected} value, got {found}")]
    KindMismatch {
        /// Kind the adapter handles.
        expected: ValueKind,
        /// Kind of the value that was supplied.
        found: ValueKind,
    },
}

impl AdapterError {
    /// Creates a parse error for `text`.
    pub fn parse(text: impl Into<String>, kind: ValueKind, cause: impl ToString) -> Self {
        Self::Parse {
            text: text.into(),
            kind,
            cause: cause.to_string(),
        }
    }

    /// Returns the human-readable cause without the offending text.
    pub fn cause(&self) -> String {
        match self {
            Self::Parse { cause, .. } => cause.clone(),
            other => other.to_string(),
        }
    }
}

/// Main error type for console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// The declared schema and the bound handler disagree, or the schema itself is invalid.
    #[error("Cannot register command '{command}': {message}")]
    Initialization {
        /// Name of the command that failed to register.
        command: String,
        /// What was wrong.
        message: String,
    },

    /// One argument token could not be converted to its declared kind.
    #[error("Invalid parameter '{parameter}'{}", format_cause(.cause))]
    ParameterParse {
        /// Name of the parameter that failed.
        parameter: String,
        /// Underlying adapter cause, if any.
        cause: Option<String>,
    },

    /// The command handler itself failed.
    #[error("Command '{command}' failed: {source}")]
    Execution {
        /// Name of the command.
        command: String,
        /// The handler's own error.
        #[source]
        source: anyhow::Error,
    },

    /// A suggester failed or returned values of the wrong kind.
    #[error("Suggestion failed for command '{command}': {source}")]
    Suggestion {
        /// Name of the command.
        command: String,
        /// The suggester's error or a description of the mismatch.
        #[source]
        source: anyhow::Error,
    },

    /// Adapter lookup or conversion failed outside of argument parsing.
    #[error(transparent)]
    Adapter(#[from] AdapterError),

    /// Configuration errors (unreadable or invalid config file).
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (unreadable scripts, unwritable output, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

fn format_cause(cause: &Option<String>) -> String {
    match cause {
        Some(cause) => format!(": {cause}"),
        None => String::new(),
    }
}

impl ConsoleError {
    /// Creates an initialization error for `command`.
    pub fn initialization(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Initialization {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates a parameter parse error.
    pub fn parameter_parse(parameter: impl Into<String>, cause: Option<String>) -> Self {
        Self::ParameterParse {
            parameter: parameter.into(),
            cause,
        }
    }

    /// Creates a suggestion error with a plain message.
    pub fn suggestion(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Suggestion {
            command: command.into(),
            source: anyhow::anyhow!(message.into()),
        }
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Initialization { .. } => "Initialization Error",
            Self::ParameterParse { .. } => "Parameter Error",
            Self::Execution { .. } => "Execution Error",
            Self::Suggestion { .. } => "Suggestion Error",
            Self::Adapter(_) => "Adapter Error",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using ConsoleError.
pub type Result<T> = std::result::Result<T, ConsoleError>;
