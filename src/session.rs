//! Non-interactive console sessions.
//!
//! Runs a sequence of console lines against a [`Console`] and renders the
//! results as text or JSON.

use serde::Serialize;
use tracing::info;

use crate::cli::OutputFormat;
use crate::console::{CommandCaller, Console, ConsoleOutput};
use crate::error::{ConsoleError, Result};

/// One executed line and what it produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineResult {
    pub line: String,
    pub output: ConsoleOutput,
}

/// Result of a whole session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionResult {
    pub lines: Vec<LineResult>,
    pub errors: usize,
}

/// Queue of console lines executed on behalf of one caller.
pub struct Session<C> {
    caller: C,
    lines: Vec<String>,
}

impl<C: CommandCaller + 'static> Session<C> {
    pub fn new(caller: C) -> Self {
        Self {
            caller,
            lines: Vec::new(),
        }
    }

    /// Queues one line.
    pub fn push_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Queues every line of a script. Blank lines and lines starting with `#`
    /// are skipped.
    pub fn load_lines(&mut self, script: &str) {
        self.lines.extend(
            script
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty() && !line.starts_with('#'))
                .map(str::to_string),
        );
    }

    /// Queues the lines of a script file (`-` reads stdin).
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| ConsoleError::internal(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| ConsoleError::internal(format!("Failed to read script file: {e}")))?
        };

        self.load_lines(&content);
        Ok(())
    }

    /// Executes the queued lines in order.
    pub fn run(self, console: &Console<C>) -> SessionResult {
        let mut result = SessionResult::default();

        for line in self.lines {
            let output = console.execute(&line, &self.caller);
            if output.is_error() {
                result.errors += 1;
            }
            result.lines.push(LineResult { line, output });
        }

        info!(
            lines = result.lines.len(),
            errors = result.errors,
            "Session finished"
        );
        result
    }
}

/// Renders session results.
pub struct SessionOutput {
    format: OutputFormat,
}

impl SessionOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the result according to the configured format.
    pub fn format(&self, result: &SessionResult) -> String {
        match self.format {
            OutputFormat::Text => Self::format_text(result),
            OutputFormat::Json => to_json(result),
        }
    }

    /// Formats completion candidates.
    pub fn format_candidates(&self, candidates: &[String]) -> String {
        match self.format {
            OutputFormat::Text => candidates.iter().map(|c| format!("{c}\n")).collect(),
            OutputFormat::Json => to_json(&candidates),
        }
    }

    fn format_text(result: &SessionResult) -> String {
        result
            .lines
            .iter()
            .filter_map(|entry| match &entry.output {
                ConsoleOutput::None => None,
                ConsoleOutput::Info { message } => Some(format!("{message}\n")),
                ConsoleOutput::Error { message } => Some(format!("error: {message}\n")),
                ConsoleOutput::Forward { command, arguments } => Some(format!(
                    "forwarded to server: {}\n",
                    std::iter::once(command)
                        .chain(arguments)
                        .map(String::as_str)
                        .collect::<Vec<_>>()
                        .join(" ")
                )),
            })
            .collect()
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .map(|json| format!("{json}\n"))
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}\n", e))
}
