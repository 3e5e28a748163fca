//! Command-line argument parsing for devconsole.

use clap::Parser;
use std::path::PathBuf;

/// How executed lines are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Printable text, one block per line that produced any.
    #[default]
    Text,
    /// A JSON document with every executed line and its output.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!(
                "Invalid output format: {s}. Expected: text or json"
            )),
        }
    }
}

/// A developer command console.
#[derive(Parser, Debug)]
#[command(name = "devconsole")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", env = "DEVCONSOLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Console line to execute (repeatable, run in order)
    #[arg(short = 'e', long = "exec", value_name = "LINE")]
    pub exec: Vec<String>,

    /// Path to a file with one console line per row (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// Print completion candidates for LINE instead of executing anything
    #[arg(long, value_name = "LINE")]
    pub complete: Option<String>,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write logs to the state directory instead of stderr
    #[arg(long)]
    pub log_file: bool,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Parses the output format from the --output argument.
    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Validates argument combinations.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.complete.is_some() && (!self.exec.is_empty() || self.script.is_some()) {
            return Err("--complete cannot be combined with --exec or --script".to_string());
        }

        self.parse_output_format()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn test_parse_exec_lines_in_order() {
        let cli = parse_args(&[
            "devconsole",
            "-e",
            "setSpeedMultiplier 2",
            "--exec",
            "showMovement",
        ]);
        assert_eq!(cli.exec, vec!["setSpeedMultiplier 2", "showMovement"]);
    }

    #[test]
    fn test_parse_config_path() {
        let cli = parse_args(&["devconsole", "--config", "/path/to/config.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
        assert_eq!(cli.config_path(), PathBuf::from("/path/to/config.toml"));
    }

    #[test]
    fn test_parse_script_stdin() {
        let cli = parse_args(&["devconsole", "--script", "-"]);
        assert_eq!(cli.script.as_deref(), Some("-"));
    }

    #[test]
    fn test_parse_output_format() {
        let cli = parse_args(&["devconsole", "--output", "json"]);
        assert_eq!(cli.parse_output_format().unwrap(), OutputFormat::Json);

        let cli = parse_args(&["devconsole"]);
        assert_eq!(cli.parse_output_format().unwrap(), OutputFormat::Text);

        let cli = parse_args(&["devconsole", "--output", "frames"]);
        assert!(cli.parse_output_format().is_err());
    }

    #[test]
    fn test_parse_log_file_flag() {
        assert!(parse_args(&["devconsole", "--log-file"]).log_file);
        assert!(!parse_args(&["devconsole"]).log_file);
    }

    #[test]
    fn test_validate_complete_is_exclusive() {
        let cli = parse_args(&["devconsole", "--complete", "he", "-e", "help"]);
        let result = cli.validate();
        assert!(result.unwrap_err().contains("--complete cannot be combined"));

        let cli = parse_args(&["devconsole", "--complete", "he"]);
        assert!(cli.validate().is_ok());
    }
}
