//! Common test utilities for console tests.

use std::process::Command;

use devconsole::config::ConsoleConfig;
use devconsole::sandbox::{self, Player};
use devconsole::{builtins, AdapterRegistry, CommandCaller, Console};

/// A caller holding a fixed set of permissions.
#[derive(Debug, Clone)]
pub struct Admin {
    pub permissions: Vec<&'static str>,
}

impl CommandCaller for Admin {
    fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(&permission)
    }
}

pub fn admin() -> Admin {
    Admin {
        permissions: vec!["op"],
    }
}

/// A console with `help` and the sandbox commands registered.
pub fn sandbox_console() -> Console<Player> {
    let mut console = Console::new(AdapterRegistry::basic(), ConsoleConfig::default());
    let help = builtins::help(console.directory().clone());
    let failures = console.register_all(std::iter::once(help).chain(sandbox::commands()));
    assert!(failures.is_empty(), "{failures:?}");
    console
}

/// Runs the devconsole binary with a config path that does not exist, so
/// the defaults apply regardless of the machine's own config.
pub fn run_binary(args: &[&str]) -> (i32, String, String) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = dir.path().join("config.toml");

    let output = Command::new(env!("CARGO_BIN_EXE_devconsole"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}
