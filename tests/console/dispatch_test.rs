//! Line dispatch against the sandbox commands.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use devconsole::config::ConsoleConfig;
use devconsole::sandbox::Player;
use devconsole::{AdapterRegistry, CommandDefinition, Console, ConsoleOutput, ParameterDescriptor, ValueKind};
use pretty_assertions::assert_eq;

use super::common::{admin, sandbox_console, Admin};

#[test]
fn test_set_speed_multiplier_scenario() {
    let console = sandbox_console();
    let player = Player::new("tester", ["op"]);

    let output = console.execute("setSpeedMultiplier 2.5", &player);
    let message = output.message().unwrap();
    assert!(message.contains("2.5"), "{message}");
    assert!(message.contains("(was 1)"), "{message}");

    let output = console.execute("setSpeedMultiplier fast", &player);
    assert!(!output.is_error());
    assert!(output
        .message()
        .unwrap()
        .starts_with("Invalid parameter 'amount'"));
    assert_eq!(player.movement().speed_multiplier, 2.5);
}

#[test]
fn test_malformed_token_skips_handler() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut console = Console::<Admin>::new(AdapterRegistry::basic(), ConsoleConfig::default());
    console
        .register(
            CommandDefinition::builder("setGravity")
                .parameter(ParameterDescriptor::new("amount", ValueKind::Float))
                .handler(move |amount: f32| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    format!("Gravity set to {amount}")
                }),
        )
        .unwrap();

    let output = console.execute("setGravity heavy", &admin());
    assert!(output.message().unwrap().contains("'amount'"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let output = console.execute("setgravity 9.5", &admin());
    assert_eq!(output, ConsoleOutput::info("Gravity set to 9.5"));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_varargs_are_joined() {
    let mut console = Console::<Admin>::new(AdapterRegistry::basic(), ConsoleConfig::default());
    console
        .register(
            CommandDefinition::builder("tell")
                .parameter(ParameterDescriptor::new("target", ValueKind::String))
                .parameter(ParameterDescriptor::new("rest", ValueKind::String).variadic())
                .handler(|target: String, rest: String| format!("[{target}] [{rest}]")),
        )
        .unwrap();

    assert_eq!(
        console.execute("tell x y z", &admin()),
        ConsoleOutput::info("[x] [y z]")
    );

    let definition = console.registry().get("tell").unwrap();
    assert_eq!(definition.join_varargs(&["x", "y", "z"]), vec!["x", "y z"]);
}

#[test]
fn test_lookup_ignores_case() {
    let console = sandbox_console();
    let player = Player::new("tester", ["op"]);

    let lower = console.execute("showmovement", &player);
    let upper = console.execute("SHOWMOVEMENT", &player);
    assert_eq!(lower, upper);
    assert!(lower.message().unwrap().starts_with("Your SpeedMultiplier:1"));
}

#[test]
fn test_help_lists_sandbox_commands() {
    let console = sandbox_console();
    let output = console.execute("help", &Player::new("guest", Vec::<String>::new()));
    let message = output.message().unwrap();

    assert!(message.contains("setSpeedMultiplier <float amount> - Set speed multiplier"));
    assert!(message.contains("say <string... message> - "));
    assert!(message.contains("teleport <string location> (float height) - "));
}

#[test]
fn test_forwarded_when_not_authoritative() {
    let mut console = Console::new(
        AdapterRegistry::basic(),
        ConsoleConfig {
            authority: false,
            ..ConsoleConfig::default()
        },
    );
    let failures = console.register_all(devconsole::sandbox::commands());
    assert!(failures.is_empty());

    let player = Player::new("tester", ["op"]);
    let output = console.execute("setJumpSpeed 30", &player);
    assert_eq!(
        output,
        ConsoleOutput::Forward {
            command: "setJumpSpeed".to_string(),
            arguments: vec!["30".to_string()],
        }
    );
    assert_eq!(player.movement().jump_speed, 12.0);
}
