//! Autocompletion through `suggest_raw` and the console.

use std::collections::HashSet;

use devconsole::config::ConsoleConfig;
use devconsole::sandbox::Player;
use devconsole::{
    AdapterRegistry, CommandDefinition, Console, ConsoleError, ParameterDescriptor, Value,
    ValueKind,
};

use super::common::{admin, sandbox_console, Admin};

fn fruit_console() -> Console<Admin> {
    let mut console = Console::new(AdapterRegistry::basic(), ConsoleConfig::default());
    console
        .register(
            CommandDefinition::builder("eat")
                .permission("")
                .parameter(
                    ParameterDescriptor::new("fruit", ValueKind::String).with_suggester(|_, _| {
                        Ok(vec![
                            Value::from("apple"),
                            Value::from("apricot"),
                            Value::from("banana"),
                        ])
                    }),
                )
                .handler(|fruit: String| format!("Ate {fruit}")),
        )
        .unwrap();
    console
        .register(
            CommandDefinition::builder("roll")
                .parameter(
                    ParameterDescriptor::new("sides", ValueKind::Int)
                        .with_suggester(|_, _| Ok(vec![Value::from("six")])),
                )
                .handler(|sides: i32| format!("Rolled a d{sides}")),
        )
        .unwrap();
    console
}

#[test]
fn test_suggestions_filtered_by_prefix() {
    let console = fruit_console();
    let eat = console.registry().get("eat").unwrap();

    let suggestions = eat.suggest_raw::<&str>(Some("ap"), &[], &admin()).unwrap();
    let expected: HashSet<String> = ["apple", "apricot"].iter().map(|s| s.to_string()).collect();
    assert_eq!(suggestions, expected);

    assert_eq!(console.complete("eat ap", &admin()).unwrap(), vec!["apple", "apricot"]);
}

#[test]
fn test_suggester_with_wrong_kind_fails() {
    let console = fruit_console();
    let roll = console.registry().get("roll").unwrap();

    let err = roll.suggest_raw::<&str>(None, &[], &admin()).unwrap_err();
    assert!(matches!(err, ConsoleError::Suggestion { .. }));
    assert!(err
        .to_string()
        .contains("Required: int; provided: string"));
}

#[test]
fn test_complete_command_names() {
    let console = sandbox_console();
    let player = Player::new("tester", ["op"]);

    assert_eq!(
        console.complete("set", &player).unwrap(),
        vec!["setJumpSpeed", "setSpeedMultiplier"]
    );
    assert_eq!(console.complete("HEL", &player).unwrap(), vec!["help"]);
}

#[test]
fn test_complete_help_argument() {
    let console = sandbox_console();
    let player = Player::new("tester", ["op"]);

    assert_eq!(
        console.complete("help st", &player).unwrap(),
        vec!["stepHeight"]
    );
}

#[test]
fn test_complete_optional_parameter_without_suggester() {
    let console = sandbox_console();
    let player = Player::new("tester", ["op"]);

    assert!(console.complete("teleport spawn ", &player).unwrap().is_empty());
}
