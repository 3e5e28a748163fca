//! Tests for the devconsole binary.

use std::io::Write;

use super::common::run_binary;

#[test]
fn test_exec_lines_run_in_order() {
    let (code, stdout, _) = run_binary(&[
        "-e",
        "setSpeedMultiplier 2.5",
        "-e",
        "showMovement",
    ]);

    assert_eq!(code, 0, "Expected exit code 0");
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines[0], "Speed multiplier set to 2.5 (was 1)");
    assert!(lines[1].starts_with("Your SpeedMultiplier:2.5"));
}

#[test]
fn test_unknown_command_sets_exit_code() {
    let (code, stdout, _) = run_binary(&["-e", "fly"]);

    assert_eq!(code, 1);
    assert!(stdout.contains("error: Unknown command 'fly'"));
}

#[test]
fn test_json_output() {
    let (code, stdout, _) = run_binary(&["-e", "say hello there", "--output", "json"]);

    assert_eq!(code, 0);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["errors"], 0);
    assert_eq!(value["lines"][0]["output"]["kind"], "info");
    assert_eq!(value["lines"][0]["output"]["message"], "local: hello there");
}

#[test]
fn test_script_file() {
    let mut script = tempfile::NamedTempFile::new().unwrap();
    writeln!(script, "# movement tweaks").unwrap();
    writeln!(script, "stepHeight 0.5").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "teleport caves").unwrap();
    let path = script.path().to_string_lossy().to_string();

    let (code, stdout, _) = run_binary(&["--script", &path]);

    assert_eq!(code, 0);
    assert_eq!(
        stdout,
        "Step height set to 0.5 (was 0.35)\nTeleported local to caves at height -18\n"
    );
}

#[test]
fn test_complete() {
    let (code, stdout, _) = run_binary(&["--complete", "teleport l"]);

    assert_eq!(code, 0);
    assert_eq!(stdout, "lighthouse\n");
}

#[test]
fn test_invalid_output_format() {
    let (code, _, stderr) = run_binary(&["-e", "help", "--output", "yaml"]);

    assert_eq!(code, 1);
    assert!(!stderr.contains("panicked"));
}
