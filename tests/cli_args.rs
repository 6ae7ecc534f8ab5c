//! Tests for CLI argument parsing, run against the built binary.

use std::process::Command;

fn refl_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_refl"));
    // Keep a developer's own config out of the picture.
    cmd.arg("--config").arg("/nonexistent/refl/config.toml");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn stdout_of(args: &[&str]) -> String {
    let output = refl_cmd()
        .args(args)
        .output()
        .expect("Failed to execute command");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim_end().to_string()
}

#[test]
fn test_help_lists_subcommands() {
    let output = refl_cmd()
        .arg("--help")
        .output()
        .expect("Failed to execute command");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("repl"));
    assert!(stdout.contains("agda"));
}

#[test]
fn test_agda_help_lists_protocol_commands() {
    let stdout = stdout_of(&["agda", "--help"]);
    for name in ["compile", "solveOne", "autoAll", "compute_toplevel", "goal_type_context_infer"] {
        assert!(stdout.contains(name), "missing {name} in:\n{stdout}");
    }
}

#[test]
fn test_compile_envelope() {
    assert_eq!(
        stdout_of(&["agda", "compile", "-f", "./test/test.agda", "-b", "GHC"]),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_compile GHC "./test/test.agda" [])"#
    );
}

#[test]
fn test_file_flag_before_subcommand() {
    assert_eq!(
        stdout_of(&["agda", "-f", "./test/test.agda", "constraints"]),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_constraints)"#
    );
}

#[test]
fn test_compute_toplevel_envelope() {
    assert_eq!(
        stdout_of(&[
            "agda",
            "compute_toplevel",
            "-f",
            "./test/test.agda",
            "-e",
            "suc zero"
        ]),
        r#"IOTCM "./test/test.agda" None Indirect (Cmd_compute_toplevel DefaultCompute "suc zero")"#
    );
}

#[test]
fn test_auto_without_position() {
    assert_eq!(
        stdout_of(&["agda", "auto", "-f", "./test/test.agda"]),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_auto 0 noRange "")"#
    );
}

#[test]
fn test_invalid_rewrite_mode_fails() {
    let output = refl_cmd()
        .args(["agda", "solveAll", "-f", "a.agda", "-r", "Fast"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Fast"));
}

#[test]
fn test_missing_file_fails() {
    let output = refl_cmd()
        .args(["agda", "metas"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error: --file is required"));
}

#[test]
fn test_missing_target_fails() {
    let output = refl_cmd()
        .args(["agda", "infer", "-f", "a.agda"])
        .output()
        .expect("Failed to execute command");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("infer: needs a range"));
}
