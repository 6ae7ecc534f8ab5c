//! Envelope strings for every command kind that has a fixed reference form.

use refl::protocol::{
    CompileBackend, Command, ComputeMode, ConstructionError, Goal, Iotcm, Position, Range,
    RewriteMode,
};

const FILE: &str = "./test/test.agda";

fn encode(command: Command) -> String {
    Iotcm::new(FILE, command)
        .expect("command should validate")
        .encode()
}

fn test_range() -> Range {
    Range::single(FILE, Position::new(6, 6, 8), Position::new(6, 6, 12))
}

#[test]
fn test_compile() {
    assert_eq!(
        encode(Command::Compile {
            backend: CompileBackend::GHC,
            cmds: vec![],
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_compile GHC "./test/test.agda" [])"#
    );
}

#[test]
fn test_load() {
    assert_eq!(
        encode(Command::Load { cmds: vec![] }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_load "./test/test.agda" [])"#
    );
}

#[test]
fn test_load_with_backend_options() {
    assert_eq!(
        encode(Command::Load {
            cmds: vec!["-i".into(), "lib".into()],
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_load "./test/test.agda" ["-i" "lib"])"#
    );
}

#[test]
fn test_constraints_and_metas() {
    assert_eq!(
        encode(Command::Constraints),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_constraints)"#
    );
    assert_eq!(
        encode(Command::Metas),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_metas)"#
    );
}

#[test]
fn test_show_module_contents_toplevel_uses_none() {
    assert_eq!(
        encode(Command::ShowModuleContentsToplevel {
            rewrite: RewriteMode::Normalised,
            expr: "Agda.Builtin.Nat".into(),
        }),
        r#"IOTCM "./test/test.agda" None Indirect (Cmd_show_module_contents_toplevel Normalised "Agda.Builtin.Nat")"#
    );
}

#[test]
fn test_search_about_toplevel() {
    assert_eq!(
        encode(Command::SearchAboutToplevel {
            rewrite: RewriteMode::Normalised,
            expr: "Agda.Builtin.Nat".into(),
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_search_about_toplevel Normalised "Agda.Builtin.Nat")"#
    );
}

#[test]
fn test_solve_all() {
    assert_eq!(
        encode(Command::SolveAll {
            rewrite: RewriteMode::Normalised,
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_solveAll Normalised)"#
    );
}

#[test]
fn test_solve_one_with_range() {
    assert_eq!(
        encode(Command::SolveOne {
            rewrite: RewriteMode::Normalised,
            goal: Goal::new(0, test_range(), "Agda.Builtin.Nat"),
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_solveOne Normalised 0 (intervalsToRange (Just (mkAbsolute "./test/test.agda")) [Interval  (Pn () 6 6 8 ) (Pn () 6 6 12 ) ]) "Agda.Builtin.Nat")"#
    );
}

#[test]
fn test_auto_all() {
    assert_eq!(
        encode(Command::AutoAll),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_autoAll)"#
    );
}

#[test]
fn test_auto_one_with_range() {
    assert_eq!(
        encode(Command::AutoOne {
            goal: Goal::new(0, test_range(), "Agda.Builtin.Nat"),
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_autoOne 0 (intervalsToRange (Just (mkAbsolute "./test/test.agda")) [Interval  (Pn () 6 6 8 ) (Pn () 6 6 12 ) ]) "Agda.Builtin.Nat")"#
    );
}

#[test]
fn test_auto_without_range() {
    assert_eq!(
        encode(Command::Auto {
            goal: Goal::new(0, Range::NoRange, ""),
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_auto 0 noRange "")"#
    );
}

#[test]
fn test_infer_toplevel() {
    assert_eq!(
        encode(Command::InferToplevel {
            rewrite: RewriteMode::Normalised,
            expr: "Agda.Builtin.Nat.Nat".into(),
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_infer_toplevel Normalised "Agda.Builtin.Nat.Nat")"#
    );
}

#[test]
fn test_compute_toplevel_uses_none() {
    assert_eq!(
        encode(Command::ComputeToplevel {
            mode: ComputeMode::DefaultCompute,
            expr: "suc zero".into(),
        }),
        r#"IOTCM "./test/test.agda" None Indirect (Cmd_compute_toplevel DefaultCompute "suc zero")"#
    );
}

#[test]
fn test_goal_commands_take_rewrite_then_goal() {
    assert_eq!(
        encode(Command::GoalTypeContext {
            rewrite: RewriteMode::AsIs,
            goal: Goal::new(4, Range::NoRange, ""),
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_goal_type_context AsIs 4 noRange "")"#
    );
    assert_eq!(
        encode(Command::Compute {
            mode: ComputeMode::IgnoreAbstract,
            goal: Goal::new(1, test_range(), ""),
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_compute IgnoreAbstract 1 (intervalsToRange (Just (mkAbsolute "./test/test.agda")) [Interval  (Pn () 6 6 8 ) (Pn () 6 6 12 ) ]) "")"#
    );
}

#[test]
fn test_expression_uses_haskell_escapes() {
    assert_eq!(
        encode(Command::InferToplevel {
            rewrite: RewriteMode::Simplified,
            expr: r#"\x → "a""#.into(),
        }),
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_infer_toplevel Simplified "\\x → \"a\"")"#
    );
}

#[test]
fn test_multiline_expression_stays_on_one_line() {
    let envelope = encode(Command::InferToplevel {
        rewrite: RewriteMode::Simplified,
        expr: "a\nb".into(),
    });
    assert_eq!(
        envelope,
        r#"IOTCM "./test/test.agda" NonInteractive Indirect (Cmd_infer_toplevel Simplified "a\nb")"#
    );
    assert_eq!(envelope.lines().count(), 1);
}

#[test]
fn test_encoding_is_deterministic() {
    let iotcm = Iotcm::new(
        FILE,
        Command::SolveOne {
            rewrite: RewriteMode::Normalised,
            goal: Goal::new(0, test_range(), "x"),
        },
    )
    .unwrap();
    assert_eq!(iotcm.encode(), iotcm.encode());
    assert_eq!(iotcm.to_string(), iotcm.encode());
    assert!(!iotcm.encode().ends_with('\n'));
}

#[test]
fn test_every_command_name_is_a_cmd_constructor() {
    let envelope = encode(Command::WhyInScope {
        goal: Goal::new(0, Range::NoRange, "refl"),
    });
    assert!(envelope.contains("(Cmd_why_in_scope 0 noRange \"refl\")"));
}

#[test]
fn test_missing_target_is_a_construction_error() {
    let result = Iotcm::new(
        FILE,
        Command::ElaborateGive {
            rewrite: RewriteMode::Simplified,
            goal: Goal::new(0, Range::NoRange, ""),
        },
    );
    assert_eq!(
        result,
        Err(ConstructionError::MissingTarget {
            command: "elaborate_give"
        })
    );
}
