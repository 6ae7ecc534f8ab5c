//! Typed interaction commands and the `IOTCM` envelope they travel in.
//!
//! ```text
//! IOTCM "<file>" <None|NonInteractive> Indirect (Cmd_<name> <args>)
//! ```
//!
//! Arguments are positional and per-variant; see [`Command::name`] for the
//! constructor each variant maps to.

use std::fmt;

use crate::protocol::enums::{
    encode_bool, CompileBackend, ComputeMode, RewriteMode, TokenHighlighting, UseForce,
};
use crate::protocol::error::ConstructionError;
use crate::protocol::range::{quote, Range};

/// Highlighting level slot of the envelope.
///
/// Fixed per command kind: whole-file listings and top-level compute use
/// `None`, everything else `NonInteractive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoMode {
    None,
    NonInteractive,
}

impl IoMode {
    pub fn as_str(self) -> &'static str {
        match self {
            IoMode::None => "None",
            IoMode::NonInteractive => "NonInteractive",
        }
    }
}

impl fmt::Display for IoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The goal a scoped command acts on: `<id> <range> "<expr>"`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Goal {
    pub interaction_id: u32,
    pub range: Range,
    pub expr: String,
}

impl Goal {
    pub fn new(interaction_id: u32, range: Range, expr: impl Into<String>) -> Self {
        Self {
            interaction_id,
            range,
            expr: expr.into(),
        }
    }

    /// A goal is targeted when it names a span or carries an expression.
    pub fn has_target(&self) -> bool {
        !self.range.is_empty() || !self.expr.trim().is_empty()
    }

    fn encode(&self) -> String {
        format!(
            "{} {} {}",
            self.interaction_id,
            self.range.encode(),
            quote(&self.expr)
        )
    }
}

/// Every command the protocol encoder knows how to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Compile {
        backend: CompileBackend,
        cmds: Vec<String>,
    },
    Load {
        cmds: Vec<String>,
    },
    Constraints,
    Metas,
    ShowModuleContentsToplevel {
        rewrite: RewriteMode,
        expr: String,
    },
    SearchAboutToplevel {
        rewrite: RewriteMode,
        expr: String,
    },
    SolveAll {
        rewrite: RewriteMode,
    },
    SolveOne {
        rewrite: RewriteMode,
        goal: Goal,
    },
    AutoAll,
    AutoOne {
        goal: Goal,
    },
    Auto {
        goal: Goal,
    },
    InferToplevel {
        rewrite: RewriteMode,
        expr: String,
    },
    ComputeToplevel {
        mode: ComputeMode,
        expr: String,
    },
    LoadHighlightingInfo,
    TokenHighlighting {
        remove: TokenHighlighting,
    },
    Highlight {
        goal: Goal,
    },
    Give {
        force: UseForce,
        goal: Goal,
    },
    Refine {
        goal: Goal,
    },
    Intro {
        whether: bool,
        goal: Goal,
    },
    RefineOrIntro {
        whether: bool,
        goal: Goal,
    },
    Context {
        rewrite: RewriteMode,
        goal: Goal,
    },
    HelperFunction {
        rewrite: RewriteMode,
        goal: Goal,
    },
    Infer {
        rewrite: RewriteMode,
        goal: Goal,
    },
    GoalType {
        rewrite: RewriteMode,
        goal: Goal,
    },
    ElaborateGive {
        rewrite: RewriteMode,
        goal: Goal,
    },
    GoalTypeContext {
        rewrite: RewriteMode,
        goal: Goal,
    },
    GoalTypeContextInfer {
        rewrite: RewriteMode,
        goal: Goal,
    },
    GoalTypeContextCheck {
        rewrite: RewriteMode,
        goal: Goal,
    },
    ShowModuleContents {
        rewrite: RewriteMode,
        goal: Goal,
    },
    MakeCase {
        goal: Goal,
    },
    WhyInScope {
        goal: Goal,
    },
    Compute {
        mode: ComputeMode,
        goal: Goal,
    },
    WhyInScopeToplevel {
        expr: String,
    },
    ShowVersion,
    Abort,
}

impl Command {
    /// Protocol names of every command, in declaration order.
    pub const NAMES: &'static [&'static str] = &[
        "compile",
        "load",
        "constraints",
        "metas",
        "show_module_contents_toplevel",
        "search_about_toplevel",
        "solveAll",
        "solveOne",
        "autoAll",
        "autoOne",
        "auto",
        "infer_toplevel",
        "compute_toplevel",
        "load_highlighting_info",
        "tokenHighlighting",
        "highlight",
        "give",
        "refine",
        "intro",
        "refine_or_intro",
        "context",
        "helper_function",
        "infer",
        "goal_type",
        "elaborate_give",
        "goal_type_context",
        "goal_type_context_infer",
        "goal_type_context_check",
        "show_module_contents",
        "make_case",
        "why_in_scope",
        "compute",
        "why_in_scope_toplevel",
        "show_version",
        "abort",
    ];

    /// Name of the `Cmd_` constructor, without the prefix.
    pub fn name(&self) -> &'static str {
        match self {
            Command::Compile { .. } => "compile",
            Command::Load { .. } => "load",
            Command::Constraints => "constraints",
            Command::Metas => "metas",
            Command::ShowModuleContentsToplevel { .. } => "show_module_contents_toplevel",
            Command::SearchAboutToplevel { .. } => "search_about_toplevel",
            Command::SolveAll { .. } => "solveAll",
            Command::SolveOne { .. } => "solveOne",
            Command::AutoAll => "autoAll",
            Command::AutoOne { .. } => "autoOne",
            Command::Auto { .. } => "auto",
            Command::InferToplevel { .. } => "infer_toplevel",
            Command::ComputeToplevel { .. } => "compute_toplevel",
            Command::LoadHighlightingInfo => "load_highlighting_info",
            Command::TokenHighlighting { .. } => "tokenHighlighting",
            Command::Highlight { .. } => "highlight",
            Command::Give { .. } => "give",
            Command::Refine { .. } => "refine",
            Command::Intro { .. } => "intro",
            Command::RefineOrIntro { .. } => "refine_or_intro",
            Command::Context { .. } => "context",
            Command::HelperFunction { .. } => "helper_function",
            Command::Infer { .. } => "infer",
            Command::GoalType { .. } => "goal_type",
            Command::ElaborateGive { .. } => "elaborate_give",
            Command::GoalTypeContext { .. } => "goal_type_context",
            Command::GoalTypeContextInfer { .. } => "goal_type_context_infer",
            Command::GoalTypeContextCheck { .. } => "goal_type_context_check",
            Command::ShowModuleContents { .. } => "show_module_contents",
            Command::MakeCase { .. } => "make_case",
            Command::WhyInScope { .. } => "why_in_scope",
            Command::Compute { .. } => "compute",
            Command::WhyInScopeToplevel { .. } => "why_in_scope_toplevel",
            Command::ShowVersion => "show_version",
            Command::Abort => "abort",
        }
    }

    /// Highlighting level the command is sent with.
    pub fn mode(&self) -> IoMode {
        match self {
            Command::ShowModuleContentsToplevel { .. } | Command::ComputeToplevel { .. } => {
                IoMode::None
            }
            _ => IoMode::NonInteractive,
        }
    }

    /// Checks the argument combination the backend needs.
    pub fn validate(&self) -> Result<(), ConstructionError> {
        let command = self.name();
        match self {
            Command::SolveOne { goal, .. }
            | Command::Give { goal, .. }
            | Command::Infer { goal, .. }
            | Command::ElaborateGive { goal, .. }
            | Command::GoalTypeContextInfer { goal, .. }
            | Command::GoalTypeContextCheck { goal, .. }
            | Command::ShowModuleContents { goal, .. }
            | Command::HelperFunction { goal, .. }
            | Command::WhyInScope { goal }
            | Command::Compute { goal, .. } => {
                if goal.has_target() {
                    Ok(())
                } else {
                    Err(ConstructionError::MissingTarget { command })
                }
            }
            Command::InferToplevel { expr, .. }
            | Command::ComputeToplevel { expr, .. }
            | Command::SearchAboutToplevel { expr, .. }
            | Command::WhyInScopeToplevel { expr } => {
                if expr.trim().is_empty() {
                    Err(ConstructionError::EmptyExpression { command })
                } else {
                    Ok(())
                }
            }
            _ => Ok(()),
        }
    }

    /// `Cmd_<name> <args>`, with `file` filling the file-typed arguments.
    fn encode_body(&self, file: &str) -> String {
        let mut parts = vec![format!("Cmd_{}", self.name())];
        match self {
            Command::Compile { backend, cmds } => {
                parts.push(backend.to_string());
                parts.push(quote(file));
                parts.push(encode_list(cmds));
            }
            Command::Load { cmds } => {
                parts.push(quote(file));
                parts.push(encode_list(cmds));
            }
            Command::LoadHighlightingInfo => parts.push(quote(file)),
            Command::TokenHighlighting { remove } => {
                parts.push(quote(file));
                parts.push(remove.to_string());
            }
            Command::Constraints
            | Command::Metas
            | Command::AutoAll
            | Command::ShowVersion
            | Command::Abort => {}
            Command::ShowModuleContentsToplevel { rewrite, expr }
            | Command::SearchAboutToplevel { rewrite, expr }
            | Command::InferToplevel { rewrite, expr } => {
                parts.push(rewrite.to_string());
                parts.push(quote(expr));
            }
            Command::ComputeToplevel { mode, expr } => {
                parts.push(mode.to_string());
                parts.push(quote(expr));
            }
            Command::WhyInScopeToplevel { expr } => parts.push(quote(expr)),
            Command::SolveAll { rewrite } => parts.push(rewrite.to_string()),
            Command::AutoOne { goal }
            | Command::Auto { goal }
            | Command::Highlight { goal }
            | Command::Refine { goal }
            | Command::MakeCase { goal }
            | Command::WhyInScope { goal } => parts.push(goal.encode()),
            Command::Give { force, goal } => {
                parts.push(force.to_string());
                parts.push(goal.encode());
            }
            Command::Intro { whether, goal } | Command::RefineOrIntro { whether, goal } => {
                parts.push(encode_bool(*whether).to_string());
                parts.push(goal.encode());
            }
            Command::SolveOne { rewrite, goal }
            | Command::Context { rewrite, goal }
            | Command::HelperFunction { rewrite, goal }
            | Command::Infer { rewrite, goal }
            | Command::GoalType { rewrite, goal }
            | Command::ElaborateGive { rewrite, goal }
            | Command::GoalTypeContext { rewrite, goal }
            | Command::GoalTypeContextInfer { rewrite, goal }
            | Command::GoalTypeContextCheck { rewrite, goal }
            | Command::ShowModuleContents { rewrite, goal } => {
                parts.push(rewrite.to_string());
                parts.push(goal.encode());
            }
            Command::Compute { mode, goal } => {
                parts.push(mode.to_string());
                parts.push(goal.encode());
            }
        }
        parts.join(" ")
    }
}

/// Bracketed, space-separated list of quoted strings; `[]` when empty.
fn encode_list(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|item| quote(item)).collect();
    format!("[{}]", quoted.join(" "))
}

/// A validated command addressed to one source file.
///
/// Construction is the only fallible step; [`Iotcm::encode`] is total and
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iotcm {
    file: String,
    command: Command,
}

impl Iotcm {
    pub fn new(file: impl Into<String>, command: Command) -> Result<Self, ConstructionError> {
        let file = file.into();
        if file.trim().is_empty() {
            return Err(ConstructionError::EmptyFile);
        }
        command.validate()?;
        Ok(Self { file, command })
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Full envelope line, without a trailing newline.
    pub fn encode(&self) -> String {
        format!(
            "IOTCM {} {} Indirect ({})",
            quote(&self.file),
            self.command.mode(),
            self.command.encode_body(&self.file)
        )
    }
}

impl fmt::Display for Iotcm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}
