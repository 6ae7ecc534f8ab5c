//! Command-line surface: `refl repl` and `refl agda <command>`.
//!
//! The `agda` subcommands mirror the protocol one to one; the same grammar
//! is reused for `:`-prefixed REPL input.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};

use crate::config::Config;
use crate::protocol::{
    CompileBackend, Command, ComputeMode, EncodingError, Goal, Iotcm, Range, RewriteMode,
    TokenHighlighting, UseForce,
};
use crate::session::{split_command_line, BackendInvocation};

#[derive(Debug, Parser)]
#[command(name = "refl", version, about = "Refl, the Agda REPL")]
pub struct Cli {
    /// Config file (default: ~/.config/refl/config.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More logging: -v for debug, -vv for trace.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Start an Agda REPL.
    Repl(ReplArgs),
    /// Encode an interaction command, optionally sending it to Agda.
    Agda(AgdaArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct ReplArgs {
    /// Agda module imported into every session.
    #[arg(long)]
    pub prelude: Option<PathBuf>,

    /// Agda executable.
    #[arg(long)]
    pub agda: Option<PathBuf>,

    /// Extra include directory, repeatable.
    #[arg(short = 'i', long = "include-path")]
    pub include_paths: Vec<PathBuf>,

    /// History file (default: ~/.refl_history).
    #[arg(long)]
    pub history: Option<PathBuf>,

    /// Directory Agda runs in (default: the session's temp directory).
    #[arg(long)]
    pub working_dir: Option<PathBuf>,
}

impl ReplArgs {
    /// Flags win over the config file.
    pub fn apply_to(self, config: &mut Config) {
        if let Some(prelude) = self.prelude {
            config.repl.prelude = Some(prelude);
        }
        if let Some(agda) = self.agda {
            config.backend.executable = agda;
        }
        for path in self.include_paths {
            if !config.backend.include_paths.contains(&path) {
                config.backend.include_paths.push(path);
            }
        }
        if let Some(history) = self.history {
            config.repl.history = Some(history);
        }
        if let Some(dir) = self.working_dir {
            config.backend.working_dir = Some(dir);
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AgdaArgs {
    /// Path of file to load (absolute or relative).
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Load the file in `agda --interaction` and send the command.
    #[arg(long, global = true)]
    pub exec: bool,

    /// Agda executable used with --exec.
    #[arg(long, global = true)]
    pub agda: Option<PathBuf>,

    #[command(subcommand)]
    pub command: AgdaCommand,
}

#[derive(Debug, Clone, Args)]
pub struct RewriteArg {
    /// Rewrite mode: AsIs, Instantiated, HeadNormal, Simplified, Normalised.
    #[arg(short, long, default_value_t)]
    pub rewrite: RewriteMode,
}

#[derive(Debug, Clone, Args)]
pub struct ComputeArg {
    /// Computation mode: DefaultCompute, IgnoreAbstract, UseShowInstance.
    #[arg(
        short = 'c',
        long = "compute-mode",
        visible_alias = "computeMode",
        default_value_t
    )]
    pub compute_mode: ComputeMode,
}

#[derive(Debug, Clone, Args)]
pub struct ExprArg {
    /// Expression.
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    pub expr: String,
}

#[derive(Debug, Clone, Args)]
pub struct GoalArgs {
    /// Interaction id of the goal.
    #[arg(
        short = 'i',
        long = "interaction-id",
        visible_alias = "interactionId",
        default_value_t = 0
    )]
    pub interaction_id: u32,

    /// Position as LINE:COL:OFFSET-LINE:COL:OFFSET, comma-separated for
    /// several intervals. Without one, most commands need --expr.
    #[arg(short = 'w', long = "where")]
    pub range: Option<String>,

    /// Expression, in case no position (--where) is given.
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    pub expr: String,
}

impl GoalArgs {
    fn into_goal(self, file: &Path) -> Result<Goal, EncodingError> {
        let range = match self.range {
            Some(text) => Range::parse(Some(file.to_path_buf()), &text)?,
            None => Range::NoRange,
        };
        Ok(Goal::new(self.interaction_id, range, self.expr))
    }
}

/// One protocol command with its flags.
#[derive(Debug, Clone, Subcommand)]
#[command(rename_all = "snake_case")]
pub enum AgdaCommand {
    /// Compile agda code in a file.
    Compile {
        /// Backend: GHC, GHCNoMain, LaTeX, QuickLaTeX.
        #[arg(short, long, default_value_t)]
        backend: CompileBackend,
        /// Backend options, comma-separated.
        #[arg(short, long, value_delimiter = ',')]
        cmds: Vec<String>,
    },
    /// Load a file and type check it.
    Load {
        /// Backend options, comma-separated.
        #[arg(short, long, value_delimiter = ',')]
        cmds: Vec<String>,
    },
    /// Check constraints.
    Constraints,
    /// Show all goals in a file.
    Metas,
    /// List all module contents.
    ShowModuleContentsToplevel {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        expr: ExprArg,
    },
    /// Search about a keyword.
    SearchAboutToplevel {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        expr: ExprArg,
    },
    /// Solve all constraints in a file.
    #[command(name = "solveAll")]
    SolveAll {
        #[command(flatten)]
        rewrite: RewriteArg,
    },
    /// Solve one constraint in a given expression.
    #[command(name = "solveOne")]
    SolveOne {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Automatic proof search, entire file.
    #[command(name = "autoAll")]
    AutoAll,
    /// Automatic proof search, specific hole.
    #[command(name = "autoOne")]
    AutoOne {
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Automatic proof search, specific hole.
    Auto {
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Infer the type of an expression.
    InferToplevel {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        expr: ExprArg,
    },
    /// Compute the normal form, whole file.
    ComputeToplevel {
        #[command(flatten)]
        compute: ComputeArg,
        #[command(flatten)]
        expr: ExprArg,
    },
    /// Load highlighting info for a file.
    LoadHighlightingInfo,
    /// Highlight tokens.
    #[command(name = "tokenHighlighting")]
    TokenHighlighting {
        /// Remove or Keep the highlighting file afterwards.
        #[arg(long, default_value_t)]
        remove: TokenHighlighting,
    },
    /// Highlight an expression in a goal.
    Highlight {
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Fill a goal.
    Give {
        /// WithForce or WithoutForce.
        #[arg(long, default_value_t)]
        force: UseForce,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Refine: makes new holes for missing arguments.
    Refine {
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Introduce a constructor or lambda.
    Intro {
        /// Pass True to the backend.
        #[arg(long)]
        whether: bool,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Refine, or introduce when the goal is empty.
    RefineOrIntro {
        /// Pass True to the backend.
        #[arg(long)]
        whether: bool,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Context of the goal.
    Context {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Type of a helper function that would solve the goal.
    HelperFunction {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Infer type.
    Infer {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Goal type.
    GoalType {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Check the expression against the goal and return the elaborated term.
    ElaborateGive {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Current goal and context.
    GoalTypeContext {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Current goal and context, plus the inferred type of an expression.
    GoalTypeContextInfer {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Current goal and context, checking the expression against the goal.
    GoalTypeContextCheck {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Top-level names of a module, in the scope of the goal.
    ShowModuleContents {
        #[command(flatten)]
        rewrite: RewriteArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Pattern match on variables (case split).
    MakeCase {
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Explain why a name is in scope.
    WhyInScope {
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Compute the normal form of the selection or the expression.
    Compute {
        #[command(flatten)]
        compute: ComputeArg,
        #[command(flatten)]
        goal: GoalArgs,
    },
    /// Explain why a name is in scope, entire file.
    WhyInScopeToplevel {
        #[command(flatten)]
        expr: ExprArg,
    },
    /// Show the backend version.
    ShowVersion,
    /// Abort the current action.
    Abort,
}

impl AgdaCommand {
    /// Typed command; ranges are resolved against `range_file`.
    pub fn into_command(self, range_file: &Path) -> Result<Command, EncodingError> {
        let command = match self {
            AgdaCommand::Compile { backend, cmds } => Command::Compile { backend, cmds },
            AgdaCommand::Load { cmds } => Command::Load { cmds },
            AgdaCommand::Constraints => Command::Constraints,
            AgdaCommand::Metas => Command::Metas,
            AgdaCommand::ShowModuleContentsToplevel { rewrite, expr } => {
                Command::ShowModuleContentsToplevel {
                    rewrite: rewrite.rewrite,
                    expr: expr.expr,
                }
            }
            AgdaCommand::SearchAboutToplevel { rewrite, expr } => Command::SearchAboutToplevel {
                rewrite: rewrite.rewrite,
                expr: expr.expr,
            },
            AgdaCommand::SolveAll { rewrite } => Command::SolveAll {
                rewrite: rewrite.rewrite,
            },
            AgdaCommand::SolveOne { rewrite, goal } => Command::SolveOne {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::AutoAll => Command::AutoAll,
            AgdaCommand::AutoOne { goal } => Command::AutoOne {
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::Auto { goal } => Command::Auto {
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::InferToplevel { rewrite, expr } => Command::InferToplevel {
                rewrite: rewrite.rewrite,
                expr: expr.expr,
            },
            AgdaCommand::ComputeToplevel { compute, expr } => Command::ComputeToplevel {
                mode: compute.compute_mode,
                expr: expr.expr,
            },
            AgdaCommand::LoadHighlightingInfo => Command::LoadHighlightingInfo,
            AgdaCommand::TokenHighlighting { remove } => Command::TokenHighlighting { remove },
            AgdaCommand::Highlight { goal } => Command::Highlight {
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::Give { force, goal } => Command::Give {
                force,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::Refine { goal } => Command::Refine {
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::Intro { whether, goal } => Command::Intro {
                whether,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::RefineOrIntro { whether, goal } => Command::RefineOrIntro {
                whether,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::Context { rewrite, goal } => Command::Context {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::HelperFunction { rewrite, goal } => Command::HelperFunction {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::Infer { rewrite, goal } => Command::Infer {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::GoalType { rewrite, goal } => Command::GoalType {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::ElaborateGive { rewrite, goal } => Command::ElaborateGive {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::GoalTypeContext { rewrite, goal } => Command::GoalTypeContext {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::GoalTypeContextInfer { rewrite, goal } => Command::GoalTypeContextInfer {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::GoalTypeContextCheck { rewrite, goal } => Command::GoalTypeContextCheck {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::ShowModuleContents { rewrite, goal } => Command::ShowModuleContents {
                rewrite: rewrite.rewrite,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::MakeCase { goal } => Command::MakeCase {
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::WhyInScope { goal } => Command::WhyInScope {
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::Compute { compute, goal } => Command::Compute {
                mode: compute.compute_mode,
                goal: goal.into_goal(range_file)?,
            },
            AgdaCommand::WhyInScopeToplevel { expr } => Command::WhyInScopeToplevel { expr: expr.expr },
            AgdaCommand::ShowVersion => Command::ShowVersion,
            AgdaCommand::Abort => Command::Abort,
        };
        Ok(command)
    }
}

/// Envelope for `command` addressed to `file`.
///
/// The envelope carries `file` verbatim; ranges get its absolute form.
pub fn build_iotcm(file: &Path, command: AgdaCommand) -> Result<Iotcm> {
    let absolute = std::path::absolute(file)
        .with_context(|| format!("failed to resolve '{}'", file.display()))?;
    let command = command.into_command(&absolute)?;
    Ok(Iotcm::new(file.display().to_string(), command)?)
}

/// `:`-line grammar: an [`AgdaCommand`] with an optional `--file`.
#[derive(Debug, Parser)]
#[command(name = ":", no_binary_name = true)]
struct MetaLine {
    #[arg(short, long, global = true)]
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: AgdaCommand,
}

/// Parse REPL input after the `:` marker; `--file` defaults to
/// `default_file`.
pub fn parse_meta_command(line: &str, default_file: &Path) -> Result<Iotcm> {
    let meta = MetaLine::try_parse_from(split_command_line(line))?;
    let file = meta.file.unwrap_or_else(|| default_file.to_path_buf());
    build_iotcm(&file, meta.command)
}

/// Lines sent by `--exec`: the file is loaded first unless the command is
/// the load itself.
pub fn exec_sequence(iotcm: Iotcm) -> Result<Vec<Iotcm>> {
    if matches!(iotcm.command(), Command::Load { .. }) {
        return Ok(vec![iotcm]);
    }
    let load = Iotcm::new(iotcm.file(), Command::Load { cmds: Vec::new() })?;
    Ok(vec![load, iotcm])
}

/// `refl agda`: print the envelope, and send it when asked.
pub fn run_agda(args: AgdaArgs, config: &Config) -> Result<()> {
    let file = args.file.context("--file is required")?;
    let iotcm = build_iotcm(&file, args.command)?;
    println!("{iotcm}");

    if !args.exec {
        return Ok(());
    }

    let executable = args.agda.unwrap_or_else(|| config.backend.executable.clone());
    let working_dir = match &config.backend.working_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to read current directory")?,
    };
    let invocation = BackendInvocation::new(executable, working_dir)
        .with_include_paths(config.backend.include_paths.iter().cloned());

    let status = invocation.interact(&exec_sequence(iotcm)?)?;
    if !status.success() {
        bail!("'{}' exited with {status}", invocation.executable().display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repl_flags_override_config() {
        let mut config = Config::default();
        config.backend.include_paths.push(PathBuf::from("/lib"));
        ReplArgs {
            agda: Some(PathBuf::from("/opt/agda-2.6/bin/agda")),
            include_paths: vec![PathBuf::from("/lib"), PathBuf::from("/extra")],
            ..ReplArgs::default()
        }
        .apply_to(&mut config);

        assert_eq!(config.backend.executable, PathBuf::from("/opt/agda-2.6/bin/agda"));
        assert_eq!(
            config.backend.include_paths,
            vec![PathBuf::from("/lib"), PathBuf::from("/extra")]
        );
        assert!(config.repl.prelude.is_none());
    }

    #[test]
    fn meta_line_defaults_to_scratch_file() {
        let iotcm =
            parse_meta_command(r#"compute_toplevel -e "suc zero""#, Path::new("/tmp/reflX.agda"))
                .unwrap();
        assert_eq!(
            iotcm.encode(),
            r#"IOTCM "/tmp/reflX.agda" None Indirect (Cmd_compute_toplevel DefaultCompute "suc zero")"#
        );
    }

    #[test]
    fn meta_line_range_uses_file() {
        let iotcm = parse_meta_command(
            "autoOne -i 2 -w 6:6:8-6:6:12",
            Path::new("/tmp/reflX.agda"),
        )
        .unwrap();
        assert_eq!(
            iotcm.encode(),
            r#"IOTCM "/tmp/reflX.agda" NonInteractive Indirect (Cmd_autoOne 2 (intervalsToRange (Just (mkAbsolute "/tmp/reflX.agda")) [Interval  (Pn () 6 6 8 ) (Pn () 6 6 12 ) ]) "")"#
        );
    }

    #[test]
    fn meta_line_rejects_unknown_command() {
        assert!(parse_meta_command("hello world", Path::new("/tmp/x.agda")).is_err());
    }

    #[test]
    fn meta_line_rejects_bad_enum() {
        assert!(parse_meta_command("solveAll -r Fast", Path::new("/tmp/x.agda")).is_err());
    }

    #[test]
    fn exec_loads_before_other_commands() {
        let iotcm = Iotcm::new("a.agda", Command::Metas).unwrap();
        let names: Vec<&str> = exec_sequence(iotcm)
            .unwrap()
            .iter()
            .map(|line| line.command().name())
            .collect();
        assert_eq!(names, vec!["load", "metas"]);
    }

    #[test]
    fn exec_does_not_double_load() {
        let iotcm = Iotcm::new("a.agda", Command::Load { cmds: Vec::new() }).unwrap();
        assert_eq!(exec_sequence(iotcm).unwrap().len(), 1);
    }
}
