use anyhow::{Context, Result};
use clap::Parser;

use refl::cli::{run_agda, Cli, CliCommand};
use refl::config::Config;
use refl::logging::{init_tracing, level_for_verbosity};
use refl::session::SessionRunner;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load config")?;

    init_tracing(level_for_verbosity(cli.verbose, &config.logging.level));
    tracing::debug!(?config, "config loaded");

    match cli.command {
        CliCommand::Repl(args) => {
            args.apply_to(&mut config);
            config.validate()?;
            SessionRunner::new(&config)?.run()?;
        }
        CliCommand::Agda(args) => run_agda(args, &config)?,
    }

    Ok(())
}
