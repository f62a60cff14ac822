//! GlucoRisk CLI
//!
//! Scores a patient's risk of diabetes with a pre-trained classifier and
//! prints the matching risk tier with its advice.
//!
//! The model artifact is loaded once at startup; a missing or corrupt
//! artifact stops the program before any input is taken.

use anyhow::{Context, Result};
use clap::Parser;
use glucorisk_classifiers::{LoadedModel, Scorer};
use std::io;
use tracing::info;

mod cli;
mod config;
mod form;
mod render;

use cli::{Cli, Commands, ScoreArgs};
use config::AppConfig;
use form::Form;

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    let config = AppConfig::load(&cli.global.config, &cli.global)?;
    let policy = config
        .risk_policy()
        .context("Failed to load risk policy")?;
    info!(
        policy = policy.name(),
        profile = policy.profile(),
        low = policy.thresholds().low(),
        high = policy.thresholds().high(),
        "Risk policy ready"
    );

    let loaded = LoadedModel::load(&config.model).context("Failed to load model artifact")?;

    match cli.command {
        Commands::Score(args) => score(&Scorer::from_loaded(&loaded, policy), &args),
        Commands::Interactive => {
            let scorer = Scorer::from_loaded(&loaded, policy);
            let stdin = io::stdin();
            let stdout = io::stdout();
            let scored = Form::new(stdin.lock(), stdout.lock()).run(&scorer)?;
            info!(scored, "Session ended");
            Ok(())
        }
        Commands::Inspect => {
            let stdout = io::stdout();
            render::render_inspect(
                &mut stdout.lock(),
                loaded.path(),
                loaded.metadata(),
                &policy,
            )?;
            Ok(())
        }
    }
}

fn score(scorer: &Scorer, args: &ScoreArgs) -> Result<()> {
    let assessment = scorer.score_input(&args.to_input())?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        render::render_json(&mut out, &assessment)?;
    } else {
        render::render_text(&mut out, &assessment)?;
    }
    Ok(())
}

/// Initialize tracing/logging on stderr, keeping stdout for results
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("glucorisk=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glucorisk=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
