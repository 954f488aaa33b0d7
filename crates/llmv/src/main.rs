//! LLM Verifier - Entry Point
//!
//! Binary entry point for the `llmv` command line tool. Reports go to
//! stdout (or `--output`), logs to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use llmv::cli::{self, Cli, Command};
use llmv_infrastructure::init_app;
use llmv_infrastructure::logging::init_logging;
use serde::Serialize;
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::warn;

fn emit<T: Serialize>(value: &T, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize report")?;
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

/// Cancel the token on Ctrl-C
fn cancel_on_interrupt() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling outstanding probes");
            token.cancel();
        }
    });
    cancel
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = cli::load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    init_logging(&config.logging).context("Failed to initialize logging")?;

    match cli.command {
        Command::Config => {
            print!("{}", cli::render_config(&config)?);
        }
        Command::Verify(args) => {
            args.apply(&mut config);
            llmv_infrastructure::config::validate_app_config(&config)
                .context("Invalid command line overrides")?;
            let context = init_app(config)?;
            let report = cli::verify(&context, &args, cancel_on_interrupt()).await?;
            emit(&report, args.output.as_deref())?;
            if !report.all_verified() {
                std::process::exit(2);
            }
        }
        Command::Score(args) => {
            let context = init_app(config)?;
            let scored = cli::score(&context, &args).await?;
            emit(&scored, None)?;
        }
        Command::Route(args) => {
            let context = init_app(config)?;
            let report = cli::route(&context, &args, &cancel_on_interrupt()).await?;
            emit(&report, None)?;
        }
        Command::Health(args) => {
            let context = init_app(config)?;
            let cancel = cancel_on_interrupt();
            if args.watch {
                context.health_checker().run(cancel).await;
            } else {
                let report = cli::health(&context, &cancel).await;
                emit(&report, None)?;
            }
        }
    }
    Ok(())
}
