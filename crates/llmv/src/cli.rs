//! Command line interface
//!
//! | Command | Description |
//! |---------|-------------|
//! | `llmv verify` | Verify the configured (or given) targets and print a report |
//! | `llmv verify --discover` | Also verify every model the providers list |
//! | `llmv route --model <id>` | Rank the providers serving a model |
//! | `llmv score` | Re-score the latest stored results |
//! | `llmv health` | Probe every provider's health check model |
//! | `llmv config` | Print the effective configuration, credentials redacted |

use crate::report::{RouteReport, ScoredModel, VerificationReport, score_results};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use llmv_application::{ProviderRouter, VerificationMode, VerificationServiceInterface};
use llmv_domain::{ModelRef, VerificationResultRepository};
use llmv_domain::error::{Error, Result};
use llmv_infrastructure::config::{AppConfig, ConfigLoader};
use llmv_infrastructure::{AppContext, ProviderHealth};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Command line interface for the LLM verifier
#[derive(Parser, Debug)]
#[command(name = "llmv")]
#[command(about = "LLM Verifier - verify, score and health-check LLM provider models")]
#[command(version)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify models and print a JSON report
    Verify(VerifyArgs),
    /// Score the latest stored verification results
    Score(ScoreArgs),
    /// Probe each provider's health check model
    Health(HealthArgs),
    /// Rank the providers serving a model
    Route(RouteArgs),
    /// Print the effective configuration
    Config,
}

/// `llmv verify` arguments
#[derive(Args, Debug, Default)]
pub struct VerifyArgs {
    /// Concurrent verification workers
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Target as provider/model; repeatable, replaces configured targets
    #[arg(short, long = "target")]
    pub targets: Vec<String>,

    /// Apply strict verification thresholds
    #[arg(long)]
    pub strict: bool,

    /// Add every model the providers list to the targets
    #[arg(long)]
    pub discover: bool,

    /// Provider to list models from; repeatable, defaults to all
    #[arg(short, long = "provider", requires = "discover")]
    pub providers: Vec<String>,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl VerifyArgs {
    /// Fold command line overrides into the configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(concurrency) = self.concurrency {
            config.verification.concurrency = concurrency;
        }
        if !self.targets.is_empty() {
            config.verification.targets.clone_from(&self.targets);
        }
        if self.strict {
            config.verification.mode = VerificationMode::Strict;
        }
    }
}

/// `llmv score` arguments
#[derive(Args, Debug, Default)]
pub struct ScoreArgs {
    /// Model id to score; repeatable, defaults to every stored model
    #[arg(short, long = "model")]
    pub models: Vec<String>,
}

/// `llmv health` arguments
#[derive(Args, Debug, Default)]
pub struct HealthArgs {
    /// Keep checking every `health.interval_secs` until interrupted
    #[arg(long)]
    pub watch: bool,
}

/// `llmv route` arguments
#[derive(Args, Debug, Default)]
pub struct RouteArgs {
    /// Model id to route
    #[arg(short, long)]
    pub model: String,

    /// Run one health round first so the ranking reflects live state
    #[arg(long)]
    pub check: bool,
}

/// Load configuration from the optional path and validate overrides
pub fn load_config(path: Option<&std::path::Path>) -> Result<AppConfig> {
    let loader = match path {
        Some(path) => ConfigLoader::new().with_config_path(path),
        None => ConfigLoader::new(),
    };
    loader.load()
}

/// Models listed by the requested providers; a provider failing to
/// list is skipped
async fn discover(
    context: &AppContext,
    args: &VerifyArgs,
    cancel: &CancellationToken,
) -> Result<Vec<ModelRef>> {
    let providers: Vec<String> = if args.providers.is_empty() {
        context.registry().ids().map(|id| id.as_str().to_string()).collect()
    } else {
        args.providers.clone()
    };
    if let Some(unknown) = providers.iter().find(|id| !context.registry().contains(id)) {
        return Err(Error::invalid_argument(format!("unknown provider '{unknown}'")));
    }

    let mut discovered = Vec::new();
    for provider in &providers {
        match context.service().discover_targets(provider, cancel).await {
            Ok(targets) => discovered.extend(targets),
            Err(error) if cancel.is_cancelled() => return Err(error),
            Err(error) => warn!(provider = %provider, error = %error, "Model listing failed, skipping provider"),
        }
    }
    Ok(discovered)
}

/// Verify the configured targets, plus the listed models with `--discover`
pub async fn verify(
    context: &AppContext,
    args: &VerifyArgs,
    cancel: CancellationToken,
) -> Result<VerificationReport> {
    let mut targets: Vec<ModelRef> = context.targets()?;
    if args.discover {
        for target in discover(context, args, &cancel).await? {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
    }
    if targets.is_empty() {
        return Err(Error::invalid_argument(
            "no targets: pass --target provider/model, --discover or set verification.targets",
        ));
    }
    for target in &targets {
        if !context.registry().contains(target.provider_id.as_str()) {
            return Err(Error::invalid_argument(format!(
                "target '{target}' references unknown provider '{}'",
                target.provider_id
            )));
        }
    }
    info!(targets = targets.len(), "Starting verification");
    let results = context
        .service()
        .verify_all(targets, context.concurrency(), cancel)
        .await?;
    Ok(VerificationReport::new(
        results,
        context.breakers().snapshots(),
        context.latency().snapshots(),
    ))
}

/// Score the latest stored results
pub async fn score(context: &AppContext, args: &ScoreArgs) -> Result<Vec<ScoredModel>> {
    let results = context.repository().latest(&args.models).await?;
    score_results(
        context.scoring(),
        context.catalog().as_ref(),
        results,
        &context.weights(),
        Utc::now().date_naive(),
    )
}

/// Rank the configured providers serving a model
pub async fn route(
    context: &AppContext,
    args: &RouteArgs,
    cancel: &CancellationToken,
) -> Result<RouteReport> {
    if args.check {
        context.health_checker().check_once(cancel).await;
    }
    let targets = context.targets()?;
    let ranking = context.router().rank_for_model(&args.model, &targets)?;
    let selected = match context.router().select_for_model(&args.model, &targets) {
        Ok(provider_id) => Some(provider_id),
        Err(Error::NoAvailableProvider { .. }) => None,
        Err(e) => return Err(e),
    };
    Ok(RouteReport {
        model_id: args.model.clone(),
        selected,
        ranking,
    })
}

/// One health round
pub async fn health(context: &AppContext, cancel: &CancellationToken) -> Vec<ProviderHealth> {
    context.health_checker().check_once(cancel).await
}

/// Effective configuration as TOML; credentials print redacted
pub fn render_config(config: &AppConfig) -> Result<String> {
    toml::to_string_pretty(config)
        .map_err(|e| Error::configuration_with_source("Failed to render configuration", e))
}
