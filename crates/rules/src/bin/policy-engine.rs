//! policy-engine — evaluates YAML policy groups against collectd samples.
//!
//! Subcommands:
//! - `run`: tick until SIGINT/SIGTERM/SIGQUIT, reloading the policy on SIGHUP
//! - `check`: validate a policy file and print every finding
//! - `parse`: parse a single expression and print it as JSON

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use policy_core::config::{load_dotenv, ReportFormat};
use policy_core::{parse_duration, Config};
use policy_rules::engine::{run_until_signal, PolicyEngine};
use policy_rules::expr::{self, ExprError};
use policy_rules::loader::PolicyLoader;
use policy_rules::report::{JsonSink, ReportSink, TextSink};
use policy_rules::validation::validate_yaml;
use policy_store::RedisStore;

// ── CLI ─────────────────────────────────────────────────────────────

/// Policy expression engine over collectd samples in Redis.
#[derive(Parser, Debug)]
#[command(name = "policy-engine", version, about)]
struct Cli {
    /// Configuration profile; keys are looked up as `{PROFILE}_{KEY}` first.
    #[arg(long, global = true, env = "POLICY_PROFILE")]
    profile: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate the policy file on every tick.
    Run {
        /// Policy YAML file (overrides POLICY_FILE).
        #[arg(long)]
        policy: Option<PathBuf>,

        /// Base tick such as `1s` or `500ms` (overrides POLICY_TICK).
        #[arg(long, value_parser = parse_tick)]
        tick: Option<Duration>,

        /// Report format: text or json (overrides POLICY_REPORT_FORMAT).
        #[arg(long)]
        format: Option<ReportFormat>,

        /// Run a single tick and exit.
        #[arg(long)]
        once: bool,
    },
    /// Validate a policy file.
    Check {
        /// Policy YAML file (overrides POLICY_FILE).
        #[arg(long)]
        policy: Option<PathBuf>,
    },
    /// Parse one expression and print the condition.
    Parse {
        /// Expression text, e.g. `vm.rx > 1000`.
        expr: String,
    },
}

fn parse_tick(s: &str) -> std::result::Result<Duration, String> {
    parse_duration(s).ok_or_else(|| format!("invalid duration '{}', expected e.g. '1s', '500ms'", s))
}

// ── main ────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    load_dotenv();
    let cli = Cli::parse();
    let mut config = match &cli.profile {
        Some(profile) => Config::for_profile(profile),
        None => Config::from_env(),
    };

    match cli.command {
        Command::Run { policy, tick, format, once } => {
            if let Some(policy) = policy {
                config.engine.policy_file = policy;
            }
            if let Some(tick) = tick {
                config.engine.tick = tick;
            }
            if let Some(format) = format {
                config.engine.report_format = format;
            }
            run(config, once).await?;
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { policy } => {
            let path = policy.unwrap_or(config.engine.policy_file);
            check(&path)
        }
        Command::Parse { expr } => parse(&expr),
    }
}

// ── Subcommands ─────────────────────────────────────────────────────

async fn run(config: Config, once: bool) -> Result<()> {
    config.log_summary();

    let sink: Arc<dyn ReportSink> = match config.engine.report_format {
        ReportFormat::Text => Arc::new(TextSink::stdout()),
        ReportFormat::Json => Arc::new(JsonSink::stdout()),
    };
    let store = RedisStore::connect(config.redis.clone())
        .await
        .context("failed to connect to redis")?;

    let loader = PolicyLoader::new(&config.engine.policy_file);
    let engine = PolicyEngine::from_loader(loader, Arc::new(store), sink)
        .with_context(|| format!("failed to load {}", config.engine.policy_file.display()))?
        .with_tick(config.engine.tick);

    if once {
        let summary = engine.run_tick(Utc::now()).await;
        info!(
            groups = summary.groups,
            evaluated = summary.evaluated,
            fired = summary.fired,
            failed = summary.failed,
            "single tick complete"
        );
        return Ok(());
    }

    run_until_signal(Arc::new(engine))
        .await
        .context("failed to install signal handlers")?;
    Ok(())
}

fn check(path: &Path) -> Result<ExitCode> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let result = validate_yaml(&contents);

    for e in &result.errors {
        println!("error: {}: {}", location(&e.path), e.message);
        if let Some(s) = &e.suggestion {
            println!("  hint: {}", s);
        }
    }
    for w in &result.warnings {
        println!("warning: {}: {}", location(&w.path), w.message);
        if let Some(s) = &w.suggestion {
            println!("  hint: {}", s);
        }
    }
    println!(
        "{}: {} error(s), {} warning(s)",
        path.display(),
        result.errors.len(),
        result.warnings.len()
    );

    Ok(if result.valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn location(path: &str) -> &str {
    if path.is_empty() {
        "<document>"
    } else {
        path
    }
}

fn parse(text: &str) -> Result<ExitCode> {
    match expr::parse(text) {
        Ok(cond) => {
            println!("{}", serde_json::to_string_pretty(&cond)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(ExprError::Syntax(e)) => {
            let column = text[..e.position].chars().count();
            eprintln!("{}", text);
            eprintln!("{}^", " ".repeat(column));
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}
