//! Runner binary for the Nature Engine.
//!
//! Runs one community against the configured mind service and writes the
//! run report as JSON.
//!
//! # Usage
//!
//! ```text
//! nature-engine [CONFIG] [REPORT]
//! ```
//!
//! `CONFIG` defaults to `nature-config.yaml`; if that default is missing,
//! built-in defaults are used. `REPORT` defaults to stdout.
//!
//! # Startup Sequence
//!
//! 1. Load configuration
//! 2. Initialize structured logging (tracing)
//! 3. Build the HTTP mind client
//! 4. Register the community and attach the tracing observer
//! 5. Simulate every generation
//! 6. Write the report

mod error;
mod observer;

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use nature_core::config::LoggingConfig;
use nature_core::{
    Community, CommunityReport, IndirectReciprocity, LogFormat, NatureConfig, PlayerObserver,
};
use nature_mind::HttpMind;
use nature_types::total_population;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::observer::TracingObserver;

const DEFAULT_CONFIG_PATH: &str = "nature-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, community creation, simulation, or
/// writing the report fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config_path = args.next().map(PathBuf::from);
    let report_path = args.next().map(PathBuf::from);

    // 1. Load configuration.
    let config = load_config(config_path.as_deref())?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!(
        mind_url = config.mind.url,
        num_onlookers = config.community.num_onlookers,
        num_generations = config.community.num_generations,
        length_of_generations = config.community.length_of_generations,
        population = total_population(&config.population),
        seed = ?config.community.seed,
        "Configuration loaded"
    );

    if let Err(e) = run(&config, report_path.as_deref()).await {
        error!(error = %e, "nature-engine failed");
        return Err(e.into());
    }
    Ok(())
}

async fn run(config: &NatureConfig, report_path: Option<&Path>) -> Result<(), EngineError> {
    // 3. Build the mind client.
    let mind = HttpMind::new(&config.mind)?;
    info!(base_url = mind.base_url(), "Mind client ready");

    // 4. Register the community.
    let mut community = Community::create(
        &mind,
        config.population.clone(),
        config.community.params(),
    )
    .await?
    .with_policy(IndirectReciprocity::new(config.payoffs));
    if let Some(seed) = config.community.seed {
        community = community.with_seed(seed);
    }
    community.observe(Arc::new(TracingObserver::new()) as Arc<dyn PlayerObserver>);

    // 5. Simulate.
    let outcome = community.simulate(&mind).await;
    let report = CommunityReport::from_community(&community);
    info!(
        community = %report.community,
        generations = report.generations.len(),
        "Run complete"
    );

    // 6. Write the report, including partial runs, before surfacing failure.
    write_report(&report, report_path)?;
    outcome?;
    Ok(())
}

/// Load configuration from `path`, or from the default location.
///
/// A missing default file means built-in defaults; a missing explicit
/// path is an error.
fn load_config(path: Option<&Path>) -> Result<NatureConfig, EngineError> {
    if let Some(path) = path {
        return Ok(NatureConfig::from_file(path)?);
    }

    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    if default_path.exists() {
        Ok(NatureConfig::from_file(default_path)?)
    } else {
        let mut config = NatureConfig::default();
        config.mind.apply_env_overrides();
        Ok(config)
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match logging.format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

fn write_report(report: &CommunityReport, path: Option<&Path>) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(path) => {
            std::fs::write(path, json)?;
            info!(path = %path.display(), "Report written");
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}
