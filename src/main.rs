use anyhow::Context;
use std::fs;
use std::path::PathBuf;
use towerledger::{
    Transaction,
    config::{Config, LoggingConfig},
    validation::{VerificationReport, Verifier},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG: &str = "config/default.toml";

/// Offline verifier for candidate transactions.
///
/// Usage: `towerledger-verify [TX.json ...]`. The configuration file is taken
/// from `TOWERLEDGER_CONFIG`, falling back to `config/default.toml`. Without
/// arguments every `*.json` file in the configured inbox is verified.
/// One JSON report per transaction is printed to stdout; logs go to stderr.
fn main() -> anyhow::Result<()> {
    let config_path =
        std::env::var("TOWERLEDGER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("failed to load configuration from {config_path}"))?;
    init_tracing(&config.logging);
    info!("Verifier starting with config: {:?}", config);

    let mut paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        paths = config.verifier.inbox_transactions()?;
    }

    let verifier = Verifier::new();
    let mut rejected = 0usize;
    for path in &paths {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let tx: Transaction = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse transaction {}", path.display()))?;

        let result = verifier.verify(&tx);
        let report = VerificationReport::new(tx.id, &result);
        println!("{}", serde_json::to_string(&report)?);

        if result.is_err() {
            rejected += 1;
            if config.verifier.stop_on_first_rejection {
                break;
            }
        }
    }

    info!("Verified {} transaction(s), {} rejected", paths.len(), rejected);
    if rejected > 0 {
        anyhow::bail!("{rejected} transaction(s) rejected");
    }
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(logging.ansi)
        .with_writer(std::io::stderr)
        .init();
}
