//! persona binary - composition root.
//!
//! Wires the pipeline crates together:
//! 1. Parse CLI arguments and load configuration from TOML
//! 2. Initialize tracing
//! 3. Resolve the artifact directory for the requested username
//! 4. Dispatch the requested stage(s)
//!
//! Stage failures surface as a message on stderr and a non-zero exit; the
//! pipeline is resumable by re-running a stage once its input artifact
//! exists.

mod cli;
mod stages;

use clap::Parser;

use persona_core::config::PersonaConfig;
use persona_core::error::Result;
use persona_storage::artifacts::{resolve_data_dir, ArtifactStore};

use cli::{Cli, Command};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config_path = cli.resolve_config_path();
    let mut config = PersonaConfig::load_or_default(&config_path);

    // Tracing, filtered by RUST_LOG when set, the resolved level otherwise.
    let log_level = cli.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    tracing::info!("Starting persona v{}", env!("CARGO_PKG_VERSION"));

    config.general.data_dir = cli.resolve_data_dir(&config.general.data_dir);
    let data_dir = resolve_data_dir(&config.general.data_dir);
    let artifacts = ArtifactStore::new(data_dir, cli.username());

    if let Err(e) = run(&cli, &mut config, &artifacts).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli, config: &mut PersonaConfig, artifacts: &ArtifactStore) -> Result<()> {
    match &cli.command {
        Command::Index { .. } => {
            config.resolve_credentials()?;
            stages::run_index(config, artifacts).await
        }
        Command::Profile { .. } => {
            config.resolve_credentials()?;
            stages::run_profile(config, artifacts).await
        }
        Command::Report { .. } => stages::run_report(config, artifacts),
        Command::Run { .. } => {
            config.resolve_credentials()?;
            stages::run_all(config, artifacts).await
        }
    }
}
