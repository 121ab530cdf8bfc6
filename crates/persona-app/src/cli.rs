//! CLI argument definitions for the persona binary.
//!
//! Uses `clap` with derive macros for ergonomic argument parsing.
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// persona: builds a behavioral profile of a social-media user from their
/// public posts and comments.
#[derive(Parser, Debug)]
#[command(name = "persona", version, about)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Data directory for collected content and generated artifacts.
    #[arg(short = 'd', long = "data-dir")]
    pub data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Embed collected content and build the vector store.
    Index { username: String },
    /// Cluster the store, extract insights, and synthesize the persona.
    Profile { username: String },
    /// Render the persona as a paginated report document.
    Report { username: String },
    /// Run index, profile, and report in order.
    Run { username: String },
}

impl Cli {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > PERSONA_CONFIG env var > ~/.persona/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("PERSONA_CONFIG") {
            return PathBuf::from(p);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".persona").join("config.toml");
        }
        PathBuf::from("config.toml")
    }

    /// Resolve the data directory.
    ///
    /// Priority: --data-dir flag > config file value.
    pub fn resolve_data_dir(&self, config_dir: &str) -> String {
        self.data_dir
            .as_ref()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_else(|| config_dir.to_string())
    }

    /// Resolve the log level.
    ///
    /// Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    pub fn username(&self) -> &str {
        match &self.command {
            Command::Index { username }
            | Command::Profile { username }
            | Command::Report { username }
            | Command::Run { username } => username,
        }
    }
}
