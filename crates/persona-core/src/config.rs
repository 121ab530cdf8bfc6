use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{PersonaError, Result};

/// Top-level configuration for the persona pipeline.
///
/// Loaded from `~/.persona/config.toml` by default. Each section corresponds
/// to one pipeline stage or cross-cutting concern.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonaConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub cluster: ClusterConfig,
    #[serde(default)]
    pub insight: InsightConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

impl PersonaConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: PersonaConfig = toml::from_str(&content)?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    ///
    /// The API key is never written to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Resolve API credentials into the config struct.
    ///
    /// Components receive the key through `ApiConfig`, never by reading the
    /// process environment themselves. Fails if no key can be found.
    pub fn resolve_credentials(&mut self) -> Result<()> {
        if !self.api.api_key.is_empty() {
            return Ok(());
        }
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => {
                self.api.api_key = key.trim().to_string();
                Ok(())
            }
            _ => Err(PersonaError::Config(
                "no API key: set OPENAI_API_KEY or [api] api_key".to_string(),
            )),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Data directory for collected content, vector stores, and reports.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.persona/data".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Language-model API settings.
///
/// `insight_model` handles the many small per-cluster extraction calls;
/// `persona_model` handles the single final aggregation call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,
    /// API key. Left empty in the file; resolved from OPENAI_API_KEY.
    #[serde(skip_serializing)]
    pub api_key: String,
    /// Embedding model name.
    pub embedding_model: String,
    /// Chat model used for per-cluster insight extraction.
    pub insight_model: String,
    /// Chat model used for the final persona aggregation.
    pub persona_model: String,
    /// Number of texts per embedding request.
    pub embedding_batch_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            embedding_model: "text-embedding-3-large".to_string(),
            insight_model: "gpt-4o-mini".to_string(),
            persona_model: "gpt-4o".to_string(),
            embedding_batch_size: 100,
        }
    }
}

/// Cluster extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Target number of thematic clusters before clamping.
    pub target_clusters: usize,
    /// Minimum points required per cluster; clamps the effective K.
    pub min_points_per_cluster: usize,
    /// Iteration cap for centroid refinement.
    pub max_iterations: usize,
    /// RNG seed for centroid initialization. Fixed seed gives
    /// reproducible cluster membership.
    pub seed: u64,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            target_clusters: 10,
            min_points_per_cluster: 39,
            max_iterations: 20,
            seed: 42,
        }
    }
}

/// Insight extraction settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Cap on cluster members used as analysis input.
    pub max_items_per_analysis: usize,
    /// Number of cluster members cited as evidence.
    pub evidence_citations: usize,
    /// Citation preview length in characters.
    pub evidence_preview_chars: usize,
    /// Prefix for relative source locators when building citation URLs.
    pub source_base_url: String,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            max_items_per_analysis: 50,
            evidence_citations: 3,
            evidence_preview_chars: 150,
            source_base_url: "https://www.reddit.com".to_string(),
        }
    }
}

/// Report layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Page width in columns.
    pub page_width: usize,
    /// Content lines per page, excluding the footer.
    pub page_lines: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            page_width: 92,
            page_lines: 54,
        }
    }
}
