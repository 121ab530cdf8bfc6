//! Per-username artifact file layout and accessors.

use std::path::{Path, PathBuf};

use tracing::info;

use persona_core::error::{PersonaError, Result};
use persona_core::persona::Persona;
use persona_core::types::{CollectedContent, RawInsight};

use crate::jsonl;

/// The set of flat-file artifacts belonging to one username.
///
/// Each pipeline stage is the single writer of exactly one artifact here and
/// reads the previous stage's artifact read-only, which is what makes the
/// pipeline resumable stage-by-stage.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
    username: String,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>, username: &str) -> Self {
        Self {
            root: root.into(),
            username: username.to_string(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Create the artifact directory if it does not exist yet.
    pub fn ensure_root(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root)?;
        Ok(())
    }

    fn named(&self, suffix: &str) -> PathBuf {
        self.root.join(format!("{}_{}", self.username, suffix))
    }

    /// Raw collected content, the input boundary of the pipeline.
    pub fn content_path(&self) -> PathBuf {
        self.named("content.json")
    }

    /// Binary vector store artifact.
    pub fn vectors_path(&self) -> PathBuf {
        self.named("vectors.bin")
    }

    /// Metadata records, index-aligned with the vector store.
    pub fn vectors_meta_path(&self) -> PathBuf {
        self.named("vectors_meta.jsonl")
    }

    /// Append-only raw insight log.
    pub fn insights_path(&self) -> PathBuf {
        self.named("insights_raw.jsonl")
    }

    /// Final persona artifact.
    pub fn persona_path(&self) -> PathBuf {
        self.named("persona.json")
    }

    /// Rendered report document.
    pub fn report_path(&self) -> PathBuf {
        self.named("persona_report.txt")
    }

    // ── collected content ───────────────────────────────────────────

    pub fn load_content(&self) -> Result<CollectedContent> {
        let path = self.content_path();
        if !path.exists() {
            return Err(PersonaError::MissingInput(format!(
                "collected content for '{}' not found at {}",
                self.username,
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(&path)?;
        let content: CollectedContent = serde_json::from_str(&raw)
            .map_err(|e| PersonaError::Storage(format!("parse {}: {}", path.display(), e)))?;
        Ok(content)
    }

    pub fn save_content(&self, content: &CollectedContent) -> Result<()> {
        self.ensure_root()?;
        let path = self.content_path();
        std::fs::write(&path, serde_json::to_string_pretty(content)?)?;
        info!(path = %path.display(), "Collected content saved");
        Ok(())
    }

    // ── insight log ─────────────────────────────────────────────────

    pub fn insights_exist(&self) -> bool {
        self.insights_path().exists()
    }

    /// Remove any previous insight log so a rebuild starts clean.
    pub fn clear_insights(&self) -> Result<()> {
        let path = self.insights_path();
        if path.exists() {
            std::fs::remove_file(&path)?;
            info!(path = %path.display(), "Cleared previous insight log");
        }
        Ok(())
    }

    /// Append one insight record; durable immediately (append-on-success).
    pub fn append_insight(&self, insight: &RawInsight) -> Result<()> {
        self.ensure_root()?;
        jsonl::append_record(&self.insights_path(), insight)
    }

    /// Read the full insight log, skipping malformed lines with a warning.
    ///
    /// An absent log is a `MissingInput` error; the caller must not proceed
    /// to synthesis without it.
    pub fn read_insights(&self) -> Result<Vec<RawInsight>> {
        let path = self.insights_path();
        if !path.exists() {
            return Err(PersonaError::MissingInput(format!(
                "raw insights for '{}' not found at {}",
                self.username,
                path.display()
            )));
        }
        jsonl::read_records(&path)
    }

    // ── persona ─────────────────────────────────────────────────────

    pub fn save_persona(&self, persona: &Persona) -> Result<()> {
        self.ensure_root()?;
        let path = self.persona_path();
        std::fs::write(&path, serde_json::to_string_pretty(persona)?)?;
        info!(path = %path.display(), "Persona saved");
        Ok(())
    }

    pub fn load_persona(&self) -> Result<Persona> {
        let path = self.persona_path();
        if !path.exists() {
            return Err(PersonaError::MissingInput(format!(
                "persona for '{}' not found at {}",
                self.username,
                path.display()
            )));
        }
        let raw = std::fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| PersonaError::Storage(format!("parse {}: {}", path.display(), e)))?;
        Persona::from_value(value)
    }

    // ── report ──────────────────────────────────────────────────────

    pub fn save_report(&self, document: &str) -> Result<()> {
        self.ensure_root()?;
        let path = self.report_path();
        std::fs::write(&path, document)?;
        info!(path = %path.display(), "Report saved");
        Ok(())
    }
}

/// Expand a leading `~/` to the user's home directory.
pub fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if let Some(rest) = data_dir.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        return Path::new(&home).join(rest);
    }
    PathBuf::from(data_dir)
}
