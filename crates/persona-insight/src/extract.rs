//! Per-cluster insight extraction.
//!
//! For each cluster and each of the six insight categories, one summarize
//! call produces at most one short insight. Accepted insights are appended
//! to the raw insight log immediately, so partial progress survives a crash
//! later in the stage. A failed call loses only that one (cluster, category)
//! pair; it never aborts the stage.

use tracing::{debug, info, warn};

use persona_core::config::InsightConfig;
use persona_core::types::{InsightCategory, RawInsight};
use persona_storage::ArtifactStore;
use persona_vector::VectorStore;

use crate::error::InsightError;
use crate::synthesis::SynthesisService;

/// Answers that mean "the model found nothing"; these never become insights.
const TRIVIAL_ANSWERS: [&str; 3] = ["none", "unknown", "n/a"];

/// Extracts categorized insights from clustered content.
pub struct InsightExtractor<S: SynthesisService> {
    synthesizer: S,
    max_items_per_analysis: usize,
    evidence_citations: usize,
    evidence_preview_chars: usize,
    source_base_url: String,
}

impl<S: SynthesisService> InsightExtractor<S> {
    pub fn new(synthesizer: S, config: &InsightConfig) -> Self {
        Self {
            synthesizer,
            max_items_per_analysis: config.max_items_per_analysis.max(1),
            evidence_citations: config.evidence_citations,
            evidence_preview_chars: config.evidence_preview_chars,
            source_base_url: config.source_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Run extraction over all clusters, appending accepted insights to the
    /// log. Any previous log is cleared first so a rebuild starts clean.
    /// Returns the number of insights written.
    pub async fn extract(
        &self,
        clusters: &[Vec<usize>],
        store: &VectorStore,
        artifacts: &ArtifactStore,
    ) -> Result<usize, InsightError> {
        artifacts.clear_insights().map_err(InsightError::Core)?;

        let mut written = 0;
        for (i, cluster) in clusters.iter().enumerate() {
            info!(
                cluster = i + 1,
                clusters = clusters.len(),
                members = cluster.len(),
                "Analyzing cluster"
            );

            let sample = self.cluster_sample(cluster, store);
            let evidence = self.cluster_evidence(cluster, store);

            for category in InsightCategory::all() {
                let prompt = category.instruction_template().replace("{texts}", &sample);

                let answer = match self.synthesizer.summarize(&prompt).await {
                    Ok(answer) => answer,
                    Err(e) => {
                        warn!(
                            cluster = i + 1,
                            category = category.as_str(),
                            error = %e,
                            "Insight synthesis failed; skipping"
                        );
                        continue;
                    }
                };

                let answer = answer.trim().to_string();
                if is_trivial(&answer) {
                    debug!(
                        cluster = i + 1,
                        category = category.as_str(),
                        "Dropping trivial answer"
                    );
                    continue;
                }

                artifacts
                    .append_insight(&RawInsight {
                        category,
                        insight: answer,
                        evidence: evidence.clone(),
                    })
                    .map_err(InsightError::Core)?;
                written += 1;
            }
        }

        info!(written, "Insight extraction complete");
        Ok(written)
    }

    /// Concatenate the first N member texts as the analysis input.
    fn cluster_sample(&self, cluster: &[usize], store: &VectorStore) -> String {
        let texts: Vec<&str> = cluster
            .iter()
            .take(self.max_items_per_analysis)
            .filter_map(|&idx| store.metadata(idx).map(|m| m.original_content.as_str()))
            .collect();
        texts.join("\n---\n")
    }

    /// Build citations from the first few cluster members: a truncated
    /// preview of the text plus its resolved public URL.
    fn cluster_evidence(&self, cluster: &[usize], store: &VectorStore) -> Vec<String> {
        cluster
            .iter()
            .take(self.evidence_citations)
            .filter_map(|&idx| store.metadata(idx))
            .map(|meta| {
                let preview: String = meta
                    .original_content
                    .chars()
                    .take(self.evidence_preview_chars)
                    .collect();
                format!(
                    "'{}...' (Source: {})",
                    preview.trim(),
                    self.resolve_url(&meta.source_locator)
                )
            })
            .collect()
    }

    /// Absolute locators pass through; relative ones get the base prefix.
    fn resolve_url(&self, locator: &str) -> String {
        if locator.starts_with("http://") || locator.starts_with("https://") {
            locator.to_string()
        } else {
            format!("{}{}", self.source_base_url, locator)
        }
    }
}

fn is_trivial(answer: &str) -> bool {
    answer.is_empty() || TRIVIAL_ANSWERS.contains(&answer.to_lowercase().as_str())
}
