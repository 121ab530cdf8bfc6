//! Persona aggregation: many small insight fragments in, one validated
//! persona out.
//!
//! This is the second half of the two-phase design: raw content is far too
//! large for a single request, so it was pre-compressed into per-cluster
//! insight fragments; the one call made here operates only on those
//! already-small summaries, plus the schema the output must conform to.

use tracing::{error, info};

use persona_core::error::PersonaError;
use persona_core::persona::Persona;
use persona_core::types::RawInsight;
use persona_storage::ArtifactStore;

use crate::error::InsightError;
use crate::synthesis::SynthesisService;

/// Merges the raw insight log into one schema-validated persona.
pub struct PersonaAggregator<S: SynthesisService> {
    synthesizer: S,
}

impl<S: SynthesisService> PersonaAggregator<S> {
    pub fn new(synthesizer: S) -> Self {
        Self { synthesizer }
    }

    /// Build the final persona for the artifact set's username.
    ///
    /// Fails without calling the capability when the insight log is absent.
    /// A capability error or a response that does not validate against the
    /// schema is the stage's failure: no retry, no coercion, no partial
    /// persona.
    pub async fn aggregate(&self, artifacts: &ArtifactStore) -> Result<Persona, InsightError> {
        let insights = artifacts.read_insights().map_err(InsightError::Core)?;
        if insights.is_empty() {
            return Err(InsightError::InsufficientData(
                "insight log contains no usable records".to_string(),
            ));
        }

        info!(
            insights = insights.len(),
            username = artifacts.username(),
            "Synthesizing final persona"
        );

        let prompt = build_prompt(artifacts.username(), &insights)?;
        let value = self.synthesizer.synthesize_json(&prompt).await?;

        match Persona::from_value(value) {
            Ok(persona) => Ok(persona),
            Err(e) => {
                error!(error = %e, "Synthesis output rejected");
                Err(InsightError::Core(e))
            }
        }
    }
}

fn build_prompt(username: &str, insights: &[RawInsight]) -> Result<String, InsightError> {
    let schema = Persona::schema_json().map_err(InsightError::Core)?;
    let insights_json =
        serde_json::to_string_pretty(insights).map_err(PersonaError::from)?;

    Ok(format!(
        "You are a master psychological and behavioral analyst. Your task is to \
         synthesize the following raw data points, extracted from user '{username}'s \
         public posts and comments, into a complete and coherent JSON persona. \
         Adhere STRICTLY to the provided JSON schema. Consolidate related points, \
         eliminate duplicates, resolve contradictions in favor of the bulk of the \
         evidence, infer demographic and psychographic data from the overall \
         context, and write a compelling 2-3 sentence summary bio.\n\n\
         **JSON Schema to follow:**\n{schema}\n\n\
         **Raw Insights Data:**\n{insights_json}\n\n\
         Generate the complete JSON object now. Do not include any text or \
         markdown outside of the JSON object itself."
    ))
}
