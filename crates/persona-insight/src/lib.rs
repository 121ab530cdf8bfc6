//! Persona Insight crate - clustering, insight extraction, and aggregation.
//!
//! The analytical middle of the pipeline:
//! - Partition the vector store into thematic clusters (seeded k-means)
//! - Extract at most one short insight per cluster per category via the
//!   summarization capability, with citations from cluster members
//! - Aggregate the full insight log into one schema-validated persona via a
//!   single structured-synthesis call

pub mod aggregate;
pub mod cluster;
pub mod error;
pub mod extract;
pub mod synthesis;

pub use aggregate::PersonaAggregator;
pub use cluster::KmeansClusterer;
pub use error::InsightError;
pub use extract::InsightExtractor;
pub use synthesis::{MockSynthesis, OpenAiSynthesis, SynthesisService};
