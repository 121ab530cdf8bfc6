//! Persona Vector crate - embedding capability and the vector store.
//!
//! Converts content items into fixed-width vectors via an OpenAI-compatible
//! embedding API (batched), and owns the ordered vector store whose index
//! positions map cluster membership back to content metadata.

pub mod embedding;
pub mod pipeline;
pub mod store;

pub use embedding::{EmbeddingService, MockEmbedding, OpenAiEmbedding};
pub use pipeline::IndexingPipeline;
pub use store::{VectorMetadata, VectorStore};
