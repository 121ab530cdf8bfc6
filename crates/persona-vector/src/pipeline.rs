//! Indexing pipeline: content items in, persisted vector store out.
//!
//! Items with empty text or no source locator are skipped; everything else
//! is embedded in batches and lands in the store in input order. Batching
//! bounds request size only and never reorders output. Any embedding
//! failure aborts the stage with no partial store.

use tracing::{debug, info};

use persona_core::error::Result;
use persona_core::types::ContentItem;

use crate::embedding::EmbeddingService;
use crate::store::{VectorMetadata, VectorStore};

/// Builds a vector store from collected content.
pub struct IndexingPipeline<E: EmbeddingService> {
    embedder: E,
    batch_size: usize,
}

impl<E: EmbeddingService> IndexingPipeline<E> {
    /// Create a pipeline with the given embedder and batch size.
    pub fn new(embedder: E, batch_size: usize) -> Self {
        Self {
            embedder,
            batch_size: batch_size.max(1),
        }
    }

    /// Embed every eligible item and return the populated store.
    pub async fn build(&self, items: &[ContentItem]) -> Result<VectorStore> {
        let eligible: Vec<&ContentItem> = items
            .iter()
            .filter(|item| !item.text.trim().is_empty() && !item.source_locator.is_empty())
            .collect();

        let skipped = items.len() - eligible.len();
        if skipped > 0 {
            debug!(skipped, "Skipped items with empty text or missing locator");
        }

        let mut store = VectorStore::new(self.embedder.dimensions());
        if eligible.is_empty() {
            return Ok(store);
        }

        info!(
            items = eligible.len(),
            batches = eligible.len().div_ceil(self.batch_size),
            "Embedding content"
        );

        for chunk in eligible.chunks(self.batch_size) {
            let texts: Vec<String> = chunk.iter().map(|item| item.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;

            for (item, vector) in chunk.iter().zip(vectors) {
                store.push(
                    vector,
                    VectorMetadata {
                        source_locator: item.source_locator.clone(),
                        original_content: item.text.clone(),
                    },
                )?;
            }
        }

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embedding::MockEmbedding;
    use persona_core::error::PersonaError;

    fn item(text: &str, locator: &str) -> ContentItem {
        ContentItem {
            text: text.to_string(),
            source_locator: locator.to_string(),
        }
    }

    /// Embedder that always fails, for abort-path tests.
    struct FailingEmbedding;

    impl EmbeddingService for FailingEmbedding {
        async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Err(PersonaError::Embedding("capability down".to_string()))
        }

        fn dimensions(&self) -> usize {
            64
        }
    }

    #[tokio::test]
    async fn test_skip_rule_and_order() {
        let pipeline = IndexingPipeline::new(MockEmbedding::new(), 100);
        let items = vec![
            item("first", "/r/a/1"),
            item("", "/r/a/2"),
            item("   ", "/r/a/3"),
            item("second", ""),
            item("third", "/r/a/5"),
        ];

        let store = pipeline.build(&items).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.metadata(0).unwrap().original_content, "first");
        assert_eq!(store.metadata(1).unwrap().original_content, "third");
    }

    #[tokio::test]
    async fn test_batching_does_not_change_output() {
        let items: Vec<ContentItem> = (0..7)
            .map(|i| item(&format!("text number {}", i), &format!("/r/a/{}", i)))
            .collect();

        let small = IndexingPipeline::new(MockEmbedding::new(), 2)
            .build(&items)
            .await
            .unwrap();
        let large = IndexingPipeline::new(MockEmbedding::new(), 100)
            .build(&items)
            .await
            .unwrap();

        assert_eq!(small.len(), large.len());
        for i in 0..small.len() {
            assert_eq!(small.reconstruct(i), large.reconstruct(i));
            assert_eq!(
                small.metadata(i).unwrap().source_locator,
                large.metadata(i).unwrap().source_locator
            );
        }
    }

    #[tokio::test]
    async fn test_empty_input_yields_empty_store() {
        let pipeline = IndexingPipeline::new(MockEmbedding::new(), 100);
        let store = pipeline.build(&[]).await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_embedding_error_aborts_stage() {
        let pipeline = IndexingPipeline::new(FailingEmbedding, 10);
        let result = pipeline.build(&[item("text", "/r/a/1")]).await;
        assert!(matches!(result, Err(PersonaError::Embedding(_))));
    }

    #[tokio::test]
    async fn test_store_dimensions_follow_embedder() {
        let pipeline = IndexingPipeline::new(MockEmbedding::with_dimensions(16), 10);
        let store = pipeline.build(&[item("text", "/r/a/1")]).await.unwrap();
        assert_eq!(store.dimensions(), 16);
        assert_eq!(store.reconstruct(0).unwrap().len(), 16);
    }
}
