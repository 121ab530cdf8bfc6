//! Pipeline stage wiring.
//!
//! One function per stage. Each stage reads the previous stage's persisted
//! artifact and writes its own, so any stage can be re-run independently
//! once its input exists.

use tracing::info;

use persona_core::config::PersonaConfig;
use persona_core::error::{PersonaError, Result};
use persona_insight::{InsightExtractor, KmeansClusterer, OpenAiSynthesis, PersonaAggregator};
use persona_report::{render_document, PageLayout};
use persona_storage::ArtifactStore;
use persona_vector::{IndexingPipeline, OpenAiEmbedding, VectorStore};

/// Stage 1: load collected content, embed it, persist the vector store.
pub async fn run_index(config: &PersonaConfig, artifacts: &ArtifactStore) -> Result<()> {
    let content = artifacts.load_content()?;
    let items = content.items();
    info!(
        posts = content.posts.len(),
        comments = content.comments.len(),
        "Collected content loaded"
    );

    let embedder = OpenAiEmbedding::new(&config.api);
    let pipeline = IndexingPipeline::new(embedder, config.api.embedding_batch_size);
    let store = pipeline.build(&items).await?;

    if store.is_empty() {
        return Err(PersonaError::InsufficientData(
            "no embeddable content items".to_string(),
        ));
    }

    store.save(artifacts)?;
    Ok(())
}

/// Stage 2: cluster the store, extract per-cluster insights, aggregate the
/// final persona. The persona artifact is written only when aggregation
/// succeeds and validates.
pub async fn run_profile(config: &PersonaConfig, artifacts: &ArtifactStore) -> Result<()> {
    let store = VectorStore::load(artifacts)?;

    let clusterer = KmeansClusterer::new(
        config.cluster.max_iterations,
        config.cluster.min_points_per_cluster,
        config.cluster.seed,
    );
    let clusters = clusterer.cluster(store.vectors(), config.cluster.target_clusters)?;

    let synthesis = OpenAiSynthesis::new(&config.api);

    let extractor = InsightExtractor::new(&synthesis, &config.insight);
    let written = extractor.extract(&clusters, &store, artifacts).await?;
    info!(insights = written, "Raw insights written");

    let aggregator = PersonaAggregator::new(&synthesis);
    let persona = aggregator.aggregate(artifacts).await?;
    artifacts.save_persona(&persona)?;
    Ok(())
}

/// Stage 3: render the persona as a paginated document.
pub fn run_report(config: &PersonaConfig, artifacts: &ArtifactStore) -> Result<()> {
    let persona = artifacts.load_persona()?;
    let layout = PageLayout::from_config(&config.report);
    let document = render_document(&persona, &layout);
    artifacts.save_report(&document)?;
    Ok(())
}

/// All stages in pipeline order.
pub async fn run_all(config: &PersonaConfig, artifacts: &ArtifactStore) -> Result<()> {
    run_index(config, artifacts).await?;
    run_profile(config, artifacts).await?;
    run_report(config, artifacts)
}
