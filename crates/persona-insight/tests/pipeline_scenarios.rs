//! End-to-end pipeline scenarios over mock capabilities.
//!
//! Exercises the full chain: collected content -> indexing -> clustering ->
//! insight extraction -> aggregation, with deterministic embedding and
//! scripted synthesis.

use serde_json::json;

use persona_core::config::{ClusterConfig, InsightConfig};
use persona_core::error::PersonaError;
use persona_core::persona::Persona;
use persona_core::types::{CollectedContent, CommentRecord, ContentItem};
use persona_insight::{InsightError, InsightExtractor, KmeansClusterer, MockSynthesis, PersonaAggregator};
use persona_storage::ArtifactStore;
use persona_vector::{IndexingPipeline, MockEmbedding, VectorStore};

fn content_items(count: usize) -> Vec<ContentItem> {
    (0..count)
        .map(|i| ContentItem {
            // Three broad topics so clustering has real structure.
            text: match i % 3 {
                0 => format!("Thoughts on guitar pedals and tone shaping, take {}", i),
                1 => format!("Kubernetes deployment rollout war story number {}", i),
                _ => format!("Sourdough starter hydration experiment log {}", i),
            },
            source_locator: format!("/r/mixed/comments/{}/", i),
        })
        .collect()
}

fn clusterer(config: &ClusterConfig) -> KmeansClusterer {
    KmeansClusterer::new(
        config.max_iterations,
        config.min_points_per_cluster,
        config.seed,
    )
}

fn valid_persona_json(username: &str) -> serde_json::Value {
    json!({
        "username": username,
        "summary_bio": "A restless tinkerer spanning music, ops, and baking.",
        "demographics": {"age": "30-35", "occupation": "Engineer"},
        "psychographics": {"archetype": "Creator"},
        "interests_and_hobbies": [
            {"point": "Builds guitar pedal boards", "evidence": ["'Thoughts on guitar...' (Source: https://www.reddit.com/r/mixed/comments/0/)"]}
        ],
        "personality_traits": [{"point": "Methodical experimenter", "evidence": []}],
        "communication_style": [],
        "values_and_beliefs": [],
        "goals_and_motivations": [],
        "pain_points_and_frustrations": []
    })
}

/// Scenario A: 120 items, embedding width 3072, K=10, min 39 per cluster;
/// the clamp allows at most 3 non-empty clusters.
#[tokio::test]
async fn scenario_a_clamped_cluster_count() {
    let pipeline = IndexingPipeline::new(MockEmbedding::with_dimensions(3072), 100);
    let store = pipeline.build(&content_items(120)).await.unwrap();
    assert_eq!(store.len(), 120);
    assert_eq!(store.dimensions(), 3072);

    let config = ClusterConfig::default();
    let clusters = clusterer(&config)
        .cluster(store.vectors(), config.target_clusters)
        .unwrap();

    assert!(!clusters.is_empty());
    assert!(clusters.len() <= 3, "expected <=3 clusters, got {}", clusters.len());

    let assigned: usize = clusters.iter().map(|c| c.len()).sum();
    assert_eq!(assigned, 120);
}

/// Scenario B: a category call answering "Unknown" writes no insight for
/// that (cluster, category) pair.
#[tokio::test]
async fn scenario_b_unknown_answer_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = ArtifactStore::new(dir.path(), "tester");

    let pipeline = IndexingPipeline::new(MockEmbedding::new(), 100);
    let store = pipeline.build(&content_items(6)).await.unwrap();

    let mock = MockSynthesis::new();
    mock.push_summary("Unknown"); // first category of the only cluster

    let extractor = InsightExtractor::new(&mock, &InsightConfig::default());
    let written = extractor
        .extract(&[(0..6).collect()], &store, &artifacts)
        .await
        .unwrap();

    assert_eq!(written, 5);
    let insights = artifacts.read_insights().unwrap();
    assert_eq!(insights.len(), 5);
    for insight in &insights {
        assert_ne!(insight.insight.to_lowercase(), "unknown");
    }
}

/// Scenario C: an absent insight log fails aggregation immediately; the
/// synthesis capability is never called.
#[tokio::test]
async fn scenario_c_missing_log_short_circuits() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = ArtifactStore::new(dir.path(), "tester");
    let mock = MockSynthesis::new();

    let err = PersonaAggregator::new(&mock)
        .aggregate(&artifacts)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        InsightError::Core(PersonaError::MissingInput(_))
    ));
    assert_eq!(mock.synthesize_calls(), 0);
}

/// Scenario D: aggregation output missing a required field is a schema
/// failure and no persona artifact appears.
#[tokio::test]
async fn scenario_d_schema_failure_writes_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = ArtifactStore::new(dir.path(), "tester");

    let pipeline = IndexingPipeline::new(MockEmbedding::new(), 100);
    let store = pipeline.build(&content_items(6)).await.unwrap();

    let mock = MockSynthesis::new();
    let extractor = InsightExtractor::new(&mock, &InsightConfig::default());
    extractor
        .extract(&[(0..6).collect()], &store, &artifacts)
        .await
        .unwrap();

    let mut incomplete = valid_persona_json("tester");
    incomplete.as_object_mut().unwrap().remove("demographics");
    mock.push_json(incomplete);

    let result = PersonaAggregator::new(&mock).aggregate(&artifacts).await;
    assert!(matches!(
        result,
        Err(InsightError::Core(PersonaError::SchemaValidation(_)))
    ));
    assert!(!artifacts.persona_path().exists());
}

/// Happy path across every stage, ending in a validated persona artifact.
#[tokio::test]
async fn full_pipeline_produces_validated_persona() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = ArtifactStore::new(dir.path(), "tester");

    // Stage 0: collected content artifact.
    let content = CollectedContent {
        username: "tester".to_string(),
        posts: vec![],
        comments: content_items(30)
            .into_iter()
            .map(|item| CommentRecord {
                body: item.text,
                permalink: Some(item.source_locator),
                subreddit: None,
                created_utc: None,
            })
            .collect(),
    };
    artifacts.save_content(&content).unwrap();

    // Stage 1: index.
    let loaded = artifacts.load_content().unwrap();
    let pipeline = IndexingPipeline::new(MockEmbedding::new(), 10);
    let store = pipeline.build(&loaded.items()).await.unwrap();
    store.save(&artifacts).unwrap();

    // Stage 2: cluster + extract + aggregate, against the reloaded store.
    let store = VectorStore::load(&artifacts).unwrap();
    let cluster_config = ClusterConfig {
        min_points_per_cluster: 5,
        ..ClusterConfig::default()
    };
    let clusters = clusterer(&cluster_config)
        .cluster(store.vectors(), cluster_config.target_clusters)
        .unwrap();
    assert!(!clusters.is_empty());

    let mock = MockSynthesis::new();
    let extractor = InsightExtractor::new(&mock, &InsightConfig::default());
    let written = extractor
        .extract(&clusters, &store, &artifacts)
        .await
        .unwrap();
    assert_eq!(written, clusters.len() * 6);

    mock.push_json(valid_persona_json("tester"));
    let persona = PersonaAggregator::new(&mock)
        .aggregate(&artifacts)
        .await
        .unwrap();
    artifacts.save_persona(&persona).unwrap();

    // The persisted artifact still validates strictly on reload.
    let reloaded = artifacts.load_persona().unwrap();
    assert_eq!(reloaded.username, "tester");
    assert!(!reloaded.interests_and_hobbies.is_empty());
}

/// Re-running the cluster stage on the same persisted store is idempotent.
#[tokio::test]
async fn reclustering_persisted_store_is_stable() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = ArtifactStore::new(dir.path(), "tester");

    let pipeline = IndexingPipeline::new(MockEmbedding::new(), 100);
    let store = pipeline.build(&content_items(40)).await.unwrap();
    store.save(&artifacts).unwrap();

    let config = ClusterConfig {
        min_points_per_cluster: 10,
        ..ClusterConfig::default()
    };

    let first = clusterer(&config)
        .cluster(VectorStore::load(&artifacts).unwrap().vectors(), 4)
        .unwrap();
    let second = clusterer(&config)
        .cluster(VectorStore::load(&artifacts).unwrap().vectors(), 4)
        .unwrap();
    assert_eq!(first, second);
}

/// Validated persona parses regardless of insight evidence noise: malformed
/// log lines are skipped, well-formed ones survive.
#[tokio::test]
async fn malformed_log_lines_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let artifacts = ArtifactStore::new(dir.path(), "tester");

    artifacts
        .append_insight(&persona_core::types::RawInsight {
            category: persona_core::types::InsightCategory::Goals,
            insight: "Wants reproducible builds".to_string(),
            evidence: vec![],
        })
        .unwrap();

    // Corrupt the log with a half-written line.
    use std::io::Write;
    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .open(artifacts.insights_path())
        .unwrap();
    writeln!(file, "{{\"category\": \"goals\", \"insi").unwrap();

    let insights = artifacts.read_insights().unwrap();
    assert_eq!(insights.len(), 1);

    let mock = MockSynthesis::new();
    mock.push_json(valid_persona_json("tester"));
    let persona = PersonaAggregator::new(&mock)
        .aggregate(&artifacts)
        .await
        .unwrap();
    assert!(Persona::from_value(serde_json::to_value(&persona).unwrap()).is_ok());
}
