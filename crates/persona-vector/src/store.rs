//! Ordered vector store with index-aligned metadata.
//!
//! Insertion order is stable and defines each record's index; the cluster
//! extractor later refers to members by these indices, so order is
//! load-bearing. Vectors persist as a bincode artifact, metadata as a
//! line-delimited JSON file with one record per index.

use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use persona_core::error::{PersonaError, Result};
use persona_storage::ArtifactStore;

/// Metadata carried alongside each vector, index-aligned with the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorMetadata {
    pub source_locator: String,
    pub original_content: String,
}

/// On-disk shape of the vector artifact.
#[derive(Serialize, Deserialize)]
struct StoredVectors {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
}

/// Ordered collection of fixed-width embedding vectors plus metadata.
#[derive(Debug, Clone)]
pub struct VectorStore {
    dimensions: usize,
    vectors: Vec<Vec<f32>>,
    metadata: Vec<VectorMetadata>,
}

impl VectorStore {
    /// Create an empty store for vectors of the given width.
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            vectors: Vec::new(),
            metadata: Vec::new(),
        }
    }

    /// Append a vector and its metadata; the record's index is the current
    /// length. A width mismatch is an error; dimensionality is constant
    /// across one store.
    pub fn push(&mut self, vector: Vec<f32>, metadata: VectorMetadata) -> Result<()> {
        if vector.len() != self.dimensions {
            return Err(PersonaError::Storage(format!(
                "vector width {} does not match store width {}",
                vector.len(),
                self.dimensions
            )));
        }
        self.vectors.push(vector);
        self.metadata.push(metadata);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Reconstruct the raw vector at an index.
    pub fn reconstruct(&self, index: usize) -> Option<&[f32]> {
        self.vectors.get(index).map(|v| v.as_slice())
    }

    /// Bulk vector access for clustering.
    pub fn vectors(&self) -> &[Vec<f32>] {
        &self.vectors
    }

    pub fn metadata(&self, index: usize) -> Option<&VectorMetadata> {
        self.metadata.get(index)
    }

    pub fn metadata_records(&self) -> &[VectorMetadata] {
        &self.metadata
    }

    /// Persist the store as a binary vector artifact plus an index-aligned
    /// metadata file.
    pub fn save(&self, artifacts: &ArtifactStore) -> Result<()> {
        artifacts.ensure_root()?;

        let stored = StoredVectors {
            dimensions: self.dimensions,
            vectors: self.vectors.clone(),
        };
        let bytes = bincode::serialize(&stored)
            .map_err(|e| PersonaError::Storage(format!("encode vectors: {}", e)))?;
        std::fs::write(artifacts.vectors_path(), bytes)?;

        let mut meta_file = std::fs::File::create(artifacts.vectors_meta_path())?;
        for record in &self.metadata {
            let line = serde_json::to_string(record)?;
            writeln!(meta_file, "{}", line)?;
        }

        info!(
            records = self.len(),
            dimensions = self.dimensions,
            "Vector store saved"
        );
        Ok(())
    }

    /// Load a previously saved store.
    ///
    /// Either artifact being absent is a `MissingInput` error. Metadata is
    /// index-aligned, so a malformed line here is corruption, not something
    /// to skip over.
    pub fn load(artifacts: &ArtifactStore) -> Result<Self> {
        let vectors_path = artifacts.vectors_path();
        let meta_path = artifacts.vectors_meta_path();
        if !vectors_path.exists() || !meta_path.exists() {
            return Err(PersonaError::MissingInput(format!(
                "vector store for '{}' not found; run the index stage first",
                artifacts.username()
            )));
        }

        let bytes = std::fs::read(&vectors_path)?;
        let stored: StoredVectors = bincode::deserialize(&bytes)
            .map_err(|e| PersonaError::Storage(format!("decode vectors: {}", e)))?;

        let metadata = read_metadata(&meta_path)?;
        if metadata.len() != stored.vectors.len() {
            return Err(PersonaError::Storage(format!(
                "metadata count {} does not match vector count {}",
                metadata.len(),
                stored.vectors.len()
            )));
        }

        Ok(Self {
            dimensions: stored.dimensions,
            vectors: stored.vectors,
            metadata,
        })
    }
}

fn read_metadata(path: &Path) -> Result<Vec<VectorMetadata>> {
    let content = std::fs::read_to_string(path)?;
    let mut records = Vec::new();
    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: VectorMetadata = serde_json::from_str(line).map_err(|e| {
            PersonaError::Storage(format!(
                "metadata line {} in {}: {}",
                line_no + 1,
                path.display(),
                e
            ))
        })?;
        records.push(record);
    }
    Ok(records)
}
