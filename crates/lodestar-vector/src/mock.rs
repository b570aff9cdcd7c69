use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use lodestar_core::error::{EmbeddingError, Result};

use crate::embedding::Embedding;

/// A deterministic embedder for tests and demos.
///
/// Each byte of the input adds 1.0 to bucket `byte % dimension`, so equal
/// texts always produce equal vectors.
pub struct MockEmbedding {
    dimension: usize,
    call_count: AtomicUsize,
}

impl MockEmbedding {
    pub fn new(dimension: usize) -> Result<Self> {
        if dimension == 0 {
            return Err(EmbeddingError::InvalidInput("dimension must be non-zero".into()).into());
        }
        Ok(Self {
            dimension,
            call_count: AtomicUsize::new(0),
        })
    }

    /// Number of single-text embeddings computed so far.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Embedding for MockEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        let mut vector = vec![0.0f32; self.dimension];
        for byte in text.bytes() {
            vector[byte as usize % self.dimension] += 1.0;
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
