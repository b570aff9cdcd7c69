use async_trait::async_trait;

use lodestar_core::error::{EmbeddingError, Result};
use lodestar_core::node::Node;

use crate::types::NodeWithEmbedding;

/// Trait for text embedding models.
#[async_trait]
pub trait Embedding: Send + Sync {
    /// Embed a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed multiple texts in a batch.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// The dimensionality of the embedding vectors.
    fn dimension(&self) -> usize;
}

/// Embed each node's text and pair the vectors with their nodes.
pub async fn embed_nodes(embedder: &dyn Embedding, nodes: Vec<Node>) -> Result<Vec<NodeWithEmbedding>> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    let texts: Vec<&str> = nodes.iter().map(|n| n.text.as_str()).collect();
    let embeddings = embedder.embed_batch(&texts).await?;
    if embeddings.len() != nodes.len() {
        return Err(EmbeddingError::Provider(format!(
            "expected {} embeddings, got {}",
            nodes.len(),
            embeddings.len()
        ))
        .into());
    }

    tracing::debug!(count = nodes.len(), dimension = embedder.dimension(), "embedded nodes");
    Ok(nodes
        .into_iter()
        .zip(embeddings)
        .map(|(node, embedding)| NodeWithEmbedding::new(node, embedding))
        .collect())
}
