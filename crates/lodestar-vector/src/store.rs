use std::any::Any;
use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use lodestar_core::error::Result;

use crate::query::VectorStoreQuery;
use crate::types::{NodeWithEmbedding, VectorStoreQueryResult};

/// Backend-specific options passed alongside `delete` and `query`.
///
/// Backends ignore keys they do not recognise.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreOptions {
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

impl StoreOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.extra.is_empty()
    }
}

/// Capability set every vector store backend implements.
///
/// Ranking, tie-breaking and score scale are backend-defined; each
/// implementation documents its own.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Whether node text is kept alongside the vectors.
    fn stores_text(&self) -> bool;

    /// Whether queries are expected to carry a dense embedding.
    fn is_embedding_query(&self) -> bool {
        true
    }

    /// The underlying driver or handle, for backend-specific operations.
    fn client(&self) -> &(dyn Any + Send + Sync);

    /// Insert or upsert embedded nodes. Returns their ids in input order.
    async fn add(&self, embedding_results: Vec<NodeWithEmbedding>) -> Result<Vec<String>>;

    /// Remove every vector derived from the given source document.
    /// Unknown ids are not an error.
    async fn delete(&self, ref_doc_id: &str, options: &StoreOptions) -> Result<()>;

    /// Run a query, returning at most `similarity_top_k` hits.
    async fn query(
        &self,
        query: &VectorStoreQuery,
        options: &StoreOptions,
    ) -> Result<VectorStoreQueryResult>;

    /// Write state so it can be restored later. `None` uses the backend's
    /// default location.
    async fn persist(&self, _persist_path: Option<&Path>) -> Result<()> {
        Ok(())
    }
}
