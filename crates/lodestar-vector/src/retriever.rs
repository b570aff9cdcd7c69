use std::sync::Arc;

use tracing::debug;

use lodestar_core::error::Result;

use crate::embedding::Embedding;
use crate::filters::MetadataFilters;
use crate::query::{VectorStoreQuery, VectorStoreQueryMode};
use crate::store::{StoreOptions, VectorStore};
use crate::types::NodeWithScore;

/// A retriever that turns query text into a [`VectorStoreQuery`] and runs it.
pub struct VectorStoreRetriever {
    embedder: Arc<dyn Embedding>,
    store: Arc<dyn VectorStore>,
    similarity_top_k: usize,
    mode: VectorStoreQueryMode,
    filters: Option<MetadataFilters>,
    doc_ids: Option<Vec<String>>,
    options: StoreOptions,
}

impl VectorStoreRetriever {
    pub fn new(embedder: Arc<dyn Embedding>, store: Arc<dyn VectorStore>) -> Self {
        let defaults = VectorStoreQuery::default();
        Self {
            embedder,
            store,
            similarity_top_k: defaults.similarity_top_k,
            mode: defaults.mode,
            filters: None,
            doc_ids: None,
            options: StoreOptions::default(),
        }
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.similarity_top_k = k;
        self
    }

    pub fn with_mode(mut self, mode: VectorStoreQueryMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_filters(mut self, filters: MetadataFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn with_doc_ids(mut self, doc_ids: Vec<String>) -> Self {
        self.doc_ids = Some(doc_ids);
        self
    }

    pub fn with_store_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the query the store will receive for `query_str`.
    ///
    /// The text is embedded only when the store expects dense queries.
    pub async fn build_query(&self, query_str: &str) -> Result<VectorStoreQuery> {
        let mut query = VectorStoreQuery::new()
            .with_query_str(query_str)
            .with_top_k(self.similarity_top_k)
            .with_mode(self.mode);
        if self.store.is_embedding_query() {
            query = query.with_embedding(self.embedder.embed(query_str).await?);
        }
        query.filters = self.filters.clone();
        query.doc_ids = self.doc_ids.clone();
        Ok(query)
    }

    pub async fn retrieve(&self, query_str: &str) -> Result<Vec<NodeWithScore>> {
        let query = self.build_query(query_str).await?;
        let result = self.store.query(&query, &self.options).await?;
        let hits = result.into_scored();
        debug!(mode = %self.mode, hits = hits.len(), "retrieved nodes");
        Ok(hits)
    }
}
