use std::any::Any;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

use lodestar_core::config::PersistConfig;
use lodestar_core::error::{Result, VectorStoreError};

use crate::query::{VectorStoreQuery, VectorStoreQueryMode};
use crate::store::{StoreOptions, VectorStore};
use crate::types::{NodeWithEmbedding, VectorStoreQueryResult, all_finite, cosine_similarity};

const STORE_NAME: &str = "InMemoryVectorStore";

/// Everything the in-memory store holds, keyed by node id.
///
/// This is also the on-disk format written by `persist`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreData {
    #[serde(default)]
    pub entries: BTreeMap<String, NodeWithEmbedding>,
}

/// An in-memory vector store.
///
/// Keeps node text (`stores_text` is true) and supports only the `default`
/// query mode: cosine similarity, highest first, ties broken by node id.
/// Safe to share across tasks; every operation takes an async `RwLock`.
/// `persist` writes a JSON snapshot and is the only operation doing I/O.
pub struct InMemoryVectorStore {
    data: RwLock<StoreData>,
    persist_config: PersistConfig,
}

impl InMemoryVectorStore {
    pub fn new() -> Self {
        Self::from_data(StoreData::default(), PersistConfig::default())
    }

    fn from_data(data: StoreData, persist_config: PersistConfig) -> Self {
        Self {
            data: RwLock::new(data),
            persist_config,
        }
    }

    /// Where `persist(None)` writes.
    pub fn with_persist_config(mut self, config: PersistConfig) -> Self {
        self.persist_config = config;
        self
    }

    pub fn persist_config(&self) -> &PersistConfig {
        &self.persist_config
    }

    /// Restore a store from a file written by `persist`.
    ///
    /// The restored store persists back to the same file by default.
    pub async fn from_persist_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let data: StoreData = serde_json::from_slice(&bytes)?;

        let mut config = PersistConfig::default();
        if let Some(parent) = path.parent() {
            config = config.with_persist_dir(parent);
        }
        if let Some(fname) = path.file_name() {
            config = config.with_persist_fname(fname.to_string_lossy());
        }

        info!(path = %path.display(), entries = data.entries.len(), "loaded vector store");
        Ok(Self::from_data(data, config))
    }

    pub async fn from_persist_config(config: PersistConfig) -> Result<Self> {
        let store = Self::from_persist_path(config.persist_path()).await?;
        Ok(store.with_persist_config(config))
    }

    pub async fn len(&self) -> usize {
        self.data.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Look up a stored node by its own id.
    pub async fn get(&self, node_id: &str) -> Option<NodeWithEmbedding> {
        self.data.read().await.entries.get(node_id).cloned()
    }

    fn resolve_path(&self, persist_path: Option<&Path>) -> Result<PathBuf> {
        let path = persist_path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.persist_config.persist_path());
        if path.file_name().is_none() {
            return Err(VectorStoreError::Persist(format!(
                "persist path '{}' has no file name",
                path.display()
            ))
            .into());
        }
        Ok(path)
    }
}

impl Default for InMemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn log_ignored_options(op: &str, options: &StoreOptions) {
    if !options.is_empty() {
        let keys: Vec<&String> = options.extra.keys().collect();
        debug!(op, ?keys, "ignoring unrecognised store options");
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    fn stores_text(&self) -> bool {
        true
    }

    fn client(&self) -> &(dyn Any + Send + Sync) {
        &self.data
    }

    async fn add(&self, embedding_results: Vec<NodeWithEmbedding>) -> Result<Vec<String>> {
        if embedding_results.is_empty() {
            return Ok(Vec::new());
        }

        let mut data = self.data.write().await;

        // Validate the whole batch before inserting so a rejected batch
        // leaves the store untouched.
        let expected = data
            .entries
            .values()
            .next()
            .map(NodeWithEmbedding::dimension)
            .unwrap_or_else(|| embedding_results[0].dimension());
        for result in &embedding_results {
            if result.dimension() != expected {
                return Err(VectorStoreError::DimensionMismatch {
                    expected,
                    actual: result.dimension(),
                }
                .into());
            }
            if !all_finite(&result.embedding) {
                return Err(VectorStoreError::NonFiniteEmbedding {
                    id: result.id().to_string(),
                }
                .into());
            }
        }

        let ids: Vec<String> = embedding_results
            .into_iter()
            .map(|result| {
                let id = result.id().to_string();
                data.entries.insert(id.clone(), result);
                id
            })
            .collect();

        debug!(added = ids.len(), total = data.entries.len(), "added nodes");
        Ok(ids)
    }

    async fn delete(&self, ref_doc_id: &str, options: &StoreOptions) -> Result<()> {
        log_ignored_options("delete", options);

        let mut data = self.data.write().await;
        let before = data.entries.len();
        data.entries.retain(|_, entry| entry.ref_doc_id() != ref_doc_id);

        debug!(ref_doc_id, removed = before - data.entries.len(), "deleted document");
        Ok(())
    }

    async fn query(
        &self,
        query: &VectorStoreQuery,
        options: &StoreOptions,
    ) -> Result<VectorStoreQueryResult> {
        log_ignored_options("query", options);

        if query.mode != VectorStoreQueryMode::Default {
            return Err(VectorStoreError::UnsupportedQueryMode {
                store: STORE_NAME.into(),
                mode: query.mode.to_string(),
            }
            .into());
        }
        query.validate()?;
        let query_embedding = query.query_embedding.as_deref().ok_or_else(|| {
            VectorStoreError::MissingQueryEmbedding {
                mode: query.mode.to_string(),
            }
        })?;

        let data = self.data.read().await;
        let mut scored: Vec<(&NodeWithEmbedding, f32)> = Vec::new();
        for entry in data.entries.values() {
            if let Some(doc_ids) = &query.doc_ids {
                if !doc_ids.iter().any(|id| id == entry.ref_doc_id()) {
                    continue;
                }
            }
            if let Some(filters) = &query.filters {
                if !filters.matches(&entry.node.extra_info) {
                    continue;
                }
            }
            if entry.dimension() != query_embedding.len() {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: entry.dimension(),
                    actual: query_embedding.len(),
                }
                .into());
            }
            scored.push((entry, cosine_similarity(query_embedding, &entry.embedding)));
        }

        // NaN scores can only come from data restored or mutated through
        // `client()`; `total_cmp` keeps the order total regardless.
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.id().cmp(b.0.id())));
        scored.truncate(query.similarity_top_k);

        debug!(
            candidates = data.entries.len(),
            returned = scored.len(),
            top_k = query.similarity_top_k,
            "queried vector store"
        );

        let mut nodes = Vec::with_capacity(scored.len());
        let mut similarities = Vec::with_capacity(scored.len());
        let mut ids = Vec::with_capacity(scored.len());
        for (entry, score) in scored {
            nodes.push(entry.node.clone());
            similarities.push(score);
            ids.push(entry.id().to_string());
        }

        Ok(VectorStoreQueryResult {
            nodes: Some(nodes),
            similarities: Some(similarities),
            ids: Some(ids),
        })
    }

    async fn persist(&self, persist_path: Option<&Path>) -> Result<()> {
        let path = self.resolve_path(persist_path)?;
        let (json, count) = {
            let data = self.data.read().await;
            (serde_json::to_vec_pretty(&*data)?, data.entries.len())
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        // Write a sibling first so a failed write never truncates the old file.
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        let written = match tokio::fs::write(&tmp, &json).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        info!(path = %path.display(), entries = count, "persisted vector store");
        Ok(())
    }
}
