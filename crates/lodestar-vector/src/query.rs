use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use lodestar_core::error::{LodestarError, Result, VectorStoreError};

use crate::filters::MetadataFilters;
use crate::types::all_finite;

/// Retrieval strategy a backend applies to a query.
///
/// The hybrid blend weight lives on the `Hybrid` variant so it cannot be
/// attached to any other mode. `alpha = 0` is pure lexical, `alpha = 1` is
/// pure vector similarity; `None` leaves the weight to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorStoreQueryMode {
    #[default]
    Default,
    Sparse,
    Hybrid {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alpha: Option<f32>,
    },
    // fit learners
    Svm,
    LogisticRegression,
    LinearRegression,
}

impl VectorStoreQueryMode {
    pub fn hybrid(alpha: f32) -> Self {
        Self::Hybrid { alpha: Some(alpha) }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Sparse => "sparse",
            Self::Hybrid { .. } => "hybrid",
            Self::Svm => "svm",
            Self::LogisticRegression => "logistic_regression",
            Self::LinearRegression => "linear_regression",
        }
    }

    pub fn alpha(&self) -> Option<f32> {
        match self {
            Self::Hybrid { alpha } => *alpha,
            _ => None,
        }
    }

    /// Every mode except `sparse` ranks by dense vectors.
    pub fn requires_embedding(&self) -> bool {
        !matches!(self, Self::Sparse)
    }

    pub fn requires_query_str(&self) -> bool {
        matches!(self, Self::Sparse | Self::Hybrid { .. })
    }
}

impl fmt::Display for VectorStoreQueryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VectorStoreQueryMode {
    type Err = LodestarError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "default" => Ok(Self::Default),
            "sparse" => Ok(Self::Sparse),
            "hybrid" => Ok(Self::Hybrid { alpha: None }),
            "svm" => Ok(Self::Svm),
            "logistic_regression" => Ok(Self::LogisticRegression),
            "linear_regression" => Ok(Self::LinearRegression),
            other => Err(VectorStoreError::UnknownQueryMode(other.to_string()).into()),
        }
    }
}

/// A query against a vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreQuery {
    #[serde(default)]
    pub query_embedding: Option<Vec<f32>>,
    #[serde(default = "default_top_k")]
    pub similarity_top_k: usize,
    /// Restrict results to nodes derived from these source documents.
    #[serde(default)]
    pub doc_ids: Option<Vec<String>>,
    /// Raw query text, used by sparse and hybrid modes.
    #[serde(default)]
    pub query_str: Option<String>,
    #[serde(default)]
    pub mode: VectorStoreQueryMode,
    #[serde(default)]
    pub filters: Option<MetadataFilters>,
}

fn default_top_k() -> usize {
    1
}

impl Default for VectorStoreQuery {
    fn default() -> Self {
        Self {
            query_embedding: None,
            similarity_top_k: default_top_k(),
            doc_ids: None,
            query_str: None,
            mode: VectorStoreQueryMode::Default,
            filters: None,
        }
    }
}

impl VectorStoreQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.query_embedding = Some(embedding);
        self
    }

    pub fn with_top_k(mut self, k: usize) -> Self {
        self.similarity_top_k = k;
        self
    }

    pub fn with_doc_ids(mut self, doc_ids: Vec<String>) -> Self {
        self.doc_ids = Some(doc_ids);
        self
    }

    pub fn with_query_str(mut self, query_str: impl Into<String>) -> Self {
        self.query_str = Some(query_str.into());
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

    /// Hybrid blend weight, if the mode is hybrid and one was given.
    pub fn alpha(&self) -> Option<f32> {
        self.mode.alpha()
    }

    /// Check that the query carries what its mode needs.
    ///
    /// Queries may be built in any shape; backends call this before
    /// executing one.
    pub fn validate(&self) -> Result<()> {
        let mode = self.mode.to_string();
        if self.mode.requires_embedding() && self.query_embedding.is_none() {
            return Err(VectorStoreError::MissingQueryEmbedding { mode }.into());
        }
        if let Some(embedding) = &self.query_embedding {
            if !all_finite(embedding) {
                return Err(VectorStoreError::NonFiniteEmbedding { id: "query".into() }.into());
            }
        }
        if self.mode.requires_query_str() && self.query_str.is_none() {
            return Err(VectorStoreError::MissingQueryStr { mode }.into());
        }
        if let Some(alpha) = self.alpha() {
            if !(0.0..=1.0).contains(&alpha) {
                return Err(VectorStoreError::InvalidAlpha(alpha).into());
            }
        }
        Ok(())
    }
}
