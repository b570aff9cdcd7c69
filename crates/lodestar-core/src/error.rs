use thiserror::Error;

/// Top-level error type for the Lodestar library.
#[derive(Debug, Error)]
pub enum LodestarError {
    #[error("Vector store error: {0}")]
    VectorStore(#[from] VectorStoreError),

    #[error("Embedding error: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Unsupported query mode '{mode}' for {store}")]
    UnsupportedQueryMode { store: String, mode: String },

    #[error("Query mode '{mode}' requires a query embedding")]
    MissingQueryEmbedding { mode: String },

    #[error("Query mode '{mode}' requires a query string")]
    MissingQueryStr { mode: String },

    #[error("Hybrid alpha must be within [0, 1], got {0}")]
    InvalidAlpha(f32),

    #[error("Embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Unknown query mode: {0}")]
    UnknownQueryMode(String),

    #[error("Embedding for '{id}' contains non-finite values")]
    NonFiniteEmbedding { id: String },

    #[error("Persist failed: {0}")]
    Persist(String),
}

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider error: {0}")]
    Provider(String),
}

pub type Result<T> = std::result::Result<T, LodestarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_mode_display() {
        let err = VectorStoreError::UnsupportedQueryMode {
            store: "InMemoryVectorStore".into(),
            mode: "svm".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported query mode 'svm' for InMemoryVectorStore"
        );
    }

    #[test]
    fn missing_embedding_display() {
        let err = VectorStoreError::MissingQueryEmbedding {
            mode: "default".into(),
        };
        assert_eq!(
            err.to_string(),
            "Query mode 'default' requires a query embedding"
        );
    }

    #[test]
    fn dimension_mismatch_display() {
        let err = VectorStoreError::DimensionMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Embedding dimension mismatch: expected 3, got 2"
        );
    }

    #[test]
    fn invalid_alpha_display() {
        let err = VectorStoreError::InvalidAlpha(1.5);
        assert_eq!(err.to_string(), "Hybrid alpha must be within [0, 1], got 1.5");
    }

    #[test]
    fn unknown_query_mode_display() {
        let err = VectorStoreError::UnknownQueryMode("mmr".into());
        assert_eq!(err.to_string(), "Unknown query mode: mmr");
    }

    #[test]
    fn non_finite_embedding_display() {
        let err = VectorStoreError::NonFiniteEmbedding { id: "n1".into() };
        assert_eq!(err.to_string(), "Embedding for 'n1' contains non-finite values");
    }

    #[test]
    fn embedding_error_display() {
        let err = EmbeddingError::Provider("timeout".into());
        assert_eq!(err.to_string(), "Provider error: timeout");
    }

    #[test]
    fn lodestar_error_from_vector_store_error() {
        let err: LodestarError = VectorStoreError::Persist("disk full".into()).into();
        assert!(matches!(
            err,
            LodestarError::VectorStore(VectorStoreError::Persist(_))
        ));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn lodestar_error_from_embedding_error() {
        let err: LodestarError = EmbeddingError::InvalidInput("empty".into()).into();
        assert!(matches!(
            err,
            LodestarError::Embedding(EmbeddingError::InvalidInput(_))
        ));
    }

    #[test]
    fn lodestar_error_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err: LodestarError = io.into();
        assert!(matches!(err, LodestarError::Io(_)));
        assert!(err.to_string().contains("no such file"));
    }

    #[test]
    fn lodestar_error_from_serde_error() {
        let err: LodestarError = serde_json::from_str::<serde_json::Value>("invalid")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("Serialization error"));
    }
}
