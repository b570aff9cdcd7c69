pub mod config;
pub mod error;
pub mod node;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{DEFAULT_PERSIST_DIR, DEFAULT_PERSIST_FNAME, PersistConfig};
    pub use crate::error::{EmbeddingError, LodestarError, Result, VectorStoreError};
    pub use crate::node::Node;
}
