pub mod embedding;
pub mod filters;
pub mod memory;
pub mod mock;
pub mod query;
pub mod retriever;
pub mod store;
pub mod types;

pub mod prelude {
    pub use crate::embedding::{Embedding, embed_nodes};
    pub use crate::filters::{ExactMatchFilter, FilterValue, MetadataFilters};
    pub use crate::memory::InMemoryVectorStore;
    pub use crate::mock::MockEmbedding;
    pub use crate::query::{VectorStoreQuery, VectorStoreQueryMode};
    pub use crate::retriever::VectorStoreRetriever;
    pub use crate::store::{StoreOptions, VectorStore};
    pub use crate::types::{NodeWithEmbedding, NodeWithScore, VectorStoreQueryResult};
}
