use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A unit of retrievable content, typically a chunk of a source document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Text content of the node.
    pub text: String,
    /// Unique identifier of this node.
    pub doc_id: String,
    /// Identifier of the document this node was derived from.
    #[serde(default)]
    pub ref_doc_id: Option<String>,
    /// Arbitrary metadata, matched by metadata filters.
    #[serde(default)]
    pub extra_info: HashMap<String, Value>,
}

impl Node {
    /// Create a node with a freshly generated id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            doc_id: Uuid::new_v4().to_string(),
            ref_doc_id: None,
            extra_info: HashMap::new(),
        }
    }

    pub fn with_doc_id(mut self, doc_id: impl Into<String>) -> Self {
        self.doc_id = doc_id.into();
        self
    }

    pub fn with_ref_doc_id(mut self, ref_doc_id: impl Into<String>) -> Self {
        self.ref_doc_id = Some(ref_doc_id.into());
        self
    }

    pub fn with_extra_info(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra_info.insert(key.into(), value);
        self
    }

    pub fn get_doc_id(&self) -> &str {
        &self.doc_id
    }
}
