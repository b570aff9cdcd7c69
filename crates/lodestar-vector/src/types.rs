use serde::{Deserialize, Serialize};

use lodestar_core::node::Node;

/// Placeholder returned by [`NodeWithEmbedding::ref_doc_id`] when the node
/// has no source document.
pub const NONE_REF_DOC_ID: &str = "None";

/// A node paired with its embedding, ready to be added to a vector store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWithEmbedding {
    pub node: Node,
    pub embedding: Vec<f32>,
}

impl NodeWithEmbedding {
    pub fn new(node: Node, embedding: Vec<f32>) -> Self {
        Self { node, embedding }
    }

    /// The wrapped node's own id.
    pub fn id(&self) -> &str {
        self.node.get_doc_id()
    }

    /// The source document id, or `"None"` when the node has none.
    pub fn ref_doc_id(&self) -> &str {
        self.node.ref_doc_id.as_deref().unwrap_or(NONE_REF_DOC_ID)
    }

    pub fn dimension(&self) -> usize {
        self.embedding.len()
    }
}

/// Result of a vector store query.
///
/// `nodes`, `similarities` and `ids` are parallel sequences when present.
/// Backends are responsible for keeping them index-aligned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorStoreQueryResult {
    #[serde(default)]
    pub nodes: Option<Vec<Node>>,
    #[serde(default)]
    pub similarities: Option<Vec<f32>>,
    #[serde(default)]
    pub ids: Option<Vec<String>>,
}

impl VectorStoreQueryResult {
    /// Number of hits, taken from the first sequence that is present.
    pub fn len(&self) -> usize {
        self.ids
            .as_ref()
            .map(Vec::len)
            .or_else(|| self.nodes.as_ref().map(Vec::len))
            .or_else(|| self.similarities.as_ref().map(Vec::len))
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when every present sequence has the same length.
    pub fn is_aligned(&self) -> bool {
        let lens = [
            self.nodes.as_ref().map(Vec::len),
            self.similarities.as_ref().map(Vec::len),
            self.ids.as_ref().map(Vec::len),
        ];
        let mut present = lens.iter().flatten();
        match present.next() {
            Some(first) => present.all(|len| len == first),
            None => true,
        }
    }

    /// Zip the parallel sequences into per-hit records.
    ///
    /// Ids fall back to the node's own id when the backend returned nodes
    /// but no ids.
    pub fn into_scored(self) -> Vec<NodeWithScore> {
        let len = self.len();
        let mut nodes = self.nodes.map(|n| n.into_iter().map(Some).collect::<Vec<_>>());
        let similarities = self.similarities.unwrap_or_default();
        let ids = self.ids.unwrap_or_default();

        (0..len)
            .map(|i| {
                let node = nodes
                    .as_mut()
                    .and_then(|n| n.get_mut(i))
                    .and_then(Option::take);
                let id = ids
                    .get(i)
                    .cloned()
                    .or_else(|| node.as_ref().map(|n| n.doc_id.clone()))
                    .unwrap_or_default();
                NodeWithScore {
                    id,
                    node,
                    score: similarities.get(i).copied(),
                }
            })
            .collect()
    }
}

/// A single retrieval hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeWithScore {
    pub id: String,
    /// Present only when the backend stores text.
    pub node: Option<Node>,
    pub score: Option<f32>,
}

/// True when no component is NaN or infinite.
pub fn all_finite(vector: &[f32]) -> bool {
    vector.iter().all(|x| x.is_finite())
}

/// Cosine similarity of two vectors. Returns 0.0 if either has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> Node {
        Node::new(format!("text of {id}")).with_doc_id(id)
    }

    #[test]
    fn ref_doc_id_from_node() {
        let nwe = NodeWithEmbedding::new(node("n1").with_ref_doc_id("doc-1"), vec![1.0]);
        assert_eq!(nwe.ref_doc_id(), "doc-1");
    }

    #[test]
    fn ref_doc_id_falls_back_to_none_literal() {
        let nwe = NodeWithEmbedding::new(node("n1"), vec![1.0]);
        assert_eq!(nwe.ref_doc_id(), "None");
    }

    #[test]
    fn id_is_node_doc_id() {
        let nwe = NodeWithEmbedding::new(node("n42"), vec![0.5, 0.5]);
        assert_eq!(nwe.id(), "n42");
        assert_eq!(nwe.dimension(), 2);
    }

    #[test]
    fn empty_result() {
        let result = VectorStoreQueryResult::default();
        assert!(result.is_empty());
        assert!(result.is_aligned());
        assert!(result.into_scored().is_empty());
    }

    #[test]
    fn misaligned_result_detected() {
        let result = VectorStoreQueryResult {
            nodes: None,
            similarities: Some(vec![0.9, 0.8]),
            ids: Some(vec!["a".into()]),
        };
        assert!(!result.is_aligned());
    }

    #[test]
    fn into_scored_zips_sequences() {
        let result = VectorStoreQueryResult {
            nodes: Some(vec![node("a"), node("b")]),
            similarities: Some(vec![0.9, 0.4]),
            ids: Some(vec!["a".into(), "b".into()]),
        };
        assert!(result.is_aligned());

        let scored = result.into_scored();
        assert_eq!(scored.len(), 2);
        assert_eq!(scored[0].id, "a");
        assert_eq!(scored[0].score, Some(0.9));
        assert_eq!(scored[1].node.as_ref().unwrap().doc_id, "b");
    }

    #[test]
    fn into_scored_without_nodes() {
        let result = VectorStoreQueryResult {
            nodes: None,
            similarities: Some(vec![0.7]),
            ids: Some(vec!["x".into()]),
        };
        let scored = result.into_scored();
        assert_eq!(scored.len(), 1);
        assert!(scored[0].node.is_none());
        assert_eq!(scored[0].id, "x");
    }

    #[test]
    fn into_scored_id_falls_back_to_node() {
        let result = VectorStoreQueryResult {
            nodes: Some(vec![node("only")]),
            similarities: None,
            ids: None,
        };
        let scored = result.into_scored();
        assert_eq!(scored[0].id, "only");
        assert!(scored[0].score.is_none());
    }

    #[test]
    fn all_finite_detects_nan_and_inf() {
        assert!(all_finite(&[0.0, -1.5, 3.0]));
        assert!(all_finite(&[]));
        assert!(!all_finite(&[1.0, f32::NAN]));
        assert!(!all_finite(&[f32::INFINITY]));
    }

    #[test]
    fn cosine_similarity_identical_vectors() {
        let v = [1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_orthogonal_vectors() {
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
    }

    #[test]
    fn cosine_similarity_zero_vector() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
    }
}
