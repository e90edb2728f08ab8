//! Node store: the ordered collection of shape nodes in a session.

use std::collections::HashMap;

use crate::{FlowError, FlowResult, NodeId, Position, ShapeKind, ShapeNode, Size};

/// Insertion-ordered collection of [`ShapeNode`]s.
///
/// The store is the single source of truth for the canvas. Order only decides
/// paint order. Ids are unique for the lifetime of the store.
///
/// # Example
///
/// ```
/// use flow_core::{NodeStore, Position, ShapeKind};
///
/// let mut store = NodeStore::new();
/// let id = store.add_node(ShapeKind::Diamond, Position::new(40.0, 60.0)).unwrap();
///
/// store.update_text(&id, "x > 0?").unwrap();
/// assert_eq!(store.get(&id).unwrap().text, "x > 0?");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    /// Nodes in insertion order.
    nodes: Vec<ShapeNode>,
    /// Index into `nodes` by id.
    index: HashMap<NodeId, usize>,
}

impl NodeStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing nodes, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::DuplicateNode`] if two nodes share an id, or
    /// [`FlowError::InvalidGeometry`] if a node carries non-finite geometry.
    pub fn from_nodes(nodes: impl IntoIterator<Item = ShapeNode>) -> FlowResult<Self> {
        let mut store = Self::new();
        for mut node in nodes {
            if store.index.contains_key(&node.id) {
                return Err(FlowError::DuplicateNode(node.id.to_string()));
            }
            node.position = node.position.normalized()?;
            node.size = node.size.normalized()?;
            store.push(node);
        }
        Ok(store)
    }

    /// Create a node with default size and an empty label and append it.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::InvalidGeometry`] if the position is not finite.
    pub fn add_node(&mut self, kind: ShapeKind, position: Position) -> FlowResult<NodeId> {
        let position = position.normalized()?;
        let mut node = ShapeNode::new(kind, position);
        while self.index.contains_key(&node.id) {
            node.id = NodeId::new();
        }
        let id = node.id.clone();
        self.push(node);
        tracing::debug!(%id, %kind, "node added");
        Ok(id)
    }

    /// Replace the position of a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is absent or the position is not finite.
    pub fn update_position(&mut self, id: &NodeId, position: Position) -> FlowResult<()> {
        let position = position.normalized()?;
        self.get_mut(id)?.position = position;
        Ok(())
    }

    /// Replace the size of a node.
    ///
    /// # Errors
    ///
    /// Returns an error if the node is absent or the size is not finite.
    pub fn update_size(&mut self, id: &NodeId, size: Size) -> FlowResult<()> {
        let size = size.normalized()?;
        self.get_mut(id)?.size = size;
        Ok(())
    }

    /// Replace the label of a node.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::NodeNotFound`] if the node is absent.
    pub fn update_text(&mut self, id: &NodeId, text: impl Into<String>) -> FlowResult<()> {
        self.get_mut(id)?.text = text.into();
        Ok(())
    }

    /// Get a node by id.
    #[must_use]
    pub fn get(&self, id: &NodeId) -> Option<&ShapeNode> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    /// Check whether a node exists.
    #[must_use]
    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    /// All nodes in insertion (paint) order.
    #[must_use]
    pub fn nodes(&self) -> &[ShapeNode] {
        &self.nodes
    }

    /// Find the topmost node whose box contains the point.
    #[must_use]
    pub fn node_at(&self, top: f32, left: f32) -> Option<&ShapeNode> {
        self.nodes
            .iter()
            .rev()
            .find(|node| node.contains_point(top, left))
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Drop every node (full session reset).
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.index.clear();
    }

    /// Serialize the nodes to a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> FlowResult<String> {
        serde_json::to_string(&self.nodes).map_err(FlowError::Serialization)
    }

    /// Deserialize a store from a JSON array of nodes.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or the nodes violate store invariants.
    pub fn from_json(json: &str) -> FlowResult<Self> {
        let nodes: Vec<ShapeNode> = serde_json::from_str(json)?;
        Self::from_nodes(nodes)
    }

    fn push(&mut self, node: ShapeNode) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn get_mut(&mut self, id: &NodeId) -> FlowResult<&mut ShapeNode> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.nodes[i]),
            None => Err(FlowError::NodeNotFound(id.to_string())),
        }
    }
}
