//! Graph Nodes
//!
//! This module defines the artifact nodes that live in a [`NodeRegistry`].
//!
//! [`NodeRegistry`]: super::NodeRegistry

use indexmap::IndexSet;

/// Identifier of a node inside one registry.
///
/// Ids are dense indices into the registry's node table. They are only
/// meaningful for the registry that handed them out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Id for table slot `index`, or `None` past `u32::MAX`.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Get the raw id value.
    pub fn raw(&self) -> u32 {
        self.0
    }

    pub(crate) fn index(&self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for NodeId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// An artifact in the dependency graph.
///
/// Edges are stored as id sets on both ends: `referencers` are the nodes that
/// depend on this one (back-edges toward roots), `dependencies` mirror them in
/// the forward direction. Neither set owns anything.
#[derive(Debug, Clone)]
pub struct DependencyNode {
    /// Unique identifier for this node.
    id: NodeId,

    /// Stable identity (canonical path or symbol id).
    key: String,

    /// Human-readable label.
    display_name: String,

    /// Nodes that depend on this node, in discovery order.
    referencers: IndexSet<NodeId>,

    /// Nodes this node depends on, in discovery order.
    dependencies: IndexSet<NodeId>,

    /// Discovered directly from a performance-critical entry point.
    critical_root: bool,
}

impl DependencyNode {
    pub(crate) fn new(id: NodeId, key: String, display_name: String, critical_root: bool) -> Self {
        Self {
            id,
            key,
            display_name,
            referencers: IndexSet::new(),
            dependencies: IndexSet::new(),
            critical_root,
        }
    }

    /// Get the node's id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Get the node's identity key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the node's display name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Whether this node was discovered from a performance-critical root.
    pub fn is_critical_root(&self) -> bool {
        self.critical_root
    }

    /// Nodes that depend on this node.
    pub fn referencers(&self) -> &IndexSet<NodeId> {
        &self.referencers
    }

    /// Nodes this node depends on.
    pub fn dependencies(&self) -> &IndexSet<NodeId> {
        &self.dependencies
    }

    /// The first referencer ever recorded, used for display chains.
    pub fn first_referencer(&self) -> Option<NodeId> {
        self.referencers.first().copied()
    }

    /// True when nothing references this node.
    pub fn is_root(&self) -> bool {
        self.referencers.is_empty()
    }

    /// Add a referencer. Self-edges are dropped.
    ///
    /// Returns whether the set changed.
    pub(crate) fn add_referencer(&mut self, node_id: NodeId) -> bool {
        if node_id == self.id {
            return false;
        }
        self.referencers.insert(node_id)
    }

    pub(crate) fn add_dependency(&mut self, node_id: NodeId) -> bool {
        if node_id == self.id {
            return false;
        }
        self.dependencies.insert(node_id)
    }

    pub(crate) fn mark_critical_root(&mut self) {
        self.critical_root = true;
    }
}
