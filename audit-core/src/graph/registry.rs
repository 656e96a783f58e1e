//! Node Registry
//!
//! The registry interns artifacts by key so that every artifact maps to
//! exactly one [`DependencyNode`], no matter how many scan passes discover it.
//!
//! # Algorithm
//!
//! `intern(key, name, referencer, critical)`:
//!
//! 1. Resolve the referencer key first. An unknown referencer fails the call
//!    before anything is created.
//! 2. If `key` is new, push a node onto the table and index it.
//! 3. Link `referencer -> key` unless the two are the same key.
//!
//! Each call is a hash lookup plus at most one insert, so a pass over `E`
//! discovered edges is O(E).

use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::node::{DependencyNode, NodeId};
use crate::error::{AuditError, Result};

/// Outcome of an [`NodeRegistry::intern`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interned {
    /// The node registered under the key.
    pub id: NodeId,
    /// True when this call created the node (first discovery).
    pub created: bool,
}

/// Arena of dependency nodes keyed by artifact identity.
#[derive(Debug, Default)]
pub struct NodeRegistry {
    /// All nodes, indexed by `NodeId`. Creation order.
    nodes: Vec<DependencyNode>,

    /// Key -> id lookup.
    index: HashMap<String, NodeId>,

    /// Number of distinct referencer edges.
    edges: usize,
}

impl NodeRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `key`, optionally recording `referencer` as something that
    /// depends on it.
    ///
    /// Re-interning an existing key merges the referencer edge into the
    /// existing node. A referencer equal to `key` is ignored. The critical
    /// hint marks the node as a critical root; it is never cleared.
    pub fn intern(
        &mut self,
        key: &str,
        display_name: &str,
        referencer: Option<&str>,
        critical_root: bool,
    ) -> Result<Interned> {
        let referencer_id = match referencer {
            Some(r) if r != key => Some(self.index.get(r).copied().ok_or_else(|| {
                AuditError::UnknownReferencer {
                    key: key.to_string(),
                    referencer: r.to_string(),
                }
            })?),
            _ => None,
        };

        let (id, created) = match self.index.get(key) {
            Some(&id) => (id, false),
            None => {
                let id = NodeId::from_index(self.nodes.len())
                    .ok_or(AuditError::RegistryFull(self.nodes.len()))?;
                self.nodes.push(DependencyNode::new(
                    id,
                    key.to_string(),
                    display_name.to_string(),
                    critical_root,
                ));
                self.index.insert(key.to_string(), id);
                trace!(key, ?id, critical_root, "interned new node");
                (id, true)
            }
        };

        if !created && critical_root {
            self.nodes[id.index()].mark_critical_root();
        }

        if let Some(referencer_id) = referencer_id {
            self.add_edge(referencer_id, id);
        }

        Ok(Interned { id, created })
    }

    /// Record that `referencer` depends on `dependency`.
    fn add_edge(&mut self, referencer: NodeId, dependency: NodeId) {
        if self.nodes[dependency.index()].add_referencer(referencer) {
            self.nodes[referencer.index()].add_dependency(dependency);
            self.edges += 1;
        }
    }

    /// Get a node by id.
    pub fn get(&self, id: NodeId) -> Option<&DependencyNode> {
        self.nodes.get(id.index())
    }

    /// Get a node by key.
    pub fn get_by_key(&self, key: &str) -> Option<&DependencyNode> {
        self.id_of(key).and_then(|id| self.get(id))
    }

    /// Look up the id registered for `key`.
    pub fn id_of(&self, key: &str) -> Option<NodeId> {
        self.index.get(key).copied()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Get the total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the total number of referencer edges.
    pub fn edge_count(&self) -> usize {
        self.edges
    }

    /// Iterate nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &DependencyNode> {
        self.nodes.iter()
    }

    /// A representative chain from `id` toward a root.
    ///
    /// Follows the first recorded referencer at each step. Stops at a root or
    /// at the first node already on the chain. The chain starts with `id`.
    pub fn dependency_chain(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            let Some(node) = self.get(node_id) else {
                break;
            };
            if !seen.insert(node_id) {
                break;
            }
            chain.push(node_id);
            current = node.first_referencer();
        }

        chain
    }
}
