//! Reachability Queries
//!
//! Walks the referencer graph toward roots to answer "is any critical root
//! upstream of this node", and lists ancestors and descendants.
//!
//! # Memoization
//!
//! A [`ReachSession`] borrows the registry immutably, so the graph cannot
//! change while the session is alive and cached answers stay valid.
//!
//! - A walk that finds no critical root visited the complete ancestor set of
//!   every node it touched, so all of them are cached as `false`.
//! - A walk that finds one caches `true` for the start node only.
//!
//! Walks skip nodes cached as `false` and stop early on nodes cached as
//! `true`. The visited set makes cycles terminate.

use std::collections::{HashMap, HashSet, VecDeque};

use super::node::NodeId;
use super::registry::NodeRegistry;

/// Per-scan cache of critical-root reachability.
pub struct ReachSession<'a> {
    registry: &'a NodeRegistry,
    memo: HashMap<NodeId, bool>,
}

impl<'a> ReachSession<'a> {
    /// Start a session over `registry`.
    pub fn new(registry: &'a NodeRegistry) -> Self {
        Self {
            registry,
            memo: HashMap::new(),
        }
    }

    pub fn registry(&self) -> &'a NodeRegistry {
        self.registry
    }

    /// Whether `id` is a critical root or is referenced, directly or
    /// transitively, by one.
    pub fn reaches_critical_root(&mut self, id: NodeId) -> bool {
        if let Some(&cached) = self.memo.get(&id) {
            return cached;
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        queue.push_back(id);
        let mut found = false;

        while let Some(node_id) = queue.pop_front() {
            if !visited.insert(node_id) {
                continue;
            }

            match self.memo.get(&node_id) {
                Some(true) => {
                    found = true;
                    break;
                }
                Some(false) => continue,
                None => {}
            }

            let Some(node) = self.registry.get(node_id) else {
                continue;
            };
            if node.is_critical_root() {
                found = true;
                break;
            }

            for &referencer in node.referencers() {
                if !visited.contains(&referencer) {
                    queue.push_back(referencer);
                }
            }
        }

        if found {
            self.memo.insert(id, true);
        } else {
            for node_id in visited {
                self.memo.insert(node_id, false);
            }
        }

        found
    }

    /// Every node that transitively references `id`, breadth-first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id, |registry, node_id| {
            registry
                .get(node_id)
                .map(|n| n.referencers().iter().copied().collect())
                .unwrap_or_default()
        })
    }

    /// Every node `id` transitively depends on, breadth-first.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        self.walk(id, |registry, node_id| {
            registry
                .get(node_id)
                .map(|n| n.dependencies().iter().copied().collect())
                .unwrap_or_default()
        })
    }

    fn walk<F>(&self, start: NodeId, neighbors: F) -> Vec<NodeId>
    where
        F: Fn(&NodeRegistry, NodeId) -> Vec<NodeId>,
    {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        visited.insert(start);
        queue.push_back(start);

        while let Some(node_id) = queue.pop_front() {
            for next in neighbors(self.registry, node_id) {
                if visited.insert(next) {
                    result.push(next);
                    queue.push_back(next);
                }
            }
        }

        result
    }
}
