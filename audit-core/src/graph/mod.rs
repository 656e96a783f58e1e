//! Dependency Graph
//!
//! This module implements the artifact graph that scan passes feed.
//!
//! # Overview
//!
//! - Nodes represent artifacts (asset files, code symbols, shader variants)
//! - Edges point from a dependency back to whatever references it, so walking
//!   `referencers` moves toward the roots a pass started from
//!
//! The graph may contain diamonds (two roots sharing a dependency) and
//! cycles. Traversals always carry a visited set.
//!
//! # Design Decisions
//!
//! 1. Nodes live in an arena owned by [`NodeRegistry`] and refer to each other
//!    by [`NodeId`], so there is no ownership between nodes.
//!
//! 2. The registry is keyed by artifact identity for O(1) interning.
//!
//! 3. Both edge directions are stored so ancestors and descendants are
//!    equally cheap.

mod node;
mod reach;
mod registry;
mod shared;

pub use node::{DependencyNode, NodeId};
pub use reach::ReachSession;
pub use registry::{Interned, NodeRegistry};
pub use shared::SharedRegistry;
