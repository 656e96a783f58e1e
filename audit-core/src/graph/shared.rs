//! Thread-shared registry.
//!
//! When dependency closures are interned from several threads, the registry
//! lock is the only synchronization point. Holding it across the whole
//! `intern` call gives first-writer-wins creation: the second thread to
//! intern a key sees the existing node and only merges its referencer edge.

use std::sync::Arc;

use parking_lot::Mutex;

use super::registry::{Interned, NodeRegistry};
use crate::error::Result;

/// Cloneable handle to a registry guarded by a mutex.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<NodeRegistry>>,
}

impl SharedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same contract as [`NodeRegistry::intern`].
    pub fn intern(
        &self,
        key: &str,
        display_name: &str,
        referencer: Option<&str>,
        critical_root: bool,
    ) -> Result<Interned> {
        self.inner
            .lock()
            .intern(key, display_name, referencer, critical_root)
    }

    /// Run `f` with the registry locked.
    pub fn with<R>(&self, f: impl FnOnce(&NodeRegistry) -> R) -> R {
        f(&self.inner.lock())
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Recover the registry once every other handle is gone.
    ///
    /// Returns `self` back when other clones are still alive.
    pub fn into_inner(self) -> std::result::Result<NodeRegistry, Self> {
        Arc::try_unwrap(self.inner)
            .map(Mutex::into_inner)
            .map_err(|inner| Self { inner })
    }
}

impl From<NodeRegistry> for SharedRegistry {
    fn from(registry: NodeRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }
}
