//! In-memory project tables implementing both collaborator traits.

use std::collections::{HashMap, HashSet, VecDeque};

use indexmap::IndexSet;

use super::{ArtifactSource, DependencySource};
use crate::error::CollaboratorError;

/// Artifacts, directories, and direct dependency edges held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryProject {
    artifacts: IndexSet<String>,
    directories: HashSet<String>,
    direct: HashMap<String, Vec<String>>,
}

impl MemoryProject {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an artifact with its direct dependencies. Dependencies are
    /// registered as artifacts too.
    pub fn with_artifact<I, S>(mut self, path: &str, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.artifacts.insert(path.to_string());
        let deps: Vec<String> = dependencies.into_iter().map(Into::into).collect();
        for dep in &deps {
            self.artifacts.insert(dep.clone());
        }
        self.direct.entry(path.to_string()).or_default().extend(deps);
        self
    }

    pub fn with_directory(mut self, path: &str) -> Self {
        self.artifacts.insert(path.to_string());
        self.directories.insert(path.to_string());
        self
    }
}

impl ArtifactSource for MemoryProject {
    fn list_artifacts(&self, filter: &dyn Fn(&str) -> bool) -> Result<Vec<String>, CollaboratorError> {
        Ok(self
            .artifacts
            .iter()
            .filter(|path| filter(path))
            .cloned()
            .collect())
    }

    fn is_directory(&self, path: &str) -> bool {
        self.directories.contains(path)
    }
}

impl DependencySource for MemoryProject {
    /// Breadth-first closure. `path` shows up in the result only when a cycle
    /// leads back to it.
    fn closure_of(&self, path: &str, recursive: bool) -> Result<Vec<String>, CollaboratorError> {
        let mut emitted: IndexSet<String> = IndexSet::new();
        let mut expanded = HashSet::new();
        let mut queue = VecDeque::new();
        expanded.insert(path.to_string());
        queue.push_back(path.to_string());

        while let Some(current) = queue.pop_front() {
            for dep in self.direct.get(&current).into_iter().flatten() {
                emitted.insert(dep.clone());
                if recursive && expanded.insert(dep.clone()) {
                    queue.push_back(dep.clone());
                }
            }
        }

        Ok(emitted.into_iter().collect())
    }
}
