//! Scan Modules
//!
//! Modules turn the output of external collaborators into graph nodes and
//! issues. Each module run owns a private [`NodeRegistry`] and
//! [`IssueReport`], so modules never share mutable state and can run side by
//! side.
//!
//! # Collaborators
//!
//! - [`ArtifactSource`]: enumerates artifacts matching a path predicate
//! - [`DependencySource`]: returns the dependency closure of an artifact
//!
//! Both are plain synchronous calls. [`MemoryProject`] implements them over
//! in-memory tables.

mod assets;
mod auditor;
mod memory;

use std::sync::atomic::{AtomicBool, Ordering};

pub use assets::{AssetsModule, RESOURCES_DESCRIPTOR_ID};
pub use auditor::{AuditOutcome, Auditor};
pub use memory::MemoryProject;

use crate::catalog::{DescriptorCatalog, ProblemDescriptor};
use crate::config::AuditConfig;
use crate::error::{CollaboratorError, Result};
use crate::graph::NodeRegistry;
use crate::layout::IssueLayout;
use crate::report::IssueReport;
use crate::rules::RuleSet;

/// Enumerates artifacts in the project.
pub trait ArtifactSource: Send + Sync {
    /// All artifact paths accepted by `filter`, in a stable order.
    fn list_artifacts(&self, filter: &dyn Fn(&str) -> bool) -> std::result::Result<Vec<String>, CollaboratorError>;

    /// Whether `path` names a directory rather than a file.
    fn is_directory(&self, path: &str) -> bool;
}

/// Provides dependency closures.
pub trait DependencySource: Send + Sync {
    /// Dependencies of `path`; transitive when `recursive` is set. By
    /// convention the result does not contain `path` itself.
    fn closure_of(&self, path: &str, recursive: bool) -> std::result::Result<Vec<String>, CollaboratorError>;
}

/// Everything a module needs for one run.
pub struct AuditContext<'a> {
    config: &'a AuditConfig,
    catalog: &'a DescriptorCatalog,
    rules: RuleSet,
    artifacts: &'a dyn ArtifactSource,
    dependencies: &'a dyn DependencySource,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> AuditContext<'a> {
    pub fn new(
        config: &'a AuditConfig,
        catalog: &'a DescriptorCatalog,
        artifacts: &'a dyn ArtifactSource,
        dependencies: &'a dyn DependencySource,
    ) -> Self {
        Self {
            config,
            catalog,
            rules: config.rules.iter().cloned().collect(),
            artifacts,
            dependencies,
            cancel: None,
        }
    }

    /// Observe `flag`; modules stop between roots once it is set.
    pub fn with_cancellation(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &'a AuditConfig {
        self.config
    }

    pub fn catalog(&self) -> &'a DescriptorCatalog {
        self.catalog
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn artifacts(&self) -> &'a dyn ArtifactSource {
        self.artifacts
    }

    pub fn dependencies(&self) -> &'a dyn DependencySource {
        self.dependencies
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed))
    }
}

/// Graph and report produced by one module run.
#[derive(Debug)]
pub struct ModuleOutput {
    pub module: &'static str,
    pub registry: NodeRegistry,
    pub report: IssueReport,
}

/// A scan pass over one kind of artifact.
pub trait AuditModule: Send + Sync {
    fn name(&self) -> &'static str;

    /// Descriptors this module reports.
    fn descriptors(&self) -> Vec<ProblemDescriptor>;

    /// Export layouts for the categories this module fills.
    fn layouts(&self) -> Vec<IssueLayout>;

    fn audit(&self, ctx: &AuditContext<'_>) -> Result<ModuleOutput>;
}
