//! Issues and the issue factory.
//!
//! An [`Issue`] is one finding: a descriptor pinned to a graph node, with a
//! location, positional custom properties, and a severity that is computed
//! once at creation and never recomputed.

use std::path::Path;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::catalog::{IssueCategory, ProblemDescriptor};
use crate::error::{AuditError, Result};
use crate::graph::{NodeId, NodeRegistry, ReachSession};
use crate::rules::RuleSet;
use crate::severity::{Severity, SeverityResolver};

/// Positional custom properties. Most layouts use three or four columns.
pub type CustomProperties = SmallVec<[String; 4]>;

/// Where an issue was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    path: String,
    line: u32,
}

impl Location {
    pub fn new(path: impl Into<String>, line: u32) -> Self {
        Self {
            path: path.into(),
            line,
        }
    }

    /// Parse `path` or `path:line`. A suffix that is not a line number stays
    /// part of the path.
    pub fn parse(artifact_path: &str) -> Self {
        if let Some((path, line)) = artifact_path.rsplit_once(':') {
            if !path.is_empty() && !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()) {
                if let Ok(line) = line.parse() {
                    return Self::new(path, line);
                }
            }
        }
        Self::new(artifact_path, 0)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Line number, 0 when unknown.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// File name including extension, empty when unavailable.
    pub fn filename(&self) -> &str {
        Path::new(&self.path)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
    }

    /// Parent directory, empty when the path has none.
    pub fn directory(&self) -> &str {
        Path::new(&self.path)
            .parent()
            .and_then(|dir| dir.to_str())
            .unwrap_or("")
    }

    /// Extension without the dot, empty when there is none.
    pub fn extension(&self) -> &str {
        Path::new(&self.path)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }
}

/// One reported finding.
#[derive(Debug, Clone)]
pub struct Issue {
    category: IssueCategory,
    descriptor: Arc<ProblemDescriptor>,
    node: NodeId,
    description: String,
    location: Location,
    custom_properties: CustomProperties,
    severity: Severity,
    critical_context: bool,
}

impl Issue {
    pub fn category(&self) -> IssueCategory {
        self.category
    }

    pub fn descriptor(&self) -> &Arc<ProblemDescriptor> {
        &self.descriptor
    }

    /// The graph node this issue is pinned to.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Display name of the affected artifact.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn filename(&self) -> &str {
        self.location.filename()
    }

    pub fn relative_path(&self) -> &str {
        self.location.path()
    }

    pub fn line(&self) -> u32 {
        self.location.line()
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Whether the issue sits in a performance-critical context.
    pub fn is_critical_context(&self) -> bool {
        self.critical_context
    }

    pub fn num_custom_properties(&self) -> usize {
        self.custom_properties.len()
    }

    pub fn custom_properties(&self) -> &[String] {
        &self.custom_properties
    }

    /// Custom property at `index`, empty when out of range.
    pub fn custom_property(&self, index: usize) -> &str {
        self.custom_properties
            .get(index)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Custom property parsed as an integer, 0 when it is not one.
    pub fn custom_property_as_int(&self, index: usize) -> i64 {
        self.custom_property(index).trim().parse().unwrap_or(0)
    }
}

/// Builds issues against one registry.
///
/// Owns the severity resolver for the scan session, so reachability answers
/// are shared across all issues it creates.
pub struct IssueFactory<'a> {
    registry: &'a NodeRegistry,
    resolver: SeverityResolver<'a>,
}

impl<'a> IssueFactory<'a> {
    pub fn new(registry: &'a NodeRegistry, rules: &'a RuleSet) -> Self {
        Self {
            registry,
            resolver: SeverityResolver::new(rules, ReachSession::new(registry)),
        }
    }

    /// Prefer override rules scoped to `scope`.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.resolver = self.resolver.with_scope(scope);
        self
    }

    pub fn registry(&self) -> &'a NodeRegistry {
        self.registry
    }

    pub fn resolver(&mut self) -> &mut SeverityResolver<'a> {
        &mut self.resolver
    }

    /// Create an issue. Does not insert it anywhere.
    pub fn create_issue<P>(
        &mut self,
        category: IssueCategory,
        artifact_path: &str,
        node: NodeId,
        descriptor: &Arc<ProblemDescriptor>,
        custom_properties: P,
    ) -> Result<Issue>
    where
        P: IntoIterator,
        P::Item: Into<String>,
    {
        if descriptor.category != category {
            return Err(AuditError::DescriptorMismatch {
                descriptor: descriptor.id.clone(),
                expected: category,
                actual: descriptor.category,
            });
        }

        let graph_node = self.registry.get(node).ok_or(AuditError::UnknownNode(node))?;

        // Name the referencer when the node merely repeats the descriptor.
        let description = if graph_node.display_name() == descriptor.title {
            graph_node
                .first_referencer()
                .and_then(|id| self.registry.get(id))
                .map(|referencer| referencer.display_name().to_string())
                .unwrap_or_default()
        } else {
            graph_node.display_name().to_string()
        };

        let resolution = self.resolver.resolve_with_context(descriptor, node);

        Ok(Issue {
            category,
            descriptor: Arc::clone(descriptor),
            node,
            description,
            location: Location::parse(artifact_path),
            custom_properties: custom_properties.into_iter().map(Into::into).collect(),
            severity: resolution.severity,
            critical_context: resolution.critical,
        })
    }
}
