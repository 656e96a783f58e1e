//! Severity levels and the severity resolver.
//!
//! The final severity of an issue is decided once, when the issue is created:
//!
//! ```text
//! critical = descriptor.always_critical || node reaches a critical root
//! severity = if critical {
//!     max(descriptor default, Warning)
//! } else {
//!     rule override, else descriptor default
//! }
//! ```
//!
//! Criticality raises `Info` to `Warning` and never touches `Error`. It never
//! raises anything to `Error` either. Rule overrides apply outside critical
//! context only.

use serde::{Deserialize, Serialize};

use crate::catalog::ProblemDescriptor;
use crate::graph::{NodeId, ReachSession};
use crate::rules::RuleSet;

/// How serious an issue is. Ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Combine a base severity with graph criticality.
pub fn escalate(base: Severity, critical: bool) -> Severity {
    if critical {
        base.max(Severity::Warning)
    } else {
        base
    }
}

/// Resolved severity plus the criticality that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub severity: Severity,
    pub critical: bool,
}

/// Resolves severities for one scan session.
///
/// Holds the reachability cache, so repeated checks against the same part of
/// the graph are cheap.
pub struct SeverityResolver<'a> {
    rules: &'a RuleSet,
    reach: ReachSession<'a>,
    scope: Option<String>,
}

impl<'a> SeverityResolver<'a> {
    pub fn new(rules: &'a RuleSet, reach: ReachSession<'a>) -> Self {
        Self {
            rules,
            reach,
            scope: None,
        }
    }

    /// Prefer rules whose filter matches `scope`.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    pub fn reach(&mut self) -> &mut ReachSession<'a> {
        &mut self.reach
    }

    /// Whether an issue for `descriptor` on `node` is in a critical context.
    pub fn is_critical(&mut self, descriptor: &ProblemDescriptor, node: NodeId) -> bool {
        descriptor.always_critical || self.reach.reaches_critical_root(node)
    }

    pub fn resolve(&mut self, descriptor: &ProblemDescriptor, node: NodeId) -> Severity {
        self.resolve_with_context(descriptor, node).severity
    }

    pub fn resolve_with_context(&mut self, descriptor: &ProblemDescriptor, node: NodeId) -> Resolution {
        let critical = self.is_critical(descriptor, node);
        let severity = if critical {
            escalate(descriptor.default_severity, true)
        } else {
            self.rules
                .override_for(&descriptor.id, self.scope.as_deref())
                .unwrap_or(descriptor.default_severity)
        };
        Resolution { severity, critical }
    }
}
