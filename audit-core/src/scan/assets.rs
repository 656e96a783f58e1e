//! Resources scan.
//!
//! Every artifact under a resources folder ships with the player and is
//! loadable by name at runtime, together with everything it references.
//! This module builds the graph of those artifacts and reports each one
//! once.
//!
//! # Algorithm
//!
//! 1. List artifacts whose path contains the resources segment and not the
//!    excluded (editor) segment. Skip directories.
//! 2. Intern each root without a referencer. Code-file roots are not
//!    interned.
//! 3. Intern every artifact in the root's recursive closure with the root as
//!    referencer, skipping the root itself and code files. The closure of a
//!    code-file root is interned without a referencer.
//! 4. Record each node the first time it is created.
//!
//! Issues are created after the whole graph is built, in first-discovery
//! order, so severities see every referencer edge of the pass.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, trace};

use super::{AuditContext, AuditModule, ModuleOutput};
use crate::catalog::{Area, IssueCategory, MatchPattern, ProblemDescriptor};
use crate::error::{AuditError, Result};
use crate::graph::{NodeId, NodeRegistry};
use crate::issue::IssueFactory;
use crate::layout::{IssueLayout, PropertyDefinition, PropertyKind};
use crate::report::IssueReport;
use crate::severity::Severity;

/// Id of the built-in descriptor reported for resources.
pub const RESOURCES_DESCRIPTOR_ID: &str = "PAA0000";

#[derive(Debug, Default)]
pub struct AssetsModule;

impl AssetsModule {
    pub fn new() -> Self {
        Self
    }

    pub fn resources_descriptor() -> ProblemDescriptor {
        ProblemDescriptor {
            areas: vec![Area::BuildSize, Area::LoadTimes],
            problem: "Assets in Resources folders are always included in the build, along with \
                      everything they reference, and are indexed for lookup by name at startup."
                .to_string(),
            solution: "Keep only assets that are loaded by name at runtime in Resources folders. \
                       Move the rest elsewhere or load them through asset bundles."
                .to_string(),
            ..ProblemDescriptor::new(
                RESOURCES_DESCRIPTOR_ID,
                IssueCategory::Assets,
                "Resources folder asset",
                Severity::Info,
            )
        }
    }

    pub fn layout() -> IssueLayout {
        IssueLayout::new(
            IssueCategory::Assets,
            vec![
                PropertyDefinition::new(PropertyKind::Description, "Asset Name"),
                PropertyDefinition::new(PropertyKind::FileType, "File Type").long_name("File extension"),
                PropertyDefinition::new(PropertyKind::Path, "Path"),
                PropertyDefinition::new(PropertyKind::Directory, "Directory").default_group(),
                PropertyDefinition::new(PropertyKind::Severity, "Severity"),
            ],
        )
    }

    /// Build the resources graph. Returns the registry and the nodes in
    /// first-discovery order with the path each was discovered under.
    fn build_graph(&self, ctx: &AuditContext<'_>) -> Result<(NodeRegistry, Vec<(NodeId, String)>)> {
        let config = &ctx.config().assets;
        let resources = config.resources_segment.to_ascii_lowercase();
        let excluded = config.excluded_segment.to_ascii_lowercase();
        let critical_patterns = config
            .critical_root_patterns
            .iter()
            .map(|p| MatchPattern::parse(p))
            .collect::<Result<Vec<_>>>()?;

        let is_code = |path: &str| {
            let lower = path.to_ascii_lowercase();
            config
                .code_extensions
                .iter()
                .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
        };

        let filter = |path: &str| {
            let lower = path.to_ascii_lowercase();
            lower.contains(&resources) && !lower.contains(&excluded)
        };
        let roots: Vec<String> = ctx
            .artifacts()
            .list_artifacts(&filter)
            .map_err(|e| AuditError::collaborator("list_artifacts", config.resources_segment.clone(), e))?
            .into_iter()
            .filter(|path| !ctx.artifacts().is_directory(path))
            .collect();

        debug!(roots = roots.len(), parallel = config.parallel_closures, "scanning resources");

        let closure = |root: &String| {
            ctx.dependencies()
                .closure_of(root, true)
                .map_err(|e| AuditError::collaborator("closure_of", root.clone(), e))
        };

        // Closures may be computed up front in parallel; interning stays
        // sequential in root order.
        let mut precomputed = if config.parallel_closures {
            let closures: Vec<Result<Vec<String>>> = roots.par_iter().map(|root| closure(root)).collect();
            Some(closures.into_iter())
        } else {
            None
        };

        let mut registry = NodeRegistry::new();
        let mut discovered = Vec::new();

        for root in &roots {
            if ctx.is_cancelled() {
                info!(interned = registry.len(), "resources scan cancelled");
                return Err(AuditError::Cancelled);
            }

            let referencer = if is_code(root.as_str()) {
                trace!(root = %root, "code file root not interned");
                None
            } else {
                let critical = critical_patterns.iter().any(|p| p.matches(root));
                let interned = registry.intern(root, &display_name(root), None, critical)?;
                if interned.created {
                    discovered.push((interned.id, root.clone()));
                }
                Some(root.as_str())
            };

            let dependencies = match precomputed.as_mut().and_then(|closures| closures.next()) {
                Some(result) => result?,
                None => closure(root)?,
            };

            let mut linked = 0usize;
            for dependency in &dependencies {
                if dependency == root || is_code(dependency.as_str()) {
                    continue;
                }
                let interned = registry.intern(dependency, &display_name(dependency), referencer, false)?;
                if interned.created {
                    discovered.push((interned.id, dependency.clone()));
                }
                linked += 1;
            }
            trace!(root = %root, linked, "root processed");
        }

        Ok((registry, discovered))
    }
}

impl AuditModule for AssetsModule {
    fn name(&self) -> &'static str {
        "assets"
    }

    fn descriptors(&self) -> Vec<ProblemDescriptor> {
        vec![Self::resources_descriptor()]
    }

    fn layouts(&self) -> Vec<IssueLayout> {
        vec![Self::layout()]
    }

    fn audit(&self, ctx: &AuditContext<'_>) -> Result<ModuleOutput> {
        let (registry, discovered) = self.build_graph(ctx)?;
        let fallback = Arc::new(Self::resources_descriptor());
        let mut report = IssueReport::new();

        {
            let mut factory = IssueFactory::new(&registry, ctx.rules());
            if let Some(scope) = &ctx.config().scope {
                factory = factory.with_scope(scope.clone());
            }

            for (id, path) in &discovered {
                let descriptor = ctx
                    .catalog()
                    .lookup(IssueCategory::Assets, path)
                    .unwrap_or(&fallback);
                let issue =
                    factory.create_issue(IssueCategory::Assets, path, *id, descriptor, Vec::<String>::new())?;
                report.add_issue(issue);
            }
        }

        info!(
            nodes = registry.len(),
            edges = registry.edge_count(),
            issues = report.num_total_issues(),
            "resources scan finished"
        );

        Ok(ModuleOutput {
            module: self.name(),
            registry,
            report,
        })
    }
}

/// File name without extension.
fn display_name(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(path)
        .to_string()
}
