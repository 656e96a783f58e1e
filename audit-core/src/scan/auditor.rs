//! Module runner.
//!
//! Modules share nothing mutable, so the auditor runs them on the rayon pool
//! and hands back their outputs in registration order.

use rayon::prelude::*;
use tracing::{debug, info};

use super::{AssetsModule, AuditContext, AuditModule, ModuleOutput};
use crate::catalog::{DescriptorCatalog, IssueCategory, ProblemDescriptor};
use crate::error::Result;
use crate::layout::IssueLayout;

#[derive(Default)]
pub struct Auditor {
    modules: Vec<Box<dyn AuditModule>>,
}

impl Auditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Auditor with every built-in module.
    pub fn with_default_modules() -> Self {
        Self::new().with_module(AssetsModule::new())
    }

    pub fn with_module(mut self, module: impl AuditModule + 'static) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.name()).collect()
    }

    /// Catalog of `extra` descriptors followed by every module's own
    /// descriptors. Earlier entries win lookups.
    pub fn catalog(&self, extra: impl IntoIterator<Item = ProblemDescriptor>) -> Result<DescriptorCatalog> {
        let descriptors = extra
            .into_iter()
            .chain(self.modules.iter().flat_map(|m| m.descriptors()));
        DescriptorCatalog::from_descriptors(descriptors)
    }

    pub fn layouts(&self) -> Vec<IssueLayout> {
        self.modules.iter().flat_map(|m| m.layouts()).collect()
    }

    /// Layout declared for `category`, or the generic one.
    pub fn layout_for(&self, category: IssueCategory) -> IssueLayout {
        self.layouts()
            .into_iter()
            .find(|layout| layout.category == category)
            .unwrap_or_else(|| IssueLayout::generic(category))
    }

    /// Run every module. Fails with the first module error in registration
    /// order.
    pub fn audit(&self, ctx: &AuditContext<'_>) -> Result<AuditOutcome> {
        debug!(modules = ?self.module_names(), "starting audit");
        let outputs = self
            .modules
            .par_iter()
            .map(|module| module.audit(ctx))
            .collect::<Vec<_>>()
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        let outcome = AuditOutcome { outputs };
        info!(issues = outcome.num_total_issues(), "audit finished");
        Ok(outcome)
    }
}

/// Outputs of one audit run, in module registration order.
#[derive(Debug)]
pub struct AuditOutcome {
    pub outputs: Vec<ModuleOutput>,
}

impl AuditOutcome {
    pub fn output(&self, module: &str) -> Option<&ModuleOutput> {
        self.outputs.iter().find(|o| o.module == module)
    }

    pub fn num_issues(&self, category: IssueCategory) -> usize {
        self.outputs.iter().map(|o| o.report.num_issues(category)).sum()
    }

    pub fn num_total_issues(&self) -> usize {
        self.outputs.iter().map(|o| o.report.num_total_issues()).sum()
    }
}
