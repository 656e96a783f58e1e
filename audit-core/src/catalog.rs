//! Problem descriptors and the descriptor catalog.
//!
//! A descriptor is the static description of a class of problem. Descriptors
//! are loaded once before a scan, never mutated, and shared by every issue
//! that reports them.
//!
//! The catalog maps `(category, subject)` to the first descriptor of that
//! category whose pattern matches the subject, in load order. Patterns are
//! compiled when the catalog is built.

use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{AuditError, Result};
use crate::severity::Severity;

/// Issue category. Each category has its own partition in the report and its
/// own export layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IssueCategory {
    Assets,
    Shaders,
    ShaderCompilationLog,
    ShaderVariants,
    Code,
    ProjectSettings,
}

impl IssueCategory {
    /// All categories in declaration order.
    pub const ALL: [IssueCategory; 6] = [
        IssueCategory::Assets,
        IssueCategory::Shaders,
        IssueCategory::ShaderCompilationLog,
        IssueCategory::ShaderVariants,
        IssueCategory::Code,
        IssueCategory::ProjectSettings,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            IssueCategory::Assets => "Assets",
            IssueCategory::Shaders => "Shaders",
            IssueCategory::ShaderCompilationLog => "ShaderCompilationLog",
            IssueCategory::ShaderVariants => "ShaderVariants",
            IssueCategory::Code => "Code",
            IssueCategory::ProjectSettings => "ProjectSettings",
        }
    }
}

impl std::fmt::Display for IssueCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Area of the product a problem affects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "GPU")]
    Gpu,
    Memory,
    BuildSize,
    LoadTimes,
}

impl Area {
    pub fn name(&self) -> &'static str {
        match self {
            Area::Cpu => "CPU",
            Area::Gpu => "GPU",
            Area::Memory => "Memory",
            Area::BuildSize => "BuildSize",
            Area::LoadTimes => "LoadTimes",
        }
    }
}

/// Which subjects a descriptor applies to.
///
/// String forms: `*` (anything), `*.ext` (case-insensitive suffix),
/// `re:<regex>`, or an exact subject.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum MatchPattern {
    #[default]
    Any,
    Suffix(String),
    Regex(Regex),
    Exact(String),
}

impl MatchPattern {
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() || pattern == "*" {
            return Ok(MatchPattern::Any);
        }
        if let Some(re) = pattern.strip_prefix("re:") {
            return Regex::new(re)
                .map(MatchPattern::Regex)
                .map_err(|source| AuditError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                });
        }
        if let Some(suffix) = pattern.strip_prefix('*') {
            return Ok(MatchPattern::Suffix(suffix.to_ascii_lowercase()));
        }
        Ok(MatchPattern::Exact(pattern.to_string()))
    }

    pub fn matches(&self, subject: &str) -> bool {
        match self {
            MatchPattern::Any => true,
            MatchPattern::Suffix(suffix) => subject.to_ascii_lowercase().ends_with(suffix.as_str()),
            MatchPattern::Regex(re) => re.is_match(subject),
            MatchPattern::Exact(exact) => subject == exact,
        }
    }
}

impl TryFrom<String> for MatchPattern {
    type Error = AuditError;

    fn try_from(value: String) -> Result<Self> {
        MatchPattern::parse(&value)
    }
}

impl From<MatchPattern> for String {
    fn from(pattern: MatchPattern) -> Self {
        match pattern {
            MatchPattern::Any => "*".to_string(),
            MatchPattern::Suffix(suffix) => format!("*{suffix}"),
            MatchPattern::Regex(re) => format!("re:{}", re.as_str()),
            MatchPattern::Exact(exact) => exact,
        }
    }
}

/// Static metadata for one class of problem.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDescriptor {
    pub id: String,
    /// Short description, also used as the issue name fallback check.
    pub title: String,
    pub category: IssueCategory,
    #[serde(default)]
    pub areas: Vec<Area>,
    #[serde(default)]
    pub pattern: MatchPattern,
    #[serde(default)]
    pub problem: String,
    #[serde(default)]
    pub solution: String,
    #[serde(rename = "severity")]
    pub default_severity: Severity,
    /// Issues for this descriptor are critical regardless of graph context.
    #[serde(default)]
    pub always_critical: bool,
}

impl ProblemDescriptor {
    pub fn new(
        id: impl Into<String>,
        category: IssueCategory,
        title: impl Into<String>,
        default_severity: Severity,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            areas: Vec::new(),
            pattern: MatchPattern::Any,
            problem: String::new(),
            solution: String::new(),
            default_severity,
            always_critical: false,
        }
    }

    /// Areas joined with `|`, as used in exports.
    pub fn area_list(&self) -> String {
        self.areas
            .iter()
            .map(Area::name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Immutable descriptor table.
#[derive(Debug, Clone, Default)]
pub struct DescriptorCatalog {
    by_id: IndexMap<String, Arc<ProblemDescriptor>>,
}

impl DescriptorCatalog {
    /// Build a catalog. Ids must be unique.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = ProblemDescriptor>) -> Result<Self> {
        let mut by_id = IndexMap::new();
        for descriptor in descriptors {
            if by_id.contains_key(&descriptor.id) {
                return Err(AuditError::DuplicateDescriptor(descriptor.id));
            }
            by_id.insert(descriptor.id.clone(), Arc::new(descriptor));
        }
        Ok(Self { by_id })
    }

    /// Build a catalog from a JSON array of descriptors.
    pub fn from_json(json: &str) -> Result<Self> {
        let descriptors: Vec<ProblemDescriptor> = serde_json::from_str(json)?;
        Self::from_descriptors(descriptors)
    }

    pub fn get(&self, id: &str) -> Option<&Arc<ProblemDescriptor>> {
        self.by_id.get(id)
    }

    /// First descriptor of `category` whose pattern matches `subject`.
    pub fn lookup(&self, category: IssueCategory, subject: &str) -> Option<&Arc<ProblemDescriptor>> {
        self.by_id
            .values()
            .find(|d| d.category == category && d.pattern.matches(subject))
    }

    pub fn of_category(&self, category: IssueCategory) -> impl Iterator<Item = &Arc<ProblemDescriptor>> {
        self.by_id.values().filter(move |d| d.category == category)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<ProblemDescriptor>> {
        self.by_id.values()
    }
}
