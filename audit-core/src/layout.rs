//! Column layouts for each issue category.
//!
//! A layout declares which columns an export of its category has and how
//! each column is filled from an issue. Custom columns read the issue's
//! positional custom properties by index.

use serde::{Deserialize, Serialize};

use crate::catalog::IssueCategory;
use crate::issue::Issue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyKind {
    /// Issue description (affected artifact name).
    Description,
    /// Descriptor title.
    Descriptor,
    Severity,
    Area,
    Filename,
    Path,
    Line,
    Directory,
    FileType,
    CriticalContext,
    /// Positional custom property.
    Custom(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub kind: PropertyKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_name: Option<String>,
    /// Column used for grouping by default in UIs.
    #[serde(default)]
    pub default_group: bool,
}

impl PropertyDefinition {
    pub fn new(kind: PropertyKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            long_name: None,
            default_group: false,
        }
    }

    pub fn long_name(mut self, long_name: impl Into<String>) -> Self {
        self.long_name = Some(long_name.into());
        self
    }

    pub fn default_group(mut self) -> Self {
        self.default_group = true;
        self
    }

    /// Render this column's cell for `issue`.
    pub fn cell(&self, issue: &Issue) -> String {
        match self.kind {
            PropertyKind::Description => issue.description().to_string(),
            PropertyKind::Descriptor => issue.descriptor().title.clone(),
            PropertyKind::Severity => issue.severity().to_string(),
            PropertyKind::Area => issue.descriptor().area_list(),
            PropertyKind::Filename => issue.filename().to_string(),
            PropertyKind::Path => issue.relative_path().to_string(),
            PropertyKind::Line => issue.line().to_string(),
            PropertyKind::Directory => issue.location().directory().to_string(),
            PropertyKind::FileType => issue.location().extension().to_string(),
            PropertyKind::CriticalContext => issue.is_critical_context().to_string(),
            PropertyKind::Custom(index) => issue.custom_property(index).to_string(),
        }
    }
}

/// Column declaration for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLayout {
    pub category: IssueCategory,
    pub properties: Vec<PropertyDefinition>,
}

impl IssueLayout {
    pub fn new(category: IssueCategory, properties: Vec<PropertyDefinition>) -> Self {
        Self {
            category,
            properties,
        }
    }

    /// Layout with descriptor, severity, and location columns.
    pub fn generic(category: IssueCategory) -> Self {
        Self::new(
            category,
            vec![
                PropertyDefinition::new(PropertyKind::Descriptor, "Issue").default_group(),
                PropertyDefinition::new(PropertyKind::Description, "Name"),
                PropertyDefinition::new(PropertyKind::Severity, "Severity"),
                PropertyDefinition::new(PropertyKind::Area, "Area"),
                PropertyDefinition::new(PropertyKind::Path, "Path"),
                PropertyDefinition::new(PropertyKind::Line, "Line"),
            ],
        )
    }

    pub fn headers(&self) -> Vec<String> {
        self.properties.iter().map(|p| p.name.clone()).collect()
    }

    pub fn row(&self, issue: &Issue) -> Vec<String> {
        self.properties.iter().map(|p| p.cell(issue)).collect()
    }

    /// The column flagged as default group, if any.
    pub fn default_group(&self) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.default_group)
    }
}
