//! Issue report.
//!
//! An append-only store of issues partitioned by category. Insertion order
//! inside a category is preserved, which keeps exports deterministic.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::IssueCategory;
use crate::error::Result;
use crate::issue::Issue;
use crate::layout::IssueLayout;
use crate::severity::Severity;

#[derive(Debug, Default)]
pub struct IssueReport {
    issues: BTreeMap<IssueCategory, Vec<Issue>>,
    total: usize,
}

impl IssueReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an issue to its category.
    pub fn add_issue(&mut self, issue: Issue) {
        self.issues.entry(issue.category()).or_default().push(issue);
        self.total += 1;
    }

    pub fn num_issues(&self, category: IssueCategory) -> usize {
        self.issues.get(&category).map_or(0, Vec::len)
    }

    pub fn num_total_issues(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Issues of `category` in insertion order.
    pub fn issues_of(&self, category: IssueCategory) -> std::slice::Iter<'_, Issue> {
        self.issues
            .get(&category)
            .map(|issues| issues.iter())
            .unwrap_or_default()
    }

    /// Every issue, category by category.
    pub fn iter(&self) -> impl Iterator<Item = &Issue> {
        self.issues.values().flatten()
    }

    /// Categories that have at least one issue.
    pub fn categories(&self) -> impl Iterator<Item = IssueCategory> + '_ {
        self.issues.keys().copied()
    }

    pub fn filter<'a, F>(&'a self, category: IssueCategory, predicate: F) -> impl Iterator<Item = &'a Issue>
    where
        F: Fn(&Issue) -> bool + 'a,
    {
        self.issues_of(category).filter(move |issue| predicate(*issue))
    }

    pub fn num_issues_with_severity(&self, category: IssueCategory, severity: Severity) -> usize {
        self.issues_of(category)
            .filter(|issue| issue.severity() == severity)
            .count()
    }

    /// Tabular projection of `layout.category`.
    pub fn export(&self, layout: &IssueLayout) -> ExportTable {
        ExportTable {
            category: layout.category,
            headers: layout.headers(),
            rows: self.issues_of(layout.category).map(|issue| layout.row(issue)).collect(),
        }
    }
}

impl Extend<Issue> for IssueReport {
    fn extend<I: IntoIterator<Item = Issue>>(&mut self, iter: I) {
        for issue in iter {
            self.add_issue(issue);
        }
    }
}

/// Rows of one category, one cell per layout column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportTable {
    pub category: IssueCategory,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_msgpack(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(self)?)
    }
}
