//! Severity override rules.
//!
//! Rules arrive pre-parsed from the host. A rule targets one descriptor id
//! and may be limited to a scope (for example a build target or module
//! name). A scoped rule beats an unscoped one when the scope matches.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

/// User-supplied severity override for one descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Descriptor id this rule applies to.
    pub id: String,
    pub severity: Severity,
    /// Optional scope the rule is limited to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
}

impl Rule {
    pub fn new(id: impl Into<String>, severity: Severity) -> Self {
        Self {
            id: id.into(),
            severity,
            filter: None,
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }
}

/// Rules keyed by `(descriptor id, filter)`.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: IndexMap<(String, Option<String>), Rule>,
}

impl RuleSet {
    pub fn new(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut set = Self::default();
        for rule in rules {
            set.add_rule(rule);
        }
        set
    }

    /// Add a rule, replacing any rule with the same id and filter.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules
            .insert((rule.id.clone(), rule.filter.clone()), rule);
    }

    /// The rule registered for exactly this id and filter.
    pub fn get(&self, id: &str, filter: Option<&str>) -> Option<&Rule> {
        self.rules.get(&(id.to_string(), filter.map(str::to_string)))
    }

    /// Override severity for `id`, preferring a rule scoped to `scope`.
    pub fn override_for(&self, id: &str, scope: Option<&str>) -> Option<Severity> {
        scope
            .and_then(|s| self.get(id, Some(s)))
            .or_else(|| self.get(id, None))
            .map(|rule| rule.severity)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.values()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self::new(iter)
    }
}

impl FromIterator<(String, Severity)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (String, Severity)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(id, severity)| Rule::new(id, severity)))
    }
}
