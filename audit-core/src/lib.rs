//! Audit Core
//!
//! This crate provides the analysis core of a project auditor. It implements:
//!
//! - A de-duplicated dependency graph of scanned artifacts
//! - Descriptor catalogs and severity override rules
//! - Severity resolution driven by graph context
//! - Category-partitioned, exportable issue reports
//!
//! Artifact enumeration and dependency closures come from the host through
//! the traits in [`scan`]; the crate does no I/O of its own.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `graph`: node registry, reachability, shared registry
//! - `catalog`: issue categories, problem descriptors
//! - `rules` / `severity`: override rules and the severity resolver
//! - `issue` / `layout` / `report`: issues, export layouts, the report
//! - `scan`: collaborator traits, scan modules, the module runner
//!
//! # Example
//!
//! ```rust
//! use audit_core::config::AuditConfig;
//! use audit_core::catalog::IssueCategory;
//! use audit_core::scan::{AuditContext, Auditor, MemoryProject};
//!
//! let project = MemoryProject::new()
//!     .with_artifact("Assets/Resources/Hero.prefab", ["Assets/Art/hero.png"]);
//! let config = AuditConfig::default();
//! let auditor = Auditor::with_default_modules();
//! let catalog = auditor.catalog(Vec::new()).unwrap();
//! let ctx = AuditContext::new(&config, &catalog, &project, &project);
//!
//! let outcome = auditor.audit(&ctx).unwrap();
//! assert_eq!(outcome.num_issues(IssueCategory::Assets), 2);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod graph;
pub mod issue;
pub mod layout;
pub mod report;
pub mod rules;
pub mod scan;
pub mod severity;

pub use catalog::{DescriptorCatalog, IssueCategory, ProblemDescriptor};
pub use error::{AuditError, Result};
pub use graph::{DependencyNode, NodeId, NodeRegistry};
pub use issue::{Issue, IssueFactory, Location};
pub use report::{ExportTable, IssueReport};
pub use severity::Severity;
