//! Integration Tests for the Audit Pipeline
//!
//! These tests drive the graph, resolver, factory, and report together
//! through the public API.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use audit_core::catalog::{DescriptorCatalog, IssueCategory, MatchPattern, ProblemDescriptor};
use audit_core::config::AuditConfig;
use audit_core::error::{AuditError, CollaboratorError};
use audit_core::graph::{NodeRegistry, ReachSession, SharedRegistry};
use audit_core::issue::IssueFactory;
use audit_core::layout::IssueLayout;
use audit_core::report::IssueReport;
use audit_core::rules::{Rule, RuleSet};
use audit_core::scan::{
    ArtifactSource, AssetsModule, AuditContext, AuditModule, Auditor, DependencySource, MemoryProject,
    ModuleOutput, RESOURCES_DESCRIPTOR_ID,
};
use audit_core::severity::Severity;

fn run_assets(project: &MemoryProject, config: &AuditConfig) -> ModuleOutput {
    let catalog = DescriptorCatalog::default();
    let ctx = AuditContext::new(config, &catalog, project, project);
    AssetsModule::new().audit(&ctx).unwrap()
}

/// Two roots sharing a dependency produce one node and one issue for it.
#[test]
fn shared_dependency_is_reported_once() {
    let project = MemoryProject::new()
        .with_artifact("Assets/Resources/A.prefab", ["Assets/B.mat", "Assets/C.png"])
        .with_artifact("Assets/Resources/D.prefab", ["Assets/B.mat"]);

    let output = run_assets(&project, &AuditConfig::default());

    assert_eq!(output.report.num_total_issues(), 4);
    let names: Vec<_> = output
        .report
        .issues_of(IssueCategory::Assets)
        .map(|i| i.description().to_string())
        .collect();
    assert_eq!(names, vec!["A", "B", "C", "D"]);

    let registry = &output.registry;
    let b = registry.get_by_key("Assets/B.mat").unwrap();
    let a = registry.id_of("Assets/Resources/A.prefab").unwrap();
    let d = registry.id_of("Assets/Resources/D.prefab").unwrap();
    assert_eq!(b.referencers().len(), 2);
    assert!(b.referencers().contains(&a));
    assert!(b.referencers().contains(&d));

    let b_issues = output
        .report
        .issues_of(IssueCategory::Assets)
        .filter(|i| i.node() == b.id())
        .count();
    assert_eq!(b_issues, 1);
}

/// Code files in a closure never become nodes or issues.
#[test]
fn code_dependencies_are_not_interned() {
    let project = MemoryProject::new().with_artifact(
        "Assets/Resources/Enemy.prefab",
        ["Assets/Scripts/Enemy.cs", "Assets/Scripts/AI.CS", "Assets/Art/enemy.png"],
    );

    let output = run_assets(&project, &AuditConfig::default());

    assert_eq!(output.report.num_total_issues(), 2);
    assert!(!output.registry.contains("Assets/Scripts/Enemy.cs"));
    assert!(!output.registry.contains("Assets/Scripts/AI.CS"));
    assert!(output.registry.contains("Assets/Art/enemy.png"));
}

/// A root that shows up in its own closure does not reference itself.
#[test]
fn root_in_own_closure_is_skipped() {
    let project = MemoryProject::new()
        .with_artifact("Assets/Resources/Loop.prefab", ["Assets/Mid.asset"])
        .with_artifact("Assets/Mid.asset", ["Assets/Resources/Loop.prefab"]);

    let output = run_assets(&project, &AuditConfig::default());

    let root = output.registry.get_by_key("Assets/Resources/Loop.prefab").unwrap();
    assert!(root.referencers().is_empty());
    assert_eq!(output.report.num_total_issues(), 2);
}

/// An Info descriptor reachable from a critical root escalates to Warning.
#[test]
fn criticality_escalates_info_to_warning() {
    let mut registry = NodeRegistry::new();
    registry.intern("root", "root", None, true).unwrap();
    let n = registry.intern("n", "n", Some("root"), false).unwrap().id;
    let rules = RuleSet::default();
    let mut factory = IssueFactory::new(&registry, &rules);

    let x = Arc::new(ProblemDescriptor::new("X", IssueCategory::Code, "X", Severity::Info));
    let y = Arc::new(ProblemDescriptor::new("Y", IssueCategory::Code, "Y", Severity::Error));

    let issue_x = factory
        .create_issue(IssueCategory::Code, "x.cs:1", n, &x, Vec::<String>::new())
        .unwrap();
    let issue_y = factory
        .create_issue(IssueCategory::Code, "y.cs:1", n, &y, Vec::<String>::new())
        .unwrap();

    assert_eq!(issue_x.severity(), Severity::Warning);
    assert_eq!(issue_y.severity(), Severity::Error);
}

/// Override rules only apply outside critical context; critical issues keep
/// the default floored at Warning.
#[test]
fn overrides_do_not_apply_in_critical_context() {
    let project = MemoryProject::new()
        .with_artifact("Assets/Resources/Boot.prefab", ["Assets/Art/splash.png"])
        .with_artifact("Assets/Resources/Menu.prefab", Vec::<String>::new());
    let mut config = AuditConfig::default();
    config.assets.critical_root_patterns = vec!["re:Boot".to_string()];
    config.rules = vec![Rule::new(RESOURCES_DESCRIPTOR_ID, Severity::Error)];

    let output = run_assets(&project, &config);
    let severities: Vec<_> = output
        .report
        .issues_of(IssueCategory::Assets)
        .map(|i| (i.description().to_string(), i.severity()))
        .collect();

    assert_eq!(
        severities,
        vec![
            ("Boot".to_string(), Severity::Warning),
            ("splash".to_string(), Severity::Warning),
            ("Menu".to_string(), Severity::Error),
        ]
    );
}

/// An Error descriptor in critical context is not lowered by an Info rule.
#[test]
fn critical_error_survives_info_override() {
    let mut registry = NodeRegistry::new();
    registry.intern("root", "root", None, true).unwrap();
    let n = registry.intern("n", "n", Some("root"), false).unwrap().id;
    let rules: RuleSet = vec![Rule::new("Y", Severity::Info)].into_iter().collect();
    let y = Arc::new(ProblemDescriptor::new("Y", IssueCategory::Code, "Y", Severity::Error));

    let issue = IssueFactory::new(&registry, &rules)
        .create_issue(IssueCategory::Code, "y.cs:3", n, &y, Vec::<String>::new())
        .unwrap();

    assert_eq!(issue.severity(), Severity::Error);
    assert!(issue.is_critical_context());
}

/// Artifacts reached only through a code-file root are still reported, as
/// parentless nodes.
#[test]
fn code_root_dependencies_are_reported() {
    let project = MemoryProject::new()
        .with_artifact("Assets/Resources/Loader.cs", ["Assets/Art/only.png"])
        .with_artifact("Assets/Resources/Hero.prefab", ["Assets/Art/only.png"]);

    let output = run_assets(&project, &AuditConfig::default());

    let names: Vec<_> = output
        .report
        .issues_of(IssueCategory::Assets)
        .map(|i| i.description().to_string())
        .collect();
    assert_eq!(names, vec!["only", "Hero"]);
    assert!(!output.registry.contains("Assets/Resources/Loader.cs"));

    let only = output.registry.get_by_key("Assets/Art/only.png").unwrap();
    let hero = output.registry.id_of("Assets/Resources/Hero.prefab").unwrap();
    assert_eq!(only.referencers().iter().copied().collect::<Vec<_>>(), vec![hero]);
}

/// Reachability over a cyclic referencer graph terminates.
#[test]
fn cyclic_graph_reachability_terminates() {
    let mut registry = NodeRegistry::new();
    let a = registry.intern("A", "A", None, false).unwrap().id;
    let b = registry.intern("B", "B", Some("A"), false).unwrap().id;
    registry.intern("A", "A", Some("B"), false).unwrap();

    let mut session = ReachSession::new(&registry);
    assert!(!session.reaches_critical_root(a));
    assert!(!session.reaches_critical_root(b));
    assert_eq!(session.ancestors(a), vec![b]);
    assert_eq!(session.descendants(a), vec![b]);
}

/// Severity is frozen when the issue is created.
#[test]
fn severity_does_not_change_after_creation() {
    let mut registry = NodeRegistry::new();
    registry.intern("cold", "cold", None, false).unwrap();
    let n = registry.intern("n", "n", Some("cold"), false).unwrap().id;
    let descriptor = Arc::new(ProblemDescriptor::new("X", IssueCategory::Code, "X", Severity::Info));
    let rules = RuleSet::default();

    let issue = IssueFactory::new(&registry, &rules)
        .create_issue(IssueCategory::Code, "n", n, &descriptor, Vec::<String>::new())
        .unwrap();

    registry.intern("hot", "hot", None, true).unwrap();
    registry.intern("n", "n", Some("hot"), false).unwrap();

    assert_eq!(issue.severity(), Severity::Info);
    let later = IssueFactory::new(&registry, &rules)
        .create_issue(IssueCategory::Code, "n", n, &descriptor, Vec::<String>::new())
        .unwrap();
    assert_eq!(later.severity(), Severity::Warning);
}

/// Exporting an unchanged report twice gives identical bytes.
#[test]
fn export_is_byte_identical() {
    let project = MemoryProject::new()
        .with_artifact("Assets/Resources/A.prefab", ["Assets/B.mat", "Assets/C.png"])
        .with_artifact("Assets/Resources/D.prefab", ["Assets/B.mat"]);
    let output = run_assets(&project, &AuditConfig::default());
    let layout = AssetsModule::layout();

    let first = output.report.export(&layout);
    let second = output.report.export(&layout);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    assert_eq!(first.to_msgpack().unwrap(), second.to_msgpack().unwrap());

    let rerun = run_assets(&project, &AuditConfig::default());
    assert_eq!(
        rerun.report.export(&layout).to_json().unwrap(),
        first.to_json().unwrap()
    );
}

/// Parallel closure enumeration produces the same report as the sequential pass.
#[test]
fn parallel_closures_match_sequential() {
    let mut project = MemoryProject::new();
    for root in 0..20 {
        let deps: Vec<String> = (0..10).map(|d| format!("Assets/Shared/{}.png", (root + d) % 15)).collect();
        project = project.with_artifact(&format!("Assets/Resources/R{root}.prefab"), deps);
    }
    let layout = AssetsModule::layout();

    let sequential = run_assets(&project, &AuditConfig::default());
    let mut parallel_config = AuditConfig::default();
    parallel_config.assets.parallel_closures = true;
    let parallel = run_assets(&project, &parallel_config);

    assert_eq!(
        sequential.report.export(&layout),
        parallel.report.export(&layout)
    );
    assert_eq!(sequential.registry.edge_count(), parallel.registry.edge_count());
}

/// Override rules and catalog descriptors feed the resources scan.
#[test]
fn catalog_and_rules_drive_asset_severity() {
    let project = MemoryProject::new()
        .with_artifact("Assets/Resources/Big.psd", Vec::<String>::new())
        .with_artifact("Assets/Resources/Small.png", Vec::<String>::new());
    let auditor = Auditor::with_default_modules();
    let mut psd = ProblemDescriptor::new("PAA0101", IssueCategory::Assets, "Source art in Resources", Severity::Info);
    psd.pattern = MatchPattern::parse("*.psd").unwrap();
    let catalog = auditor.catalog(vec![psd]).unwrap();

    let mut config = AuditConfig::default();
    config.rules = vec![
        Rule::new("PAA0101", Severity::Error),
        Rule::new(RESOURCES_DESCRIPTOR_ID, Severity::Warning).with_filter("Release"),
    ];
    config.scope = Some("Release".to_string());
    let ctx = AuditContext::new(&config, &catalog, &project, &project);

    let outcome = auditor.audit(&ctx).unwrap();
    let report = &outcome.output("assets").unwrap().report;
    let found: Vec<_> = report
        .issues_of(IssueCategory::Assets)
        .map(|i| (i.descriptor().id.clone(), i.severity()))
        .collect();

    assert_eq!(
        found,
        vec![
            ("PAA0101".to_string(), Severity::Error),
            (RESOURCES_DESCRIPTOR_ID.to_string(), Severity::Warning),
        ]
    );
}

/// A cancelled scan stops before the next root.
#[test]
fn cancellation_stops_scan() {
    let project = MemoryProject::new().with_artifact("Assets/Resources/A.prefab", Vec::<String>::new());
    let config = AuditConfig::default();
    let catalog = DescriptorCatalog::default();
    let cancel = AtomicBool::new(true);
    let ctx = AuditContext::new(&config, &catalog, &project, &project).with_cancellation(&cancel);

    assert!(matches!(AssetsModule::new().audit(&ctx), Err(AuditError::Cancelled)));
}

struct BrokenDependencies;

impl DependencySource for BrokenDependencies {
    fn closure_of(&self, _path: &str, _recursive: bool) -> Result<Vec<String>, CollaboratorError> {
        Err("asset database unavailable".into())
    }
}

/// Collaborator failures surface with the failing path.
#[test]
fn closure_failure_is_surfaced() {
    let project = MemoryProject::new().with_artifact("Assets/Resources/A.prefab", Vec::<String>::new());
    let config = AuditConfig::default();
    let catalog = DescriptorCatalog::default();
    let ctx = AuditContext::new(&config, &catalog, &project, &BrokenDependencies);

    let err = AssetsModule::new().audit(&ctx).unwrap_err();
    assert!(matches!(
        err,
        AuditError::Collaborator { operation: "closure_of", ref path, .. } if path == "Assets/Resources/A.prefab"
    ));
    assert!(err.to_string().contains("asset database unavailable"));
}

/// Modules run side by side and come back in registration order.
#[test]
fn auditor_keeps_module_order() {
    struct SettingsModule;

    impl AuditModule for SettingsModule {
        fn name(&self) -> &'static str {
            "settings"
        }

        fn descriptors(&self) -> Vec<ProblemDescriptor> {
            vec![ProblemDescriptor::new("PAS0001", IssueCategory::ProjectSettings, "Static batching off", Severity::Info)]
        }

        fn layouts(&self) -> Vec<IssueLayout> {
            vec![IssueLayout::generic(IssueCategory::ProjectSettings)]
        }

        fn audit(&self, ctx: &AuditContext<'_>) -> audit_core::Result<ModuleOutput> {
            let mut registry = NodeRegistry::new();
            let node = registry.intern("Player/StaticBatching", "Static Batching", None, false)?.id;
            let mut report = IssueReport::new();
            {
                let descriptor = ctx.catalog().get("PAS0001").cloned().expect("descriptor registered");
                let mut factory = IssueFactory::new(&registry, ctx.rules());
                report.add_issue(factory.create_issue(
                    IssueCategory::ProjectSettings,
                    "ProjectSettings/ProjectSettings.asset",
                    node,
                    &descriptor,
                    Vec::<String>::new(),
                )?);
            }
            Ok(ModuleOutput {
                module: self.name(),
                registry,
                report,
            })
        }
    }

    let project = MemoryProject::new().with_artifact("Assets/Resources/A.prefab", Vec::<String>::new());
    let config = AuditConfig::default();
    let auditor = Auditor::with_default_modules().with_module(SettingsModule);
    let catalog = auditor.catalog(Vec::new()).unwrap();
    let ctx = AuditContext::new(&config, &catalog, &project, &project);

    let outcome = auditor.audit(&ctx).unwrap();
    let names: Vec<_> = outcome.outputs.iter().map(|o| o.module).collect();
    assert_eq!(names, vec!["assets", "settings"]);
    assert_eq!(outcome.num_total_issues(), 2);
    assert_eq!(outcome.num_issues(IssueCategory::ProjectSettings), 1);
}

/// Interning from several threads creates each artifact once and keeps every edge.
#[test]
fn shared_registry_merges_concurrent_discoveries() {
    let shared = SharedRegistry::new();
    let roots: Vec<String> = (0..4).map(|r| format!("Assets/Resources/R{r}.prefab")).collect();
    for root in &roots {
        shared.intern(root, "root", None, false).unwrap();
    }

    std::thread::scope(|scope| {
        for root in &roots {
            let shared = shared.clone();
            scope.spawn(move || {
                for dep in 0..32 {
                    shared
                        .intern(&format!("Assets/Shared/{dep}.png"), "dep", Some(root.as_str()), false)
                        .unwrap();
                }
            });
        }
    });

    let registry = shared.into_inner().ok().unwrap();
    assert_eq!(registry.len(), 4 + 32);
    assert_eq!(registry.edge_count(), 4 * 32);
}

/// The artifact source trait is object safe and usable on its own.
#[test]
fn memory_project_lists_through_trait_object() {
    let project = MemoryProject::new().with_artifact("Assets/Resources/A.prefab", ["Assets/B.mat"]);
    let source: &dyn ArtifactSource = &project;

    let listed = source.list_artifacts(&|p: &str| p.ends_with(".mat")).unwrap();
    assert_eq!(listed, vec!["Assets/B.mat"]);
}
