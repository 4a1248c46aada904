//! Integration tests for the analysis pipeline.
//!
//! These tests run the whole pipeline over the fixture repository in
//! `testdata/sample_repo` and over small repositories built in temporary
//! directories.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use codebase_analyzer::detect::complexity;
use codebase_analyzer::filter::DEFAULT_IGNORE_NAMES;
use codebase_analyzer::{
    Analysis, AnalyzeError, Analyzer, AnalyzerConfig, ExtractionStatus, FileRecord, Language,
    TagCategory,
};

fn testdata_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("testdata")
}

fn setup() {
    codebase_analyzer::init();
}

fn fixed_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

fn analyze_sample() -> Analysis {
    setup();
    let root = testdata_path().join("sample_repo");
    Analyzer::new(&root, AnalyzerConfig::default())
        .expect("sample repo should open")
        .run_at(fixed_timestamp())
        .expect("analysis should succeed")
}

fn record<'a>(analysis: &'a Analysis, path: &str) -> &'a FileRecord {
    analysis
        .records
        .iter()
        .find(|r| r.path == path)
        .unwrap_or_else(|| panic!("no record for {}", path))
}

fn tag_values(record: &FileRecord, category: TagCategory) -> Vec<&str> {
    record
        .pattern_tags
        .iter()
        .filter(|t| t.category == category)
        .map(|t| t.value.as_str())
        .collect()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// Python source with `defs` one-line functions.
fn python_with_defs(defs: usize) -> String {
    (0..defs).map(|i| format!("def f{}(): pass\n", i)).collect()
}

// =============================================================================
// Sample repository
// =============================================================================

#[test]
fn test_records_follow_traversal_order() {
    let analysis = analyze_sample();
    let paths: Vec<&str> = analysis.records.iter().map(|r| r.path.as_str()).collect();

    // Markdown, JSON and plain text have no language entry
    assert_eq!(
        paths,
        vec![
            "app.py",
            "broken.py",
            "db/schema.sql",
            "models/user.py",
            "server.js",
            "services/billing.ts",
            "web/src/App.jsx",
            "web/src/components/Button.jsx",
        ]
    );
}

#[test]
fn test_summary_histogram_and_frameworks() {
    let analysis = analyze_sample();
    let summary = &analysis.summary;

    assert_eq!(summary.name, "sample_repo");
    assert_eq!(summary.file_count, analysis.records.len());
    assert_eq!(
        summary.language_histogram.values().sum::<usize>(),
        summary.file_count
    );
    assert_eq!(summary.language_histogram.get("python"), Some(&3));
    assert_eq!(summary.language_histogram.get("react"), Some(&2));
    assert_eq!(summary.language_histogram.get("sql"), Some(&1));
    assert_eq!(
        summary.total_lines,
        analysis.records.iter().map(|r| r.line_count).sum::<usize>()
    );
    assert_eq!(
        summary.detected_frameworks.iter().collect::<Vec<_>>(),
        vec!["Express", "Flask", "React"]
    );
}

#[test]
fn test_summary_probes() {
    let analysis = analyze_sample();
    let summary = &analysis.summary;

    assert_eq!(summary.entry_points, vec!["app.py", "server.js"]);
    assert_eq!(summary.config_paths, vec!["package.json", "requirements.txt"]);
    assert_eq!(summary.doc_paths, vec!["README.md", "docs/guide.md"]);
}

#[test]
fn test_dependency_manifest_merges_ecosystems() {
    let analysis = analyze_sample();
    let deps = &analysis.summary.dependency_manifest;

    assert_eq!(
        deps.keys().map(String::as_str).collect::<Vec<_>>(),
        vec![
            "npm:axios",
            "npm:express",
            "npm:jest",
            "npm:react",
            "pip:flask",
            "pip:requests",
        ]
    );
    assert_eq!(deps.get("npm:express").map(String::as_str), Some("^4.18.2"));
    assert_eq!(deps.get("pip:flask").map(String::as_str), Some("flask==3.0.0"));
}

#[cfg(feature = "tree-sitter")]
#[test]
fn test_python_records() {
    let analysis = analyze_sample();

    let app = record(&analysis, "app.py");
    assert_eq!(app.declared_language, Language::Python);
    assert_eq!(app.file_type, ".py");
    assert_eq!(app.callable_declarations, vec!["list_users", "health"]);
    assert_eq!(tag_values(app, TagCategory::Endpoint), vec!["/users", "/health"]);

    let user = record(&analysis, "models/user.py");
    assert_eq!(user.type_declarations, vec!["User"]);
    assert_eq!(user.callable_declarations, vec!["display_name"]);
    assert_eq!(tag_values(user, TagCategory::PersistenceModel), vec!["User"]);
}

#[cfg(feature = "tree-sitter")]
#[test]
fn test_syntax_error_is_marked_not_dropped() {
    let analysis = analyze_sample();

    let broken = record(&analysis, "broken.py");
    assert_eq!(broken.extraction, ExtractionStatus::ParseFailed);
    assert!(broken.callable_declarations.is_empty());
    assert!(broken.line_count > 0);
}

#[cfg(feature = "tree-sitter")]
#[test]
fn test_script_records() {
    let analysis = analyze_sample();

    let server = record(&analysis, "server.js");
    assert_eq!(server.extraction, ExtractionStatus::Parsed);
    assert_eq!(server.imports, vec!["express"]);
    assert_eq!(server.exports, vec!["app"]);
    assert_eq!(tag_values(server, TagCategory::Endpoint), vec!["/api/items"]);

    let billing = record(&analysis, "services/billing.ts");
    assert_eq!(billing.imports, vec!["axios"]);
    assert_eq!(billing.type_declarations, vec!["Invoice"]);
    assert_eq!(billing.callable_declarations, vec!["fetchInvoices"]);
    assert!(tag_values(billing, TagCategory::UiComponent).is_empty());

    let app = record(&analysis, "web/src/App.jsx");
    assert_eq!(app.declared_language, Language::React);
    assert_eq!(app.imports, vec!["react", "./components/Button"]);
    assert_eq!(tag_values(app, TagCategory::UiComponent), vec!["App"]);
}

#[test]
fn test_sql_uses_heuristics() {
    let analysis = analyze_sample();

    let schema = record(&analysis, "db/schema.sql");
    assert_eq!(schema.extraction, ExtractionStatus::Heuristic);
    assert_eq!(
        tag_values(schema, TagCategory::PersistenceModel),
        vec!["accounts"]
    );
}

#[test]
fn test_context_lists() {
    let analysis = analyze_sample();
    let context = &analysis.context;

    let endpoints: Vec<(&str, &str)> = context
        .endpoints
        .iter()
        .map(|t| (t.value.as_str(), t.source_path.as_str()))
        .collect();
    assert_eq!(
        endpoints,
        vec![
            ("/users", "app.py"),
            ("/health", "app.py"),
            ("/api/items", "server.js"),
        ]
    );

    let models: Vec<&str> = context.models.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(models, vec!["accounts", "User"]);

    let components: Vec<&str> = context
        .ui_components
        .iter()
        .map(|t| t.value.as_str())
        .collect();
    assert_eq!(components, vec!["App", "Button"]);

    assert_eq!(
        context.architecture_patterns,
        vec![
            "Model-View Architecture",
            "Service Layer Pattern",
            "Component-Based Architecture",
        ]
    );
    assert_eq!(context.external_services, vec!["npm:axios", "pip:requests"]);
    assert_eq!(context.entry_points, analysis.summary.entry_points);
    assert_eq!(context.analysis_timestamp, fixed_timestamp());
    assert!(context.progress_markers.components_mapped);
}

#[test]
fn test_repeated_runs_are_identical() {
    let first = analyze_sample();
    let second = analyze_sample();

    assert_eq!(
        serde_json::to_string(&first.records).unwrap(),
        serde_json::to_string(&second.records).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.summary).unwrap(),
        serde_json::to_string(&second.summary).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&first.context).unwrap(),
        serde_json::to_string(&second.context).unwrap()
    );
}

// =============================================================================
// Temporary repositories
// =============================================================================

#[test]
fn test_ignored_components_never_reach_records() {
    setup();
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "src/app.py", "import os\n");
    write(root, "node_modules/left-pad/index.js", "module.exports = 1;\n");
    write(root, "web/node_modules/react/index.js", "export default 1;\n");
    write(root, "pkg/__pycache__/mod.py", "x = 1\n");
    write(root, "dist/bundle.js", "var a = 1;\n");
    write(root, ".git/hooks/pre-commit.py", "print()\n");
    write(root, "src/.env.py", "SECRET = 1\n");
    write(root, "README.md", "# demo\n");
    write(root, "node_modules/pkg/README.md", "# pkg\n");
    write(root, "node_modules/pkg/package.json", "{\"name\": \"pkg\"}\n");
    write(root, ".github/config.yml", "on: push\n");

    let analysis = Analyzer::new(root, AnalyzerConfig::default())
        .unwrap()
        .run()
        .unwrap();

    let paths: Vec<&str> = analysis.records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["src/app.py"]);
    for record in &analysis.records {
        assert!(record
            .path
            .split('/')
            .all(|part| !DEFAULT_IGNORE_NAMES.contains(&part) && !part.starts_with('.')));
    }

    // summary paths come from the same pruned walk as the records
    assert_eq!(analysis.summary.doc_paths, vec!["README.md"]);
    assert!(analysis.summary.config_paths.is_empty());
    assert!(analysis.summary.dependency_manifest.is_empty());
}

#[test]
fn test_key_components_ranked_by_score() {
    setup();
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    let low = python_with_defs(14);
    let high = python_with_defs(21);
    write(root, "a_low.py", &low);
    write(root, "z_high.py", &high);
    write(root, "tiny.py", "x = 1\n");

    let low_score = complexity::score(&low);
    let high_score = complexity::score(&high);
    assert!(low_score > 25 && low_score <= 40);
    assert!(high_score > 40);

    let analysis = Analyzer::new(root, AnalyzerConfig::default())
        .unwrap()
        .run()
        .unwrap();

    let ranked: Vec<(&str, u8)> = analysis
        .context
        .key_components
        .iter()
        .map(|c| (c.path.as_str(), c.complexity))
        .collect();
    assert_eq!(ranked, vec![("z_high.py", high_score), ("a_low.py", low_score)]);
    assert_eq!(analysis.context.key_components[0].name, "z_high");
    assert_eq!(analysis.context.critical_files, vec!["z_high.py"]);
}

#[test]
fn test_discovered_config_extends_rules() {
    setup();
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(
        root,
        "codebase-analyzer.yaml",
        r#"
ignore_names:
  - vendor
extra_patterns:
  endpoint:
    - 'router\.post\(["'']([^"'']+)["'']'
extra_frameworks:
  Koa:
    - 'new Koa\('
thresholds:
  key_component: 0
"#,
    );
    write(root, "vendor/lib.js", "router.post('/hidden', h);\n");
    write(
        root,
        "routes.js",
        "const app = new Koa();\nfunction login() {}\nrouter.post('/login', login);\n",
    );

    let analysis = codebase_analyzer::analyze(root, None).unwrap();

    let paths: Vec<&str> = analysis.records.iter().map(|r| r.path.as_str()).collect();
    assert_eq!(paths, vec!["routes.js"]);
    assert_eq!(
        tag_values(&analysis.records[0], TagCategory::Endpoint),
        vec!["/login"]
    );
    assert!(analysis.summary.detected_frameworks.contains("Koa"));
    assert_eq!(analysis.context.key_components.len(), 1);
}

#[test]
fn test_empty_repository() {
    setup();
    let temp = TempDir::new().unwrap();

    let analysis = Analyzer::new(temp.path(), AnalyzerConfig::default())
        .unwrap()
        .run_at(fixed_timestamp())
        .unwrap();

    assert!(analysis.records.is_empty());
    assert_eq!(analysis.summary.file_count, 0);
    assert_eq!(analysis.summary.total_lines, 0);
    assert!(analysis.summary.language_histogram.is_empty());
    assert!(analysis.context.key_components.is_empty());
    assert!(analysis.context.endpoints.is_empty());
}

#[test]
fn test_missing_root_fails_before_scanning() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does-not-exist");

    let err = codebase_analyzer::analyze(&missing, None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<AnalyzeError>(),
        Some(AnalyzeError::MissingRoot(_))
    ));
}
