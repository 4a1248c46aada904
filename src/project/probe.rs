//! Filesystem probes for entry points, config files and documentation.

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use std::path::Path;

use crate::filter::PathFilter;

/// Entry-point candidates, relative to the repository root.
pub const ENTRY_POINT_CANDIDATES: &[&str] = &[
    "main.py",
    "app.py",
    "manage.py",
    "index.js",
    "server.js",
    "main.js",
    "index.ts",
    "main.ts",
    "App.js",
    "App.tsx",
    "index.html",
    "main.go",
    "src/main.rs",
    "src/index.js",
    "src/index.ts",
    "src/main.ts",
];

/// Base-name globs of build manifests and configuration files.
pub const CONFIG_PATTERNS: &[&str] = &[
    "package.json",
    "requirements.txt",
    "Pipfile",
    "pom.xml",
    "build.gradle",
    "Cargo.toml",
    "composer.json",
    "setup.py",
    "go.mod",
    "pyproject.toml",
    "config.*",
    "settings.*",
    "*.config.*",
    "docker*",
    "webpack.config.*",
    "vite.config.*",
    "next.config.*",
];

/// Maximum number of documentation files reported.
pub const MAX_DOCS: usize = 10;

/// Candidates that exist as regular files and pass the filter, in
/// candidate order.
pub fn entry_points(root: &Path, filter: &PathFilter) -> Vec<String> {
    ENTRY_POINT_CANDIDATES
        .iter()
        .filter(|candidate| !filter.should_skip(Path::new(candidate)))
        .filter(|candidate| root.join(candidate).is_file())
        .map(|candidate| candidate.to_string())
        .collect()
}

/// Case-insensitive matcher over `CONFIG_PATTERNS`.
pub fn config_matcher() -> anyhow::Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in CONFIG_PATTERNS {
        builder.add(GlobBuilder::new(pattern).case_insensitive(true).build()?);
    }
    Ok(builder.build()?)
}

fn base_name(rel_path: &str) -> &str {
    rel_path.rsplit('/').next().unwrap_or(rel_path)
}

/// Walked files whose base name looks like a manifest or config file.
pub fn config_paths(walked: &[String], matcher: &GlobSet) -> Vec<String> {
    walked
        .iter()
        .filter(|p| matcher.is_match(base_name(p)))
        .cloned()
        .collect()
}

/// First `MAX_DOCS` Markdown files in traversal order.
pub fn doc_paths(walked: &[String]) -> Vec<String> {
    walked
        .iter()
        .filter(|p| {
            Path::new(base_name(p))
                .extension()
                .map(|e| e.eq_ignore_ascii_case("md"))
                .unwrap_or(false)
        })
        .take(MAX_DOCS)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_entry_points_exist_and_pass_filter() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("app.py"), "").unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/main.rs"), "").unwrap();
        // a directory named like a candidate is not an entry point
        fs::create_dir(temp.path().join("main.go")).unwrap();

        let found = entry_points(temp.path(), &PathFilter::new());
        assert_eq!(found, vec!["app.py", "src/main.rs"]);
    }

    #[test]
    fn test_config_paths() {
        let walked = paths(&[
            "README.md",
            "package.json",
            "src/app.ts",
            "web/vite.config.ts",
            "Dockerfile",
            "docker-compose.yml",
            "api/settings.py",
            "CARGO.TOML",
        ]);
        let matcher = config_matcher().unwrap();
        assert_eq!(
            config_paths(&walked, &matcher),
            vec![
                "package.json",
                "web/vite.config.ts",
                "Dockerfile",
                "docker-compose.yml",
                "api/settings.py",
                "CARGO.TOML",
            ]
        );
    }

    #[test]
    fn test_doc_paths_are_bounded() {
        let walked: Vec<String> = (0..15).map(|i| format!("docs/page{}.md", i)).collect();
        let docs = doc_paths(&walked);
        assert_eq!(docs.len(), MAX_DOCS);
        assert_eq!(docs[0], "docs/page0.md");
    }

    #[test]
    fn test_doc_paths_ignore_other_files() {
        let walked = paths(&["src/md.py", "NOTES.MD", "guide.markdown"]);
        assert_eq!(doc_paths(&walked), vec!["NOTES.MD"]);
    }
}
