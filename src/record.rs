//! Per-file record assembly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::Metadata;
use std::path::{Component, Path};

use crate::analysis::{self, ExtractionStatus};
use crate::detect::{complexity, FrameworkCatalog, PatternRegistry, PatternTag};
use crate::filter::PathFilter;
use crate::language::{self, Language};

/// Everything known about one analyzed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Repository-relative path with `/` separators.
    pub path: String,
    pub size_bytes: u64,
    pub line_count: usize,
    /// Original extension including the dot, or empty.
    pub file_type: String,
    pub declared_language: Language,
    pub imports: Vec<String>,
    pub type_declarations: Vec<String>,
    pub callable_declarations: Vec<String>,
    pub exports: Vec<String>,
    pub pattern_tags: Vec<PatternTag>,
    pub complexity_score: u8,
    pub extraction: ExtractionStatus,
    pub modified_at: Option<DateTime<Utc>>,
}

/// Shared, read-only state used while building records.
pub struct RecordBuilder<'a> {
    pub filter: &'a PathFilter,
    pub registry: &'a PatternRegistry,
    pub frameworks: &'a FrameworkCatalog,
    /// Also analyze files whose extension is not in the language table.
    pub include_text_files: bool,
}

/// A record plus the frameworks detected in the same content.
#[derive(Debug, Clone)]
pub struct BuiltRecord {
    pub record: FileRecord,
    pub frameworks: Vec<String>,
}

/// `path` relative to `root`, `/`-separated.
pub fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

impl RecordBuilder<'_> {
    /// Whether a file at `path` takes part in analysis at all.
    pub fn accepts(&self, root: &Path, path: &Path) -> bool {
        let rel = path.strip_prefix(root).unwrap_or(path);
        if self.filter.should_skip(rel) {
            return false;
        }
        self.include_text_files || language::classify(path).is_known()
    }

    /// Build the record for one file from a single content read.
    ///
    /// Returns `None` for skipped paths and for anything that is not a
    /// regular file.
    pub fn build(
        &self,
        root: &Path,
        path: &Path,
        content: &[u8],
        metadata: &Metadata,
    ) -> Option<BuiltRecord> {
        if !metadata.is_file() || !self.accepts(root, path) {
            return None;
        }

        let text = String::from_utf8_lossy(content);
        let declared_language = language::classify(path);
        let rel = relative_path(root, path);

        tracing::debug!(path = %rel, language = %declared_language, "analyzing file");

        let facts = analysis::extract(path, declared_language, &text);
        let pattern_tags = self.registry.tag(&text, declared_language);
        let frameworks = self.frameworks.detect(&text);

        let file_type = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();

        let record = FileRecord {
            path: rel,
            size_bytes: metadata.len(),
            line_count: complexity::line_count(&text),
            file_type,
            declared_language,
            imports: facts.imports,
            type_declarations: facts.types,
            callable_declarations: facts.callables,
            exports: facts.exports,
            pattern_tags,
            complexity_score: complexity::score(&text),
            extraction: facts.status,
            modified_at: metadata.modified().ok().map(DateTime::<Utc>::from),
        };

        Some(BuiltRecord { record, frameworks })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtraPatterns;
    use crate::detect::{build_registry, TagCategory};
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        filter: PathFilter,
        registry: PatternRegistry,
        frameworks: FrameworkCatalog,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                filter: PathFilter::new(),
                registry: build_registry(&ExtraPatterns::default()).unwrap(),
                frameworks: FrameworkCatalog::builtin().unwrap(),
            }
        }

        fn builder(&self) -> RecordBuilder<'_> {
            RecordBuilder {
                filter: &self.filter,
                registry: &self.registry,
                frameworks: &self.frameworks,
                include_text_files: false,
            }
        }
    }

    fn build_file(root: &Path, rel: &str, content: &str) -> Option<BuiltRecord> {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        let metadata = fs::metadata(&path).unwrap();

        let fixture = Fixture::new();
        fixture
            .builder()
            .build(root, &path, content.as_bytes(), &metadata)
    }

    #[test]
    fn test_python_record() {
        let temp = TempDir::new().unwrap();
        let content = "from flask import Flask\n\n@app.route(\"/ping\")\ndef ping():\n    return 'ok'\n";
        let built = build_file(temp.path(), "api/app.py", content).unwrap();
        let record = built.record;

        assert_eq!(record.path, "api/app.py");
        assert_eq!(record.file_type, ".py");
        assert_eq!(record.declared_language, Language::Python);
        assert_eq!(record.line_count, 6);
        assert_eq!(record.size_bytes, content.len() as u64);
        assert_eq!(record.imports, vec!["flask.Flask"]);
        assert_eq!(record.callable_declarations, vec!["ping"]);
        assert_eq!(
            record.pattern_tags,
            vec![PatternTag::new(TagCategory::Endpoint, "/ping")]
        );
        assert_eq!(record.extraction, ExtractionStatus::Parsed);
        assert!(record.modified_at.is_some());
        assert_eq!(built.frameworks, vec!["Flask"]);
    }

    #[test]
    fn test_ignored_and_unknown_files_are_skipped() {
        let temp = TempDir::new().unwrap();
        assert!(build_file(temp.path(), "node_modules/lib/index.js", "x").is_none());
        assert!(build_file(temp.path(), ".hidden.py", "x").is_none());
        assert!(build_file(temp.path(), "notes.txt", "hello").is_none());
    }

    #[test]
    fn test_directories_are_not_records() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkg.py");
        fs::create_dir(&dir).unwrap();
        let metadata = fs::metadata(&dir).unwrap();

        let fixture = Fixture::new();
        assert!(fixture
            .builder()
            .build(temp.path(), &dir, b"", &metadata)
            .is_none());
    }

    #[test]
    fn test_invalid_utf8_is_tolerated() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("blob.go");
        let bytes = b"package main\n\xff\xfe\nfunc main() {}\n";
        fs::write(&path, bytes).unwrap();
        let metadata = fs::metadata(&path).unwrap();

        let fixture = Fixture::new();
        let built = fixture
            .builder()
            .build(temp.path(), &path, bytes, &metadata)
            .unwrap();
        assert_eq!(built.record.declared_language, Language::Go);
        assert_eq!(built.record.extraction, ExtractionStatus::Heuristic);
        assert_eq!(built.record.line_count, 4);
    }

    #[test]
    fn test_relative_path_uses_forward_slashes() {
        let root = Path::new("/repo");
        assert_eq!(
            relative_path(root, &root.join("src").join("main.rs")),
            "src/main.rs"
        );
    }
}
