//! Pipeline orchestration: walk, per-file fan-out, then the global fold.

use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::AnalyzerConfig;
use crate::context::{self, ResumableContext};
use crate::detect::{build_registry, FrameworkCatalog, PatternRegistry};
use crate::filter::PathFilter;
use crate::project::{self, ProbeInput, ProjectSummary};
use crate::record::{relative_path, BuiltRecord, FileRecord, RecordBuilder};

/// Precondition failures that abort a run before any scanning.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("repository path '{0}' does not exist")]
    MissingRoot(PathBuf),
    #[error("repository path '{0}' is not a directory")]
    NotADirectory(PathBuf),
}

/// Everything one run produces.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub records: Vec<FileRecord>,
    pub summary: ProjectSummary,
    pub context: ResumableContext,
}

/// Runs the analysis pipeline over one repository.
pub struct Analyzer {
    root: PathBuf,
    config: AnalyzerConfig,
    filter: PathFilter,
    registry: PatternRegistry,
    frameworks: FrameworkCatalog,
}

impl Analyzer {
    /// Check the root and compile the configured rules.
    pub fn new(root: &Path, config: AnalyzerConfig) -> anyhow::Result<Self> {
        if !root.exists() {
            return Err(AnalyzeError::MissingRoot(root.to_path_buf()).into());
        }
        if !root.is_dir() {
            return Err(AnalyzeError::NotADirectory(root.to_path_buf()).into());
        }
        let root = root
            .canonicalize()
            .map_err(|e| anyhow::anyhow!("cannot access {}: {}", root.display(), e))?;

        let filter = PathFilter::from_config(&config)?;
        let registry = build_registry(&config.extra_patterns)?;
        let frameworks = FrameworkCatalog::with_extras(&config.extra_frameworks)?;

        tracing::debug!(
            rules = registry.rule_count(),
            frameworks = frameworks.len(),
            "compiled detection rules"
        );

        Ok(Self {
            root,
            config,
            filter,
            registry,
            frameworks,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Run the pipeline, stamping the context with the current time.
    pub fn run(&self) -> anyhow::Result<Analysis> {
        self.run_at(Utc::now())
    }

    /// Run the pipeline with a fixed timestamp.
    pub fn run_at(&self, timestamp: DateTime<Utc>) -> anyhow::Result<Analysis> {
        tracing::info!(root = %self.root.display(), "analyzing repository");

        let walked = self.walk();
        tracing::info!(files = walked.len(), "walked repository");

        let builder = RecordBuilder {
            filter: &self.filter,
            registry: &self.registry,
            frameworks: &self.frameworks,
            include_text_files: self.config.include_text_files,
        };

        // collect keeps traversal order
        let built: Vec<BuiltRecord> = walked
            .par_iter()
            .filter(|path| builder.accepts(&self.root, path))
            .filter_map(|path| self.analyze_file(&builder, path))
            .collect();

        let mut records = Vec::with_capacity(built.len());
        let mut frameworks = Vec::new();
        for b in built {
            records.push(b.record);
            frameworks.extend(b.frameworks);
        }
        tracing::info!(records = records.len(), "analyzed files");

        let rel_walked: Vec<String> = walked
            .iter()
            .map(|p| relative_path(&self.root, p))
            .collect();
        let probe = ProbeInput {
            root: &self.root,
            filter: &self.filter,
            walked: &rel_walked,
        };
        let summary = project::aggregate(&records, frameworks, &probe)?;
        let context = context::synthesize(&records, &summary, &self.config.thresholds, timestamp);

        Ok(Analysis {
            records,
            summary,
            context,
        })
    }

    /// Files under the root that pass the filter, sorted by name within each
    /// directory. Ignored directories are pruned without descending.
    fn walk(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                let rel = e.path().strip_prefix(&self.root).unwrap_or(e.path());
                e.depth() == 0 || !self.filter.should_skip(rel)
            });

        for entry in walker {
            match entry {
                Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "skipping unreadable entry"),
            }
        }

        files
    }

    /// Read and analyze one file. Read failures are logged and skip the file.
    fn analyze_file(&self, builder: &RecordBuilder<'_>, path: &Path) -> Option<BuiltRecord> {
        let metadata = match fs::metadata(path) {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot stat file");
                return None;
            }
        };
        let content = match fs::read(path) {
            Ok(c) => c,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read file");
                return None;
            }
        };
        builder.build(&self.root, path, &content, &metadata)
    }
}

/// Load config for `root` and run the whole pipeline.
pub fn analyze(root: &Path, config_path: Option<&Path>) -> anyhow::Result<Analysis> {
    if !root.exists() {
        return Err(AnalyzeError::MissingRoot(root.to_path_buf()).into());
    }
    let config = AnalyzerConfig::load(config_path, root)?;
    Analyzer::new(root, config)?.run()
}
