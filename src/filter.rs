//! Path filtering for repository traversal.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::path::{Component, Path};

use crate::config::AnalyzerConfig;

/// Directory and file names that never participate in analysis.
pub const DEFAULT_IGNORE_NAMES: &[&str] = &[
    "node_modules",
    ".git",
    "__pycache__",
    ".venv",
    "venv",
    "dist",
    "build",
    ".next",
    ".nuxt",
    "target",
    "bin",
    "obj",
    ".DS_Store",
];

/// File name globs that never participate in analysis.
pub const DEFAULT_IGNORE_GLOBS: &[&str] = &["*.pyc", "*.class", "*.o"];

/// Decides whether a repo-relative path is skipped.
#[derive(Debug, Clone)]
pub struct PathFilter {
    names: HashSet<String>,
    file_globs: GlobSet,
    excluded: GlobSet,
}

impl PathFilter {
    /// Filter with only the built-in rules.
    pub fn new() -> Self {
        Self::build(&[], &[]).unwrap_or_else(|_| unreachable!("built-in globs are valid"))
    }

    /// Filter with the built-in rules plus the config's additions.
    pub fn from_config(config: &AnalyzerConfig) -> anyhow::Result<Self> {
        Self::build(&config.ignore_names, &config.excluded_paths)
    }

    fn build(extra_names: &[String], excluded_paths: &[String]) -> anyhow::Result<Self> {
        let names = DEFAULT_IGNORE_NAMES
            .iter()
            .map(|s| s.to_string())
            .chain(extra_names.iter().cloned())
            .collect();

        let mut file_globs = GlobSetBuilder::new();
        for pattern in DEFAULT_IGNORE_GLOBS {
            file_globs.add(Glob::new(pattern)?);
        }

        let mut excluded = GlobSetBuilder::new();
        for pattern in excluded_paths {
            excluded.add(Glob::new(pattern)?);
        }

        Ok(Self {
            names,
            file_globs: file_globs.build()?,
            excluded: excluded.build()?,
        })
    }

    /// Returns true when the entry at `rel_path` (relative to the repository
    /// root) must be skipped. The root itself is never skipped.
    pub fn should_skip(&self, rel_path: &Path) -> bool {
        let base = match rel_path.file_name().and_then(|n| n.to_str()) {
            Some(b) => b,
            None => return false,
        };

        if base.starts_with('.') {
            return true;
        }

        if self.file_globs.is_match(base) {
            return true;
        }

        let ignored_component = rel_path.components().any(|c| match c {
            Component::Normal(part) => part
                .to_str()
                .map(|p| self.names.contains(p))
                .unwrap_or(false),
            _ => false,
        });
        if ignored_component {
            return true;
        }

        !self.excluded.is_empty() && self.excluded.is_match(rel_path)
    }
}

impl Default for PathFilter {
    fn default() -> Self {
        Self::new()
    }
}
