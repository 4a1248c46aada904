//! Project-wide aggregation of file records and filesystem probes.

mod manifest;
mod probe;

pub use manifest::{collect_dependencies, load_manifest, Ecosystem, ManifestError};
pub use probe::{
    config_matcher, config_paths, doc_paths, entry_points, CONFIG_PATTERNS,
    ENTRY_POINT_CANDIDATES, MAX_DOCS,
};

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::filter::PathFilter;
use crate::record::FileRecord;

/// One summary per run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    /// Name of the repository root directory.
    pub name: String,
    pub root_path: String,
    pub file_count: usize,
    pub total_lines: usize,
    /// Language tag → number of records.
    pub language_histogram: BTreeMap<String, usize>,
    pub detected_frameworks: BTreeSet<String>,
    /// `ecosystem:name` → version or requirement spec.
    pub dependency_manifest: BTreeMap<String, String>,
    pub entry_points: Vec<String>,
    pub config_paths: Vec<String>,
    pub doc_paths: Vec<String>,
}

/// Inputs to the project fold besides the records themselves.
pub struct ProbeInput<'a> {
    pub root: &'a Path,
    pub filter: &'a PathFilter,
    /// Every walked file that passed the filter, repo-relative, in
    /// traversal order.
    pub walked: &'a [String],
}

/// Fold records, per-file framework hits and probes into the summary.
pub fn aggregate<I>(
    records: &[FileRecord],
    frameworks: I,
    probe: &ProbeInput<'_>,
) -> anyhow::Result<ProjectSummary>
where
    I: IntoIterator<Item = String>,
{
    let mut language_histogram = BTreeMap::new();
    let mut total_lines = 0;
    for record in records {
        *language_histogram
            .entry(record.declared_language.as_str().to_string())
            .or_insert(0) += 1;
        total_lines += record.line_count;
    }

    let detected_frameworks: BTreeSet<String> = frameworks.into_iter().collect();
    let matcher = config_matcher()?;

    let summary = ProjectSummary {
        name: root_name(probe.root),
        root_path: probe.root.display().to_string(),
        file_count: records.len(),
        total_lines,
        language_histogram,
        detected_frameworks,
        dependency_manifest: collect_dependencies(probe.root),
        entry_points: entry_points(probe.root, probe.filter),
        config_paths: config_paths(probe.walked, &matcher),
        doc_paths: doc_paths(probe.walked),
    };

    tracing::info!(
        files = summary.file_count,
        lines = summary.total_lines,
        frameworks = summary.detected_frameworks.len(),
        dependencies = summary.dependency_manifest.len(),
        "aggregated project summary"
    );

    Ok(summary)
}

fn root_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| root.display().to_string())
}
