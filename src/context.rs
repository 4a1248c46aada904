//! Resumable context: a derived, read-only view over the file records and
//! the project summary.
//!
//! Everything here is a pure function of its inputs. Two runs over an
//! unchanged tree produce identical contexts apart from
//! `analysis_timestamp`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use crate::config::Thresholds;
use crate::detect::{PatternTag, TagCategory};
use crate::language::Language;
use crate::project::ProjectSummary;
use crate::record::FileRecord;
use crate::report;

pub const MAX_KEY_COMPONENTS: usize = 15;
pub const MAX_CRITICAL_FILES: usize = 10;
pub const MAX_ENDPOINTS: usize = 20;
pub const MAX_MODELS: usize = 15;
pub const MAX_UI_COMPONENTS: usize = 20;
pub const MAX_STACK_DEPENDENCIES: usize = 20;

/// Path substrings (lowercase) and the architecture label each implies.
const ARCHITECTURE_HINTS: &[(&str, &str)] = &[
    ("models", "Model-View Architecture"),
    ("controller", "MVC Pattern"),
    ("service", "Service Layer Pattern"),
    ("component", "Component-Based Architecture"),
];

/// Dependency name fragments that suggest a network or external service.
const SERVICE_HINTS: &[&str] = &["api", "http", "request", "axios", "fetch"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalStack {
    pub languages: BTreeMap<String, usize>,
    pub frameworks: BTreeSet<String>,
    /// First entries of the dependency manifest.
    pub dependencies: BTreeMap<String, String>,
}

/// Abbreviated view of one high-complexity file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDigest {
    /// File stem.
    pub name: String,
    pub path: String,
    pub language: Language,
    pub complexity: u8,
    pub lines: usize,
    pub classes: Vec<String>,
    pub functions: Vec<String>,
    pub key_patterns: Vec<PatternTag>,
}

/// A tagged value together with the file it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcedTag {
    pub value: String,
    pub source_path: String,
    pub language: Language,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressMarkers {
    pub structure_analyzed: bool,
    pub dependencies_extracted: bool,
    pub patterns_identified: bool,
    pub components_mapped: bool,
}

impl ProgressMarkers {
    /// All stages done.
    pub fn complete() -> Self {
        Self {
            structure_analyzed: true,
            dependencies_extracted: true,
            patterns_identified: true,
            components_mapped: true,
        }
    }
}

/// Primary machine-readable artifact of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumableContext {
    /// Rendered Markdown overview.
    pub project_overview: String,
    pub technical_stack: TechnicalStack,
    pub architecture_patterns: Vec<String>,
    pub key_components: Vec<ComponentDigest>,
    pub endpoints: Vec<SourcedTag>,
    pub models: Vec<SourcedTag>,
    pub ui_components: Vec<SourcedTag>,
    pub external_services: Vec<String>,
    pub critical_files: Vec<String>,
    pub entry_points: Vec<String>,
    pub analysis_timestamp: DateTime<Utc>,
    pub progress_markers: ProgressMarkers,
}

/// Build the context from the records and summary of one run.
pub fn synthesize(
    records: &[FileRecord],
    summary: &ProjectSummary,
    thresholds: &Thresholds,
    timestamp: DateTime<Utc>,
) -> ResumableContext {
    let key_components = ranked_above(records, thresholds.key_component)
        .take(MAX_KEY_COMPONENTS)
        .map(digest)
        .collect();

    let critical_files = ranked_above(records, thresholds.critical)
        .take(MAX_CRITICAL_FILES)
        .map(|r| r.path.clone())
        .collect();

    let technical_stack = TechnicalStack {
        languages: summary.language_histogram.clone(),
        frameworks: summary.detected_frameworks.clone(),
        dependencies: summary
            .dependency_manifest
            .iter()
            .take(MAX_STACK_DEPENDENCIES)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect(),
    };

    ResumableContext {
        project_overview: report::render_overview(records, summary, thresholds.overview),
        technical_stack,
        architecture_patterns: architecture_patterns(records),
        key_components,
        endpoints: sourced_tags(records, TagCategory::Endpoint, MAX_ENDPOINTS),
        models: sourced_tags(records, TagCategory::PersistenceModel, MAX_MODELS),
        ui_components: sourced_tags(records, TagCategory::UiComponent, MAX_UI_COMPONENTS),
        external_services: external_services(&summary.dependency_manifest),
        critical_files,
        entry_points: summary.entry_points.clone(),
        analysis_timestamp: timestamp,
        progress_markers: ProgressMarkers::complete(),
    }
}

/// Records scoring strictly above `threshold`, highest score first.
/// Ties keep record order.
pub fn ranked_above(records: &[FileRecord], threshold: u8) -> impl Iterator<Item = &FileRecord> {
    let mut ranked: Vec<&FileRecord> = records
        .iter()
        .filter(|r| r.complexity_score > threshold)
        .collect();
    ranked.sort_by(|a, b| b.complexity_score.cmp(&a.complexity_score));
    ranked.into_iter()
}

fn digest(record: &FileRecord) -> ComponentDigest {
    let name = Path::new(&record.path)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| record.path.clone());

    ComponentDigest {
        name,
        path: record.path.clone(),
        language: record.declared_language,
        complexity: record.complexity_score,
        lines: record.line_count,
        classes: record.type_declarations.iter().take(5).cloned().collect(),
        functions: record.callable_declarations.iter().take(10).cloned().collect(),
        key_patterns: record.pattern_tags.iter().take(5).cloned().collect(),
    }
}

/// Labels enabled by path substrings, in fixed order.
pub fn architecture_patterns(records: &[FileRecord]) -> Vec<String> {
    let paths: Vec<String> = records.iter().map(|r| r.path.to_lowercase()).collect();

    ARCHITECTURE_HINTS
        .iter()
        .filter(|(hint, _)| paths.iter().any(|p| p.contains(hint)))
        .map(|(_, label)| label.to_string())
        .collect()
}

fn sourced_tags(records: &[FileRecord], category: TagCategory, limit: usize) -> Vec<SourcedTag> {
    records
        .iter()
        .flat_map(|record| {
            record
                .pattern_tags
                .iter()
                .filter(move |tag| tag.category == category)
                .map(move |tag| SourcedTag {
                    value: tag.value.clone(),
                    source_path: record.path.clone(),
                    language: record.declared_language,
                })
        })
        .take(limit)
        .collect()
}

/// Dependency keys whose bare name suggests a network service.
pub fn external_services(dependencies: &BTreeMap<String, String>) -> Vec<String> {
    dependencies
        .keys()
        .filter(|key| {
            let name = key
                .split_once(':')
                .map_or(key.as_str(), |(_, n)| n)
                .to_lowercase();
            SERVICE_HINTS.iter().any(|hint| name.contains(hint))
        })
        .cloned()
        .collect()
}
