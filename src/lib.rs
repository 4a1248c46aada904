//! Codebase analyzer - resumable repository context for AI-assisted
//! development.
//!
//! Walks a source tree, classifies every file by language, extracts
//! imports and declarations, tags domain patterns (routes, persistence
//! models, UI components), detects frameworks, scores relative complexity
//! and folds everything into a project summary and a resumable context
//! that can be replayed later without re-scanning.
//!
//! # Architecture
//!
//! Per file (parallel):
//!
//! - `filter`: path filter deciding what is skipped
//! - `language`: extension-based language classification
//! - `analysis`: structural extraction (tree-sitter for Python and the
//!   ECMAScript family, regex heuristics for the rest)
//! - `detect`: complexity score, pattern tags, framework signatures
//! - `record`: assembles one `FileRecord`
//!
//! Whole project (single fold):
//!
//! - `project`: summary, manifests and filesystem probes
//! - `context`: the resumable context
//! - `report`: Markdown rendering and JSON artifacts
//!
//! `runner` ties the stages together; `cli` is the command-line surface.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod context;
pub mod detect;
pub mod filter;
pub mod language;
pub mod logging;
pub mod project;
pub mod record;
pub mod report;
pub mod runner;

pub use analysis::{extract, ExtractionStatus, FileFacts};
pub use config::AnalyzerConfig;
pub use context::{ComponentDigest, ResumableContext};
pub use detect::{PatternTag, TagCategory};
pub use filter::PathFilter;
pub use language::Language;
pub use project::ProjectSummary;
pub use record::FileRecord;
pub use runner::{analyze, Analysis, AnalyzeError, Analyzer};

/// Initialize the tree-sitter analyzer registry.
///
/// Optional: analyzers are registered lazily on first use.
#[cfg(feature = "tree-sitter")]
pub fn init() {
    analysis::register_analyzers();
}

/// Initialize the tree-sitter analyzer registry (no-op without the
/// `tree-sitter` feature).
#[cfg(not(feature = "tree-sitter"))]
pub fn init() {}
