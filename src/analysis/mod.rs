//! Structural extraction: imports, declarations and exports per file.
//!
//! Two tiers:
//!
//! - Tier A: Python and the ECMAScript family are parsed with tree-sitter
//!   through the `LanguageAnalyzer` implementations in `languages/`.
//! - Tier B: every other known language goes through the regex battery in
//!   `heuristic`. Tier A languages use it too when the `tree-sitter`
//!   feature is disabled.
//!
//! Every list is truncated to `MAX_FACTS` entries.
//!
//! # Adding a New Language
//!
//! 1. Create a new module in `src/analysis/languages/`
//! 2. Implement `LanguageAnalyzer` trait
//! 3. Define tree-sitter queries for declarations and imports
//! 4. Register the analyzer in `languages/mod.rs`

mod facts;
mod heuristic;
#[cfg(feature = "tree-sitter")]
mod languages;
#[cfg(feature = "tree-sitter")]
mod traits;

use std::path::Path;

#[cfg(feature = "tree-sitter")]
use crate::language::extension_of;
use crate::language::Language;

pub use facts::{ExtractionStatus, FileFacts, MAX_FACTS};
pub use heuristic::extract_heuristic;
#[cfg(feature = "tree-sitter")]
pub use languages::{
    get_analyzer, register_analyzers, JavaScriptAnalyzer, PythonAnalyzer, TypeScriptAnalyzer,
};
#[cfg(feature = "tree-sitter")]
pub use traits::{LanguageAnalyzer, ParsedFile};

/// Extract structural facts for one file.
///
/// Never fails: a parse failure yields empty lists with
/// `ExtractionStatus::ParseFailed` and a warning.
pub fn extract(path: &Path, language: Language, content: &str) -> FileFacts {
    if !language.is_known() {
        return FileFacts::empty(ExtractionStatus::Unsupported);
    }

    #[cfg(feature = "tree-sitter")]
    {
        if let Some(analyzer) = get_analyzer(&extension_of(path)) {
            return extract_tree(analyzer, path, content).truncated();
        }
    }

    extract_heuristic(content).truncated()
}

#[cfg(feature = "tree-sitter")]
fn extract_tree(analyzer: &dyn LanguageAnalyzer, path: &Path, content: &str) -> FileFacts {
    let parsed = match analyzer.parse(path, content.as_bytes()) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "parse failed");
            return FileFacts::failed(e.to_string());
        }
    };

    if parsed.has_errors() {
        let line = parsed.first_error_line().unwrap_or(1);
        let message = format!("syntax error near line {}", line);
        tracing::warn!(path = %path.display(), line, "syntax errors, skipping extraction");
        return FileFacts::failed(message);
    }

    match analyzer.extract_facts(&parsed) {
        Ok(facts) => facts,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "extraction failed");
            FileFacts::failed(e.to_string())
        }
    }
}
