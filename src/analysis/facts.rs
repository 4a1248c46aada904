//! Structural facts extracted from a single file.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on every extracted list.
pub const MAX_FACTS: usize = 20;

/// How the structural facts of a file were obtained.
///
/// Lets consumers tell a file that genuinely declares nothing apart from
/// one whose extraction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Facts come from a complete syntax tree.
    Parsed,
    /// Facts come from regex heuristics.
    Heuristic,
    /// The syntax tree could not be built; facts are empty.
    ParseFailed,
    /// No extractor applies to this file.
    Unsupported,
}

impl ExtractionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionStatus::Parsed => "parsed",
            ExtractionStatus::Heuristic => "heuristic",
            ExtractionStatus::ParseFailed => "parse_failed",
            ExtractionStatus::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Imports, declarations and exports of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFacts {
    /// Import/dependency references in source order.
    pub imports: Vec<String>,
    /// Class, interface, type alias and enum names.
    pub types: Vec<String>,
    /// Function and method names (sync and async alike).
    pub callables: Vec<String>,
    /// Exported names (ECMAScript-style modules only).
    pub exports: Vec<String>,
    pub status: ExtractionStatus,
    /// Parse error message (if any).
    pub parse_error: Option<String>,
}

impl FileFacts {
    /// Create empty facts with the given status.
    pub fn empty(status: ExtractionStatus) -> Self {
        Self {
            imports: Vec::new(),
            types: Vec::new(),
            callables: Vec::new(),
            exports: Vec::new(),
            status,
            parse_error: None,
        }
    }

    /// Empty facts for a file whose parse failed.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            parse_error: Some(error.into()),
            ..Self::empty(ExtractionStatus::ParseFailed)
        }
    }

    /// Keep the first `MAX_FACTS` entries of every list.
    pub fn truncated(mut self) -> Self {
        self.imports.truncate(MAX_FACTS);
        self.types.truncate(MAX_FACTS);
        self.callables.truncate(MAX_FACTS);
        self.exports.truncate(MAX_FACTS);
        self
    }

    /// True when nothing was found.
    pub fn is_empty(&self) -> bool {
        self.imports.is_empty()
            && self.types.is_empty()
            && self.callables.is_empty()
            && self.exports.is_empty()
    }
}
