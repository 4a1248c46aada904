//! Tree-sitter analyzers for the first-class languages.

mod javascript;
mod python;
mod typescript;

pub use javascript::JavaScriptAnalyzer;
pub use python::PythonAnalyzer;
pub use typescript::TypeScriptAnalyzer;

use super::LanguageAnalyzer;
use once_cell::sync::OnceCell;
use std::sync::atomic::{AtomicBool, Ordering};

/// Static storage for JavaScript analyzer.
static JAVASCRIPT_ANALYZER: OnceCell<JavaScriptAnalyzer> = OnceCell::new();

/// Static storage for Python analyzer.
static PYTHON_ANALYZER: OnceCell<PythonAnalyzer> = OnceCell::new();

/// Static storage for TypeScript analyzer.
static TYPESCRIPT_ANALYZER: OnceCell<TypeScriptAnalyzer> = OnceCell::new();

/// Static storage for the TSX analyzer.
static TSX_ANALYZER: OnceCell<TypeScriptAnalyzer> = OnceCell::new();

/// Whether analyzers have been registered.
static REGISTERED: AtomicBool = AtomicBool::new(false);

/// Register all available language analyzers.
///
/// Idempotent; `get_analyzer` calls it on demand.
pub fn register_analyzers() {
    if REGISTERED.swap(true, Ordering::SeqCst) {
        return;
    }

    JAVASCRIPT_ANALYZER.get_or_init(JavaScriptAnalyzer::new);
    PYTHON_ANALYZER.get_or_init(PythonAnalyzer::new);
    TYPESCRIPT_ANALYZER.get_or_init(TypeScriptAnalyzer::new);
    TSX_ANALYZER.get_or_init(TypeScriptAnalyzer::tsx);
}

/// Get an analyzer for the given lowercase file extension (without dot).
///
/// Returns None for languages handled by the regex heuristics.
pub fn get_analyzer(ext: &str) -> Option<&'static dyn LanguageAnalyzer> {
    register_analyzers();

    match ext {
        "js" | "jsx" | "mjs" | "cjs" => JAVASCRIPT_ANALYZER
            .get()
            .map(|a| a as &'static dyn LanguageAnalyzer),
        "py" => PYTHON_ANALYZER.get().map(|a| a as &'static dyn LanguageAnalyzer),
        "ts" | "mts" | "cts" => TYPESCRIPT_ANALYZER
            .get()
            .map(|a| a as &'static dyn LanguageAnalyzer),
        "tsx" => TSX_ANALYZER.get().map(|a| a as &'static dyn LanguageAnalyzer),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_extension() {
        assert_eq!(get_analyzer("py").unwrap().language_id(), "python");
        assert_eq!(get_analyzer("jsx").unwrap().language_id(), "javascript");
        assert_eq!(get_analyzer("ts").unwrap().language_id(), "typescript");
        assert_eq!(get_analyzer("tsx").unwrap().language_id(), "tsx");
        assert!(get_analyzer("go").is_none());
        assert!(get_analyzer("").is_none());
    }

    #[test]
    fn test_analyzers_claim_their_extensions() {
        for ext in ["py", "js", "jsx", "mjs", "cjs", "ts", "mts", "cts", "tsx"] {
            let analyzer = get_analyzer(ext).unwrap();
            assert!(analyzer.handles_extension(ext), "{} not claimed", ext);
        }
    }
}
