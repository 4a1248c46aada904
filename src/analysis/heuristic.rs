//! Regex extraction for languages without a syntax tree.
//!
//! Each idiom runs over the whole text and contributes all of its matches,
//! idiom after idiom. The same name can therefore appear twice when two
//! idioms both recognize it.

use lazy_static::lazy_static;
use regex::Regex;

use super::{ExtractionStatus, FileFacts};

lazy_static! {
    static ref IMPORT_PATTERNS: Vec<Regex> = vec![
        // import X from 'Y'
        Regex::new(r#"import\s+.*?\s+from\s+["']([^"']+)["']"#).unwrap(),
        // import 'Y'
        Regex::new(r#"import\s+["']([^"']+)["']"#).unwrap(),
        // require('Y')
        Regex::new(r#"require\(["']([^"']+)["']\)"#).unwrap(),
    ];

    /// Named declaration exports.
    static ref EXPORT_DECLARATION: Regex =
        Regex::new(r"export\s+(?:default\s+)?(?:class|function|const|let|var)\s+(\w+)").unwrap();

    /// `export { a, b as c }`
    static ref EXPORT_LIST: Regex = Regex::new(r"export\s*\{\s*([^}]+)\s*\}").unwrap();

    static ref MODULE_EXPORTS: Regex = Regex::new(r"module\.exports\s*=\s*(\w+)").unwrap();

    static ref CALLABLE_PATTERNS: Vec<Regex> = vec![
        Regex::new(r"function\s+(\w+)\s*\(").unwrap(),
        Regex::new(r"const\s+(\w+)\s*=\s*(?:async\s+)?\([^)]*\)\s*=>").unwrap(),
        Regex::new(r"(\w+)\s*:\s*(?:async\s+)?function").unwrap(),
        Regex::new(r"async\s+function\s+(\w+)").unwrap(),
    ];

    static ref TYPE_PATTERN: Regex = Regex::new(r"class\s+(\w+)").unwrap();
}

/// First capture group of every match, in match order.
fn first_groups<'a>(re: &'a Regex, content: &'a str) -> impl Iterator<Item = String> + 'a {
    re.captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Extract facts from raw text using the regex battery.
pub fn extract_heuristic(content: &str) -> FileFacts {
    let imports = IMPORT_PATTERNS
        .iter()
        .flat_map(|re| first_groups(re, content))
        .collect();

    let mut exports: Vec<String> = first_groups(&EXPORT_DECLARATION, content).collect();
    for list in first_groups(&EXPORT_LIST, content) {
        exports.extend(
            list.split(',')
                .filter_map(|item| item.split(" as ").next())
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from),
        );
    }
    exports.extend(first_groups(&MODULE_EXPORTS, content));

    let callables = CALLABLE_PATTERNS
        .iter()
        .flat_map(|re| first_groups(re, content))
        .collect();

    let types = first_groups(&TYPE_PATTERN, content).collect();

    FileFacts {
        imports,
        types,
        callables,
        exports,
        ..FileFacts::empty(ExtractionStatus::Heuristic)
    }
}
