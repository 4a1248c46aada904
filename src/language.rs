//! Extension-based language classification.

use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Declared language of a file, derived from its extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
    React,
    Vue,
    Svelte,
    Java,
    Cpp,
    C,
    CSharp,
    Go,
    Rust,
    Php,
    Ruby,
    Swift,
    Kotlin,
    Html,
    Css,
    Scss,
    Sql,
    /// Fallback for extensions missing from the table.
    Text,
}

/// Lowercase extension (without dot) to language.
static EXTENSIONS: phf::Map<&'static str, Language> = phf_map! {
    "py" => Language::Python,
    "js" => Language::JavaScript,
    "mjs" => Language::JavaScript,
    "cjs" => Language::JavaScript,
    "ts" => Language::TypeScript,
    "mts" => Language::TypeScript,
    "cts" => Language::TypeScript,
    "jsx" => Language::React,
    "tsx" => Language::React,
    "vue" => Language::Vue,
    "svelte" => Language::Svelte,
    "java" => Language::Java,
    "cpp" => Language::Cpp,
    "c" => Language::C,
    "cs" => Language::CSharp,
    "go" => Language::Go,
    "rs" => Language::Rust,
    "php" => Language::Php,
    "rb" => Language::Ruby,
    "swift" => Language::Swift,
    "kt" => Language::Kotlin,
    "html" => Language::Html,
    "css" => Language::Css,
    "scss" => Language::Scss,
    "sql" => Language::Sql,
};

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::React => "react",
            Language::Vue => "vue",
            Language::Svelte => "svelte",
            Language::Java => "java",
            Language::Cpp => "cpp",
            Language::C => "c",
            Language::CSharp => "csharp",
            Language::Go => "go",
            Language::Rust => "rust",
            Language::Php => "php",
            Language::Ruby => "ruby",
            Language::Swift => "swift",
            Language::Kotlin => "kotlin",
            Language::Html => "html",
            Language::Css => "css",
            Language::Scss => "scss",
            Language::Sql => "sql",
            Language::Text => "text",
        }
    }

    /// Languages where UI component detection is attempted.
    pub fn is_script_family(&self) -> bool {
        matches!(
            self,
            Language::JavaScript | Language::TypeScript | Language::React
        )
    }

    /// Whether the language has a table entry (anything but `Text`).
    pub fn is_known(&self) -> bool {
        *self != Language::Text
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify an extension (with or without the leading dot, any case).
pub fn classify_extension(ext: &str) -> Language {
    let ext = ext.trim_start_matches('.').to_ascii_lowercase();
    EXTENSIONS.get(ext.as_str()).copied().unwrap_or(Language::Text)
}

/// Classify a path by its extension.
pub fn classify(path: &Path) -> Language {
    path.extension()
        .and_then(|e| e.to_str())
        .map(classify_extension)
        .unwrap_or(Language::Text)
}

/// Lowercased extension of a path without the dot, or empty.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default()
}
