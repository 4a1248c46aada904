//! Core traits for syntax-tree extraction.

use std::path::Path;

use streaming_iterator::StreamingIterator;
use tree_sitter::{Language, Node, Query, QueryCursor};

use super::FileFacts;

/// Holds a parsed tree-sitter tree and associated metadata.
pub struct ParsedFile {
    /// The tree-sitter parse tree.
    pub tree: tree_sitter::Tree,
    /// Source bytes (kept for node text extraction).
    pub source: Vec<u8>,
    /// The file path (for error reporting).
    pub path: String,
}

impl ParsedFile {
    /// Get text for a tree-sitter node.
    pub fn node_text(&self, node: Node) -> &str {
        node.utf8_text(&self.source).unwrap_or("")
    }

    /// Whether the tree contains ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// 1-indexed line of the first ERROR or MISSING node.
    pub fn first_error_line(&self) -> Option<usize> {
        find_error(self.tree.root_node()).map(|n| n.start_position().row + 1)
    }

    /// Run a query over the whole tree and hand the captures of each match
    /// to `f` as `(capture name, node)` pairs.
    pub fn for_each_match<'t, F>(
        &'t self,
        language: &Language,
        query_source: &str,
        mut f: F,
    ) -> anyhow::Result<()>
    where
        F: FnMut(&[(&str, Node<'t>)]),
    {
        let query = Query::new(language, query_source)?;
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&query, self.tree.root_node(), &self.source[..]);

        let mut captures = Vec::new();
        while let Some(m) = matches.next() {
            captures.clear();
            for capture in m.captures {
                let capture_name = query.capture_names()[capture.index as usize];
                captures.push((capture_name, capture.node));
            }
            f(&captures);
        }

        Ok(())
    }

    /// Like `for_each_match`, one capture at a time.
    pub fn for_each_capture<'t, F>(
        &'t self,
        language: &Language,
        query_source: &str,
        mut f: F,
    ) -> anyhow::Result<()>
    where
        F: FnMut(&str, Node<'t>),
    {
        self.for_each_match(language, query_source, |captures| {
            for (name, node) in captures {
                f(*name, *node);
            }
        })
    }
}

/// Node captured under `name` in one match.
pub(crate) fn captured<'t>(captures: &[(&str, Node<'t>)], name: &str) -> Option<Node<'t>> {
    captures
        .iter()
        .find(|(capture_name, _)| *capture_name == name)
        .map(|(_, node)| *node)
}

fn find_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let children: Vec<Node> = node.children(&mut cursor).collect();
    children.into_iter().find_map(find_error)
}

/// Language-specific extractor backed by a real syntax tree.
///
/// Note: tree_sitter::Parser is not Sync, so implementations create a
/// parser per call.
pub trait LanguageAnalyzer: Send + Sync {
    /// Returns the language identifier (e.g., "python", "typescript").
    fn language_id(&self) -> &'static str;

    /// Returns file extensions this analyzer handles (without dot).
    fn file_extensions(&self) -> &'static [&'static str];

    /// Parse a source file into a tree-sitter tree.
    ///
    /// Partial parse errors are still returned as a valid tree with ERROR
    /// nodes; callers decide what to do with them.
    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile>;

    /// Extract imports, declarations and exports from a parsed file.
    fn extract_facts(&self, parsed: &ParsedFile) -> anyhow::Result<FileFacts>;

    /// Check if this analyzer handles the given file extension.
    fn handles_extension(&self, ext: &str) -> bool {
        self.file_extensions().contains(&ext)
    }
}

/// Sort `(start_byte, text)` pairs by position and drop the positions.
pub(crate) fn in_source_order(mut items: Vec<(usize, String)>) -> Vec<String> {
    items.sort_by_key(|(pos, _)| *pos);
    items.into_iter().map(|(_, text)| text).collect()
}
