//! Python analyzer using tree-sitter.

use std::path::Path;

use tree_sitter::{Language, Node, Parser};

use crate::analysis::traits::in_source_order;
use crate::analysis::{ExtractionStatus, FileFacts, LanguageAnalyzer, ParsedFile};

/// Class and function definitions, at any nesting depth.
///
/// `async def` parses as a `function_definition` too.
const DECLARATION_QUERY: &str = r#"
(class_definition
  name: (identifier) @class_name
)

(function_definition
  name: (identifier) @func_name
)
"#;

/// Tree-sitter query for extracting imports.
const IMPORT_QUERY: &str = r#"
(import_statement) @import
(import_from_statement) @import_from
(future_import_statement) @future_import
"#;

pub struct PythonAnalyzer {
    language: Language,
}

impl PythonAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_python::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }

    fn extract_declarations(
        &self,
        parsed: &ParsedFile,
    ) -> anyhow::Result<(Vec<String>, Vec<String>)> {
        let mut types = Vec::new();
        let mut callables = Vec::new();

        parsed.for_each_capture(&self.language, DECLARATION_QUERY, |capture, node| {
            let entry = (node.start_byte(), parsed.node_text(node).to_string());
            match capture {
                "class_name" => types.push(entry),
                "func_name" => callables.push(entry),
                _ => {}
            }
        })?;

        Ok((in_source_order(types), in_source_order(callables)))
    }

    fn extract_imports(&self, parsed: &ParsedFile) -> anyhow::Result<Vec<String>> {
        let mut imports = Vec::new();

        parsed.for_each_capture(&self.language, IMPORT_QUERY, |capture, node| match capture {
            "import" => {
                let mut cursor = node.walk();
                for name in node.children_by_field_name("name", &mut cursor) {
                    let module = imported_name(parsed, name);
                    if !module.is_empty() {
                        imports.push((name.start_byte(), module.to_string()));
                    }
                }
            }
            "import_from" => {
                if let Some(entry) = from_import(parsed, node) {
                    imports.push((node.start_byte(), entry));
                }
            }
            "future_import" => {
                if let Some(first) = first_imported_name(parsed, node) {
                    imports.push((node.start_byte(), format!("__future__.{}", first)));
                }
            }
            _ => {}
        })?;

        Ok(in_source_order(imports))
    }
}

/// Module of a `dotted_name` or `aliased_import` node, without the alias.
fn imported_name<'a>(parsed: &'a ParsedFile, node: Node) -> &'a str {
    match node.kind() {
        "aliased_import" => node
            .child_by_field_name("name")
            .map(|n| parsed.node_text(n))
            .unwrap_or(""),
        _ => parsed.node_text(node),
    }
}

/// First name listed after `import`, or `*` for wildcard imports.
fn first_imported_name(parsed: &ParsedFile, node: Node) -> Option<String> {
    let mut cursor = node.walk();
    if let Some(name) = node.children_by_field_name("name", &mut cursor).next() {
        return Some(imported_name(parsed, name).to_string());
    }

    let mut cursor = node.walk();
    let has_wildcard = node
        .children(&mut cursor)
        .any(|c| c.kind() == "wildcard_import");
    has_wildcard.then(|| "*".to_string())
}

/// `from pkg.mod import a, b` becomes `pkg.mod.a`.
///
/// Relative prefixes are dropped; `from . import x` has no module and
/// yields nothing.
fn from_import(parsed: &ParsedFile, node: Node) -> Option<String> {
    let module_node = node.child_by_field_name("module_name")?;
    let module = parsed.node_text(module_node).trim_start_matches('.');
    if module.is_empty() {
        return None;
    }

    let first = first_imported_name(parsed, node).unwrap_or_default();
    Some(format!("{}.{}", module, first))
}

impl Default for PythonAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for PythonAnalyzer {
    fn language_id(&self) -> &'static str {
        "python"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser
            .parse(source, None)
            .ok_or_else(|| anyhow::anyhow!("failed to parse Python source: {}", path.display()))?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    fn extract_facts(&self, parsed: &ParsedFile) -> anyhow::Result<FileFacts> {
        let (types, callables) = self.extract_declarations(parsed)?;
        let imports = self.extract_imports(parsed)?;

        Ok(FileFacts {
            imports,
            types,
            callables,
            ..FileFacts::empty(ExtractionStatus::Parsed)
        })
    }
}
