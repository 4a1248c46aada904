//! JavaScript analyzer using tree-sitter.
//!
//! The export and import helpers here are shared with the TypeScript
//! analyzer, whose grammar extends the JavaScript one.

use std::path::Path;

use tree_sitter::{Language, Node, Parser};

use crate::analysis::traits::{captured, in_source_order};
use crate::analysis::{ExtractionStatus, FileFacts, LanguageAnalyzer, ParsedFile};

const DECLARATION_QUERY: &str = r#"
; Class declarations
(class_declaration
  name: (identifier) @type_name
)

; Function declarations (sync and async)
(function_declaration
  name: (identifier) @callable_name
)

; Arrow functions and function expressions bound to a name
(variable_declarator
  name: (identifier) @callable_name
  value: [(arrow_function) (function_expression)]
)

; Class and object methods
(method_definition
  name: (property_identifier) @callable_name
)

; Object properties holding functions
(pair
  key: (property_identifier) @callable_name
  value: [(arrow_function) (function_expression)]
)
"#;

/// Import sources, `require` calls, exports and `module.exports` assignments.
pub(crate) const MODULE_QUERY: &str = r#"
(import_statement
  source: (string) @import_source
)

(call_expression
  function: (identifier) @require_func
  arguments: (arguments (string) @require_source)
)

(export_statement) @export

(assignment_expression
  left: (member_expression) @assign_target
  right: (identifier) @assign_value
)
"#;

pub struct JavaScriptAnalyzer {
    language: Language,
}

impl JavaScriptAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_javascript::LANGUAGE.into(),
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }
}

impl Default for JavaScriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Imports and exports of an ECMAScript module.
pub(crate) struct ModuleFacts {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

pub(crate) fn extract_module_facts(
    parsed: &ParsedFile,
    language: &Language,
) -> anyhow::Result<ModuleFacts> {
    let mut imports = Vec::new();
    let mut exports = Vec::new();

    parsed.for_each_match(language, MODULE_QUERY, |captures| {
        if let Some(source) = captured(captures, "import_source") {
            imports.push((source.start_byte(), string_value(parsed, source)));
        }

        if let (Some(func), Some(source)) = (
            captured(captures, "require_func"),
            captured(captures, "require_source"),
        ) {
            if parsed.node_text(func) == "require" {
                imports.push((source.start_byte(), string_value(parsed, source)));
            }
        }

        if let Some(export) = captured(captures, "export") {
            collect_exports(parsed, export, &mut exports);
        }

        if let (Some(target), Some(value)) = (
            captured(captures, "assign_target"),
            captured(captures, "assign_value"),
        ) {
            if parsed.node_text(target) == "module.exports" {
                exports.push((value.start_byte(), parsed.node_text(value).to_string()));
            }
        }
    })?;

    imports.retain(|(_, s)| !s.is_empty());

    Ok(ModuleFacts {
        imports: in_source_order(imports),
        exports: in_source_order(exports),
    })
}

/// Contents of a string literal node without its quotes.
fn string_value(parsed: &ParsedFile, node: Node) -> String {
    parsed
        .node_text(node)
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .to_string()
}

/// Names exported by one `export` statement.
fn collect_exports(parsed: &ParsedFile, node: Node, out: &mut Vec<(usize, String)>) {
    if let Some(decl) = node.child_by_field_name("declaration") {
        if let Some(name) = decl.child_by_field_name("name") {
            out.push((name.start_byte(), parsed.node_text(name).to_string()));
        } else {
            // const/let/var: one name per declarator
            let mut cursor = decl.walk();
            for child in decl.named_children(&mut cursor) {
                if child.kind() != "variable_declarator" {
                    continue;
                }
                if let Some(name) = child.child_by_field_name("name") {
                    if name.kind() == "identifier" {
                        out.push((name.start_byte(), parsed.node_text(name).to_string()));
                    }
                }
            }
        }
        return;
    }

    if let Some(value) = node.child_by_field_name("value") {
        if value.kind() == "identifier" {
            out.push((value.start_byte(), parsed.node_text(value).to_string()));
        } else if let Some(name) = value.child_by_field_name("name") {
            // export default class Foo / function foo expressions
            out.push((name.start_byte(), parsed.node_text(name).to_string()));
        }
        return;
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if child.kind() != "export_clause" {
            continue;
        }
        let mut spec_cursor = child.walk();
        for spec in child.named_children(&mut spec_cursor) {
            if spec.kind() != "export_specifier" {
                continue;
            }
            if let Some(name) = spec.child_by_field_name("name") {
                out.push((name.start_byte(), string_value(parsed, name)));
            }
        }
    }
}

/// Run a declaration query and split captures into types and callables.
pub(crate) fn extract_declarations(
    parsed: &ParsedFile,
    language: &Language,
    query: &str,
) -> anyhow::Result<(Vec<String>, Vec<String>)> {
    let mut types = Vec::new();
    let mut callables = Vec::new();

    parsed.for_each_capture(language, query, |capture, node| {
        let entry = (node.start_byte(), parsed.node_text(node).to_string());
        match capture {
            "type_name" => types.push(entry),
            "callable_name" => callables.push(entry),
            _ => {}
        }
    })?;

    Ok((in_source_order(types), in_source_order(callables)))
}

impl LanguageAnalyzer for JavaScriptAnalyzer {
    fn language_id(&self) -> &'static str {
        "javascript"
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            anyhow::anyhow!("failed to parse JavaScript source: {}", path.display())
        })?;

        Ok(ParsedFile {
            tree,
            source: source.to_vec(),
            path: path.to_string_lossy().to_string(),
        })
    }

    fn extract_facts(&self, parsed: &ParsedFile) -> anyhow::Result<FileFacts> {
        let (types, callables) = extract_declarations(parsed, &self.language, DECLARATION_QUERY)?;
        let module = extract_module_facts(parsed, &self.language)?;

        Ok(FileFacts {
            imports: module.imports,
            types,
            callables,
            exports: module.exports,
            ..FileFacts::empty(ExtractionStatus::Parsed)
        })
    }
}
