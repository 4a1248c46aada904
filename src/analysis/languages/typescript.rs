//! TypeScript analyzer using tree-sitter.
//!
//! One analyzer per grammar: plain TypeScript and TSX.

use std::path::Path;

use tree_sitter::{Language, Parser};

use super::javascript::{extract_declarations, extract_module_facts};
use crate::analysis::{ExtractionStatus, FileFacts, LanguageAnalyzer, ParsedFile};

const DECLARATION_QUERY: &str = r#"
; Classes, abstract classes, interfaces, type aliases and enums
(class_declaration
  name: (type_identifier) @type_name
)

(abstract_class_declaration
  name: (type_identifier) @type_name
)

(interface_declaration
  name: (type_identifier) @type_name
)

(type_alias_declaration
  name: (type_identifier) @type_name
)

(enum_declaration
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

(method_definition
  name: (property_identifier) @callable_name
)

(pair
  key: (property_identifier) @callable_name
  value: [(arrow_function) (function_expression)]
)
"#;

pub struct TypeScriptAnalyzer {
    language: Language,
    tsx: bool,
}

impl TypeScriptAnalyzer {
    pub fn new() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            tsx: false,
        }
    }

    /// Analyzer for `.tsx` files, which need the JSX-aware grammar.
    pub fn tsx() -> Self {
        Self {
            language: tree_sitter_typescript::LANGUAGE_TSX.into(),
            tsx: true,
        }
    }

    fn create_parser(&self) -> anyhow::Result<Parser> {
        let mut parser = Parser::new();
        parser.set_language(&self.language)?;
        Ok(parser)
    }
}

impl Default for TypeScriptAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageAnalyzer for TypeScriptAnalyzer {
    fn language_id(&self) -> &'static str {
        if self.tsx {
            "tsx"
        } else {
            "typescript"
        }
    }

    fn file_extensions(&self) -> &'static [&'static str] {
        if self.tsx {
            &["tsx"]
        } else {
            &["ts", "mts", "cts"]
        }
    }

    fn parse(&self, path: &Path, source: &[u8]) -> anyhow::Result<ParsedFile> {
        let mut parser = self.create_parser()?;
        let tree = parser.parse(source, None).ok_or_else(|| {
            anyhow::anyhow!("failed to parse TypeScript source: {}", path.display())
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

#[cfg(test)]
mod tests {
    use super::*;

    fn facts_with(analyzer: &TypeScriptAnalyzer, name: &str, source: &str) -> FileFacts {
        let parsed = analyzer.parse(Path::new(name), source.as_bytes()).unwrap();
        assert!(!parsed.has_errors(), "fixture should parse cleanly");
        analyzer.extract_facts(&parsed).unwrap()
    }

    #[test]
    fn test_type_declarations() {
        let source = r#"
import { Injectable } from '@angular/core';

export interface User {
    id: number;
}

type UserId = number;

enum Role { Admin, Guest }

abstract class BaseRepo {}

export class UserService {
    async findUser(id: UserId): Promise<User | undefined> {
        return undefined;
    }
}
"#;
        let facts = facts_with(&TypeScriptAnalyzer::new(), "service.ts", source);
        assert_eq!(facts.imports, vec!["@angular/core"]);
        assert_eq!(
            facts.types,
            vec!["User", "UserId", "Role", "BaseRepo", "UserService"]
        );
        assert_eq!(facts.callables, vec!["findUser"]);
        assert_eq!(facts.exports, vec!["User", "UserService"]);
    }

    #[test]
    fn test_arrow_functions_with_types() {
        let source = r#"
export const fetchUsers = async (limit: number): Promise<string[]> => {
    return [];
};
export function format(name: string): string {
    return name;
}
"#;
        let facts = facts_with(&TypeScriptAnalyzer::new(), "api.ts", source);
        assert_eq!(facts.callables, vec!["fetchUsers", "format"]);
        assert_eq!(facts.exports, vec!["fetchUsers", "format"]);
    }

    #[test]
    fn test_tsx_component() {
        let source = r#"
import React from 'react';

interface Props { title: string }

export const Header = ({ title }: Props) => {
    return <h1>{title}</h1>;
};
"#;
        let facts = facts_with(&TypeScriptAnalyzer::tsx(), "Header.tsx", source);
        assert_eq!(facts.imports, vec!["react"]);
        assert_eq!(facts.types, vec!["Props"]);
        assert_eq!(facts.callables, vec!["Header"]);
        assert_eq!(facts.exports, vec!["Header"]);
    }

    #[test]
    fn test_jsx_needs_tsx_grammar() {
        let analyzer = TypeScriptAnalyzer::new();
        let parsed = analyzer
            .parse(
                Path::new("Header.ts"),
                b"const Header = () => <h1 className=\"x\">hi</h1>;\n",
            )
            .unwrap();
        assert!(parsed.has_errors());
    }
}
