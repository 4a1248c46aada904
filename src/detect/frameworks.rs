//! Framework detection from file content.
//!
//! Each framework has a list of signatures tried in order; the first
//! match marks the framework as used by the file.

use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

/// Built-in framework signatures, in catalog order.
const BUILTIN_FRAMEWORKS: &[(&str, &[&str])] = &[
    ("React", &[r"import.*react", r#"from ["']react["']"#, r"<.*jsx.*>"]),
    ("Vue", &[r"import.*vue", r"<template>", r"export default.*Vue"]),
    ("Angular", &[r"@angular", r"@Component", r"@Injectable"]),
    ("Django", &[r"from django", r"django\.urls", r"models\.Model"]),
    ("Flask", &[r"from flask", r"Flask\(__name__\)", r"@app\.route"]),
    (
        "Express",
        &[r"express\(\)", r"app\.get\(", r#"require\(["']express["']"#],
    ),
    ("FastAPI", &[r"from fastapi", r"FastAPI\(\)", r"@app\.get"]),
    ("Spring", &[r"@RestController", r"@Service", r"@Entity"]),
    ("Next.js", &[r"next/head", r"next/router", r"getStaticProps"]),
    ("Nuxt", &[r"nuxt\.config", r"<nuxt-", r"@nuxtjs"]),
    ("Svelte", &[r"<script>", r"export let", r"svelte/store"]),
];

#[derive(Debug, Clone)]
struct Framework {
    name: String,
    signatures: Vec<Regex>,
}

/// Ordered catalog of frameworks and their signatures.
#[derive(Debug, Clone)]
pub struct FrameworkCatalog {
    frameworks: Vec<Framework>,
}

fn compile(signature: &str) -> anyhow::Result<Regex> {
    RegexBuilder::new(signature)
        .case_insensitive(true)
        .build()
        .map_err(|e| anyhow::anyhow!("compiling framework signature {:?}: {}", signature, e))
}

impl FrameworkCatalog {
    /// The built-in catalog.
    pub fn builtin() -> anyhow::Result<Self> {
        let frameworks = BUILTIN_FRAMEWORKS
            .iter()
            .map(|(name, signatures)| {
                Ok(Framework {
                    name: name.to_string(),
                    signatures: signatures
                        .iter()
                        .map(|s| compile(s))
                        .collect::<anyhow::Result<Vec<_>>>()?,
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(Self { frameworks })
    }

    /// The built-in catalog plus user signatures. Signatures for a known
    /// framework are tried after its built-in ones; unknown names are added
    /// at the end of the catalog.
    pub fn with_extras(extra: &BTreeMap<String, Vec<String>>) -> anyhow::Result<Self> {
        let mut catalog = Self::builtin()?;

        for (name, signatures) in extra {
            let compiled = signatures
                .iter()
                .map(|s| compile(s))
                .collect::<anyhow::Result<Vec<_>>>()?;

            match catalog.frameworks.iter_mut().find(|f| &f.name == name) {
                Some(existing) => existing.signatures.extend(compiled),
                None => catalog.frameworks.push(Framework {
                    name: name.clone(),
                    signatures: compiled,
                }),
            }
        }

        Ok(catalog)
    }

    /// Names of the frameworks whose signatures appear in `content`, in
    /// catalog order.
    pub fn detect(&self, content: &str) -> Vec<String> {
        self.frameworks
            .iter()
            .filter(|f| f.signatures.iter().any(|re| re.is_match(content)))
            .map(|f| f.name.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.frameworks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frameworks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_react_import() {
        let catalog = FrameworkCatalog::builtin().unwrap();
        let found = catalog.detect("import React from 'react';\n");
        assert_eq!(found, vec!["React"]);
    }

    #[test]
    fn test_signatures_are_case_insensitive() {
        let catalog = FrameworkCatalog::builtin().unwrap();
        assert_eq!(catalog.detect("FROM DJANGO.DB IMPORT models"), vec!["Django"]);
    }

    #[test]
    fn test_multiple_frameworks_in_catalog_order() {
        let catalog = FrameworkCatalog::builtin().unwrap();
        let content = "from fastapi import FastAPI\napp = FastAPI()\n@app.get('/')\n";
        // `app.get(` is an Express signature too
        assert_eq!(catalog.detect(content), vec!["Express", "FastAPI"]);
    }

    #[test]
    fn test_svelte_script_block() {
        let catalog = FrameworkCatalog::builtin().unwrap();
        let content = "<script>\n  let count = 0;\n</script>\n<button>{count}</button>\n";
        assert_eq!(catalog.detect(content), vec!["Svelte"]);
    }

    #[test]
    fn test_plain_text_detects_nothing() {
        let catalog = FrameworkCatalog::builtin().unwrap();
        assert!(catalog.detect("hello world\n").is_empty());
    }

    #[test]
    fn test_extras_extend_and_add() {
        let mut extra = BTreeMap::new();
        extra.insert("Hono".to_string(), vec![r#"from ['"]hono['"]"#.to_string()]);
        extra.insert("Svelte".to_string(), vec![r"\$:".to_string()]);

        let catalog = FrameworkCatalog::with_extras(&extra).unwrap();
        assert_eq!(catalog.len(), BUILTIN_FRAMEWORKS.len() + 1);
        assert_eq!(catalog.detect("import { Hono } from 'hono'"), vec!["Hono"]);
        assert_eq!(catalog.detect("$: doubled = count * 2"), vec!["Svelte"]);
    }
}
