//! Registry of pattern-tagging rules.
//!
//! The registry is an ordered list of `(category, rules)` entries. Tagging
//! walks the entries in order and every rule contributes all of its
//! matches, so the order of the output follows the order of registration.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::language::Language;

/// Maximum number of tags kept per file.
pub const MAX_TAGS: usize = 10;

/// Kind of domain construct a tag points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagCategory {
    /// HTTP route declarations.
    Endpoint,
    /// ORM models, entities and tables.
    PersistenceModel,
    /// UI components in the script family.
    UiComponent,
}

impl TagCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagCategory::Endpoint => "endpoint",
            TagCategory::PersistenceModel => "persistence-model",
            TagCategory::UiComponent => "ui-component",
        }
    }
}

impl fmt::Display for TagCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One tagged construct found in a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternTag {
    pub category: TagCategory,
    pub value: String,
}

impl PatternTag {
    pub fn new(category: TagCategory, value: impl Into<String>) -> Self {
        Self {
            category,
            value: value.into(),
        }
    }
}

impl fmt::Display for PatternTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.category, self.value)
    }
}

/// Which files a registry entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleScope {
    AllLanguages,
    /// JavaScript, TypeScript and React files only.
    ScriptFamily,
}

impl RuleScope {
    fn applies_to(&self, language: Language) -> bool {
        match self {
            RuleScope::AllLanguages => true,
            RuleScope::ScriptFamily => language.is_script_family(),
        }
    }
}

/// Rules of one category, tried in order.
#[derive(Debug, Clone)]
struct RegistryEntry {
    category: TagCategory,
    scope: RuleScope,
    rules: Vec<Regex>,
}

/// Ordered registry of tagging rules.
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    entries: Vec<RegistryEntry>,
}

impl PatternRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a category entry. Each rule's first capture group becomes the
    /// tag value.
    pub fn register(
        &mut self,
        category: TagCategory,
        scope: RuleScope,
        patterns: &[&str],
        case_insensitive: bool,
    ) -> anyhow::Result<()> {
        let rules = patterns
            .iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(case_insensitive)
                    .build()
                    .map_err(|e| anyhow::anyhow!("compiling tag rule {:?}: {}", p, e))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        self.entries.push(RegistryEntry {
            category,
            scope,
            rules,
        });
        Ok(())
    }

    /// Number of registered rules across all entries.
    pub fn rule_count(&self) -> usize {
        self.entries.iter().map(|e| e.rules.len()).sum()
    }

    /// Tag `content`, keeping at most `MAX_TAGS` results.
    pub fn tag(&self, content: &str, language: Language) -> Vec<PatternTag> {
        let mut tags = Vec::new();

        'entries: for entry in &self.entries {
            if !entry.scope.applies_to(language) {
                continue;
            }
            for rule in &entry.rules {
                for caps in rule.captures_iter(content) {
                    if let Some(m) = caps.get(1) {
                        tags.push(PatternTag::new(entry.category, m.as_str()));
                        if tags.len() == MAX_TAGS {
                            break 'entries;
                        }
                    }
                }
            }
        }

        tags
    }
}
