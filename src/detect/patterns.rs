//! Built-in tagging rules for endpoints, persistence models and UI
//! components.

use crate::config::ExtraPatterns;

use super::registry::{PatternRegistry, RuleScope, TagCategory};

/// Route declarations: Flask, Spring and Express.
const ENDPOINT_RULES: &[&str] = &[
    r#"@app\.route\(["']([^"']+)["']"#,
    r#"@PostMapping\(["']([^"']+)["']"#,
    r#"@GetMapping\(["']([^"']+)["']"#,
    r#"router\.get\(["']([^"']+)["']"#,
    r#"app\.get\(["']([^"']+)["']"#,
];

/// ORM models, JPA entities and SQL tables. Matched case-insensitively.
const PERSISTENCE_MODEL_RULES: &[&str] = &[
    r"class\s+(\w+)\s*\([^)]*Model[^)]*\)",
    r"@Entity(?:\([^)]*\))?(?:\s+@\w+(?:\([^)]*\))?)*\s+(?:(?:public|protected|private|final|abstract)\s+)*class\s+(\w+)",
    r"CREATE TABLE\s+(\w+)",
];

/// Capitalized function components and React class components. Both must
/// sit on a single line.
const UI_COMPONENT_RULES: &[&str] = &[
    r"(?:function|const)\s+([A-Z]\w+).*?(?:return\s*\(|\s*=>)",
    r"class\s+([A-Z]\w+)\s+extends\s+(?:React\.)?Component",
];

/// Build the tagging registry: built-in rules of each category followed by
/// the config's rules for that category.
pub fn build_registry(extra: &ExtraPatterns) -> anyhow::Result<PatternRegistry> {
    let mut registry = PatternRegistry::new();

    let categories = [
        (
            TagCategory::Endpoint,
            RuleScope::AllLanguages,
            ENDPOINT_RULES,
            false,
            &extra.endpoint,
        ),
        (
            TagCategory::PersistenceModel,
            RuleScope::AllLanguages,
            PERSISTENCE_MODEL_RULES,
            true,
            &extra.persistence_model,
        ),
        (
            TagCategory::UiComponent,
            RuleScope::ScriptFamily,
            UI_COMPONENT_RULES,
            false,
            &extra.ui_component,
        ),
    ];

    for (category, scope, builtin, case_insensitive, user_rules) in categories {
        registry.register(category, scope, builtin, case_insensitive)?;
        if !user_rules.is_empty() {
            let user_rules: Vec<&str> = user_rules.iter().map(String::as_str).collect();
            registry.register(category, scope, &user_rules, false)?;
        }
    }

    Ok(registry)
}
