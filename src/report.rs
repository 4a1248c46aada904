//! Rendering and output of analysis results.
//!
//! - Markdown: the structured project overview and the narrative summary
//! - JSON: the four machine-readable artifacts
//! - Pretty: a short colored run summary for the terminal

use colored::*;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::fs;
use std::path::{Path, PathBuf};

use crate::context::{self, ResumableContext};
use crate::project::ProjectSummary;
use crate::record::FileRecord;

pub const FILES_ANALYSIS_FILE: &str = "files_analysis.json";
pub const PROJECT_STRUCTURE_FILE: &str = "project_structure.json";
pub const AI_CONTEXT_FILE: &str = "ai_context.json";
pub const AI_SUMMARY_FILE: &str = "ai_summary.md";

// =============================================================================
// Markdown
// =============================================================================

/// `1234567` → `1,234,567`.
fn with_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn join_or(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        fallback.to_string()
    } else {
        items.join(", ")
    }
}

/// Up to `limit` languages, most files first.
fn top_languages(summary: &ProjectSummary, limit: usize) -> Vec<String> {
    let mut languages: Vec<(&String, &usize)> = summary.language_histogram.iter().collect();
    languages.sort_by(|a, b| b.1.cmp(a.1));
    languages
        .into_iter()
        .take(limit)
        .map(|(lang, count)| format!("{} ({} files)", lang, count))
        .collect()
}

/// Structured Markdown overview of the project.
pub fn render_overview(records: &[FileRecord], summary: &ProjectSummary, threshold: u8) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_overview(&mut out, records, summary, threshold);
    out
}

fn write_overview(
    out: &mut String,
    records: &[FileRecord],
    summary: &ProjectSummary,
    threshold: u8,
) -> fmt::Result {
    let frameworks: Vec<String> = summary.detected_frameworks.iter().cloned().collect();

    writeln!(out, "# Project Analysis: {}", summary.name)?;
    writeln!(out)?;
    writeln!(out, "## Project Statistics")?;
    writeln!(out, "- **Total Files**: {}", summary.file_count)?;
    writeln!(
        out,
        "- **Total Lines of Code**: {}",
        with_thousands(summary.total_lines)
    )?;
    writeln!(
        out,
        "- **Primary Languages**: {}",
        top_languages(summary, 5).join(", ")
    )?;
    writeln!(out)?;
    writeln!(out, "## Detected Frameworks & Technologies")?;
    writeln!(out, "{}", join_or(&frameworks, "No specific frameworks detected"))?;
    writeln!(out)?;
    writeln!(out, "## Project Structure")?;
    writeln!(
        out,
        "- **Entry Points**: {}",
        join_or(&summary.entry_points, "Not clearly identified")
    )?;
    writeln!(
        out,
        "- **Configuration Files**: {} config files found",
        summary.config_paths.len()
    )?;
    writeln!(
        out,
        "- **Documentation Files**: {} documentation files",
        summary.doc_paths.len()
    )?;
    writeln!(out)?;
    writeln!(out, "## Key Dependencies")?;
    if summary.dependency_manifest.is_empty() {
        writeln!(out, "No dependencies file found")?;
    } else {
        for dep in summary.dependency_manifest.keys().take(10) {
            writeln!(out, "- {}", dep)?;
        }
    }
    writeln!(out)?;
    writeln!(out, "## Critical Files (High Complexity)")?;
    for record in context::ranked_above(records, threshold).take(10) {
        writeln!(
            out,
            "- **{}** ({}, {} lines, complexity: {})",
            record.path, record.declared_language, record.line_count, record.complexity_score
        )?;
        if !record.pattern_tags.is_empty() {
            let patterns: Vec<String> = record
                .pattern_tags
                .iter()
                .take(3)
                .map(|t| t.to_string())
                .collect();
            writeln!(out, "  - Key patterns: {}", patterns.join(", "))?;
        }
    }

    Ok(())
}

/// Narrative Markdown summary meant to be handed to an assistant.
pub fn render_summary(context: &ResumableContext) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_summary(&mut out, context);
    out
}

fn write_summary(out: &mut String, context: &ResumableContext) -> fmt::Result {
    let stack = &context.technical_stack;
    let languages: Vec<String> = stack
        .languages
        .iter()
        .map(|(lang, count)| format!("{} ({} files)", lang, count))
        .collect();
    let frameworks: Vec<String> = stack.frameworks.iter().cloned().collect();

    writeln!(out, "# AI Codebase Context")?;
    writeln!(out)?;
    writeln!(out, "{}", context.project_overview)?;
    writeln!(out, "## Technical Stack Summary")?;
    writeln!(out, "**Languages**: {}", languages.join(", "))?;
    writeln!(out, "**Frameworks**: {}", join_or(&frameworks, "none detected"))?;
    writeln!(
        out,
        "**Architecture Patterns**: {}",
        join_or(&context.architecture_patterns, "none inferred")
    )?;
    writeln!(out)?;
    writeln!(out, "## Critical Components for AI Understanding")?;
    writeln!(out)?;
    writeln!(out, "### Top Priority Files (High Complexity)")?;
    for component in context.key_components.iter().take(5) {
        writeln!(out, "**{}** (`{}`)", component.name, component.path)?;
        writeln!(
            out,
            "- Type: {}, Complexity: {}, Lines: {}",
            component.language, component.complexity, component.lines
        )?;
        let functions: Vec<&str> = component.functions.iter().take(5).map(String::as_str).collect();
        writeln!(out, "- Key functions: {}", functions.join(", "))?;
        if !component.classes.is_empty() {
            let classes: Vec<&str> = component.classes.iter().take(3).map(String::as_str).collect();
            writeln!(out, "- Key classes: {}", classes.join(", "))?;
        }
        writeln!(out)?;
    }

    let sections = [
        ("API Endpoints Discovered", &context.endpoints, 10),
        ("Database Models", &context.models, 8),
        ("UI Components", &context.ui_components, 10),
    ];
    for (title, tags, limit) in sections {
        if tags.is_empty() {
            continue;
        }
        writeln!(out)?;
        writeln!(out, "### {}", title)?;
        for tag in tags.iter().take(limit) {
            writeln!(out, "- `{}` (in {})", tag.value, tag.source_path)?;
        }
    }

    writeln!(out)?;
    writeln!(out, "## External Dependencies & Services")?;
    for dep in stack.dependencies.keys().take(15) {
        writeln!(out, "- {}", dep)?;
    }
    if !context.external_services.is_empty() {
        writeln!(
            out,
            "\n**Network-facing services**: {}",
            context.external_services.join(", ")
        )?;
    }
    writeln!(out)?;

    let critical: Vec<String> = context.critical_files.iter().take(5).cloned().collect();
    writeln!(out, "## For AI Development Tasks:")?;
    writeln!(
        out,
        "1. **Start with these critical files**: {}",
        join_or(&critical, "none above the critical threshold")
    )?;
    writeln!(
        out,
        "2. **Main architecture patterns**: {}",
        join_or(&context.architecture_patterns, "none inferred")
    )?;
    writeln!(
        out,
        "3. **Entry points to understand**: {}",
        join_or(&context.entry_points, "Check project structure for main files")
    )?;
    writeln!(
        out,
        "4. **Key integration points**: API endpoints and database models listed above"
    )?;
    writeln!(out)?;
    writeln!(out, "---")?;
    writeln!(
        out,
        "*Analysis completed: {}*",
        context.analysis_timestamp.to_rfc3339()
    )?;
    writeln!(
        out,
        "*This context is designed to be resumable - save this file to maintain context across AI conversations.*"
    )?;

    Ok(())
}

// =============================================================================
// Files
// =============================================================================

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).map_err(|e| anyhow::anyhow!("writing {}: {}", path.display(), e))
}

fn write_text(path: &Path, text: &str) -> anyhow::Result<()> {
    fs::write(path, text).map_err(|e| anyhow::anyhow!("writing {}: {}", path.display(), e))
}

/// Write the run's artifacts into `output_dir`, creating it if needed.
///
/// With `summary_only` only the narrative summary is written. Returns the
/// written paths.
pub fn write_artifacts(
    output_dir: &Path,
    records: &[FileRecord],
    summary: &ProjectSummary,
    context: &ResumableContext,
    summary_only: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(output_dir)
        .map_err(|e| anyhow::anyhow!("creating {}: {}", output_dir.display(), e))?;

    let mut written = Vec::new();

    if !summary_only {
        let files_path = output_dir.join(FILES_ANALYSIS_FILE);
        write_json(&files_path, records)?;
        written.push(files_path);

        let structure_path = output_dir.join(PROJECT_STRUCTURE_FILE);
        write_json(&structure_path, summary)?;
        written.push(structure_path);

        let context_path = output_dir.join(AI_CONTEXT_FILE);
        write_json(&context_path, context)?;
        written.push(context_path);
    }

    let summary_path = output_dir.join(AI_SUMMARY_FILE);
    write_text(&summary_path, &render_summary(context))?;
    written.push(summary_path);

    for path in &written {
        tracing::debug!(path = %path.display(), "wrote artifact");
    }

    Ok(written)
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Colored completion line(s) for the terminal.
pub fn write_pretty(summary: &ProjectSummary, output_dir: &Path, written: &[PathBuf]) {
    print!("  {}", "✓".green().bold());
    println!(
        " Analysis complete! Found {} files across {} languages.",
        summary.file_count.to_string().bold(),
        summary.language_histogram.len().to_string().bold()
    );

    print!("  {}", "Output: ".dimmed());
    println!("{}", output_dir.display());
    for path in written {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        println!("    {}", name.cyan());
    }
}
