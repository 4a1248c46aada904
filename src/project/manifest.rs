//! Dependency extraction from root-level manifests.
//!
//! Supported manifests, each keyed under its ecosystem prefix:
//! - package.json (`npm:`), runtime and development dependencies merged
//! - requirements.txt (`pip:`)
//! - go.mod (`go:`)
//! - Cargo.toml (`cargo:`)

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or parsing a manifest.
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed {path}: {message}")]
    Malformed { path: PathBuf, message: String },
}

/// Package ecosystem a manifest belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ecosystem {
    Npm,
    Pip,
    Go,
    Cargo,
}

impl Ecosystem {
    pub const ALL: [Ecosystem; 4] = [Ecosystem::Npm, Ecosystem::Pip, Ecosystem::Go, Ecosystem::Cargo];

    pub fn as_str(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "npm",
            Ecosystem::Pip => "pip",
            Ecosystem::Go => "go",
            Ecosystem::Cargo => "cargo",
        }
    }

    /// Manifest file name expected at the repository root.
    pub fn manifest_name(&self) -> &'static str {
        match self {
            Ecosystem::Npm => "package.json",
            Ecosystem::Pip => "requirements.txt",
            Ecosystem::Go => "go.mod",
            Ecosystem::Cargo => "Cargo.toml",
        }
    }

    /// Namespaced dependency key, e.g. `npm:react`.
    pub fn key(&self, name: &str) -> String {
        format!("{}:{}", self.as_str(), name)
    }

    fn parse(&self, content: &str) -> Result<Vec<(String, String)>, String> {
        match self {
            Ecosystem::Npm => parse_package_json(content),
            Ecosystem::Pip => Ok(parse_requirements(content)),
            Ecosystem::Go => Ok(parse_go_mod(content)),
            Ecosystem::Cargo => parse_cargo_toml(content),
        }
    }
}

/// Read one ecosystem's manifest from `root`.
///
/// Returns `Ok(None)` when the manifest does not exist.
pub fn load_manifest(
    root: &Path,
    ecosystem: Ecosystem,
) -> Result<Option<Vec<(String, String)>>, ManifestError> {
    let path = root.join(ecosystem.manifest_name());
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path).map_err(|source| ManifestError::Io {
        path: path.clone(),
        source,
    })?;

    ecosystem
        .parse(&content)
        .map(Some)
        .map_err(|message| ManifestError::Malformed { path, message })
}

/// Merge every root manifest into one sorted `ecosystem:name` → spec map.
///
/// Failures are logged and contribute nothing.
pub fn collect_dependencies(root: &Path) -> BTreeMap<String, String> {
    let mut dependencies = BTreeMap::new();

    for ecosystem in Ecosystem::ALL {
        match load_manifest(root, ecosystem) {
            Ok(Some(entries)) => {
                tracing::debug!(
                    manifest = ecosystem.manifest_name(),
                    count = entries.len(),
                    "read dependency manifest"
                );
                for (name, spec) in entries {
                    dependencies.insert(ecosystem.key(&name), spec);
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "skipping dependency manifest"),
        }
    }

    dependencies
}

/// `dependencies` then `devDependencies`; a dev entry overrides a runtime
/// entry of the same name.
fn parse_package_json(content: &str) -> Result<Vec<(String, String)>, String> {
    let doc: serde_json::Value = serde_json::from_str(content).map_err(|e| e.to_string())?;

    let mut entries = Vec::new();
    for section in ["dependencies", "devDependencies"] {
        let Some(map) = doc.get(section).and_then(|v| v.as_object()) else {
            continue;
        };
        for (name, spec) in map {
            let spec = match spec.as_str() {
                Some(s) => s.to_string(),
                None => spec.to_string(),
            };
            entries.push((name.clone(), spec));
        }
    }
    Ok(entries)
}

/// One entry per requirement line; the value is the whole trimmed line.
fn parse_requirements(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        // comments, blanks and options like -r, -e, --index-url
        .filter(|line| !line.is_empty() && !line.starts_with('#') && !line.starts_with('-'))
        .filter_map(|line| {
            let name = requirement_name(line);
            (!name.is_empty()).then(|| (name.to_string(), line.to_string()))
        })
        .collect()
}

/// Text before the first `==`, `>=` or `<=`.
fn requirement_name(line: &str) -> &str {
    let end = ["==", ">=", "<="]
        .iter()
        .filter_map(|op| line.find(op))
        .min()
        .unwrap_or(line.len());
    line[..end].trim()
}

/// `require` lines and blocks: module path → version.
fn parse_go_mod(content: &str) -> Vec<(String, String)> {
    let mut entries = Vec::new();
    let mut in_require_block = false;

    for line in content.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with("//") {
            continue;
        }

        if line == "require (" {
            in_require_block = true;
            continue;
        }
        if line == ")" {
            in_require_block = false;
            continue;
        }

        if let Some(rest) = line.strip_prefix("require ") {
            if !rest.contains('(') {
                entries.extend(parse_require_line(rest));
            }
            continue;
        }

        if in_require_block {
            entries.extend(parse_require_line(line));
        }
    }

    entries
}

/// Parse a require line: "google.golang.org/grpc v1.78.0 // indirect"
fn parse_require_line(line: &str) -> Option<(String, String)> {
    let line = line.split("//").next().unwrap_or("").trim();

    let mut parts = line.split_whitespace();
    let module = parts.next()?;
    let version = parts.next().unwrap_or("");
    Some((module.to_string(), version.to_string()))
}

/// `[dependencies]` then `[dev-dependencies]`.
fn parse_cargo_toml(content: &str) -> Result<Vec<(String, String)>, String> {
    let doc: toml::Table = content.parse().map_err(|e: toml::de::Error| e.to_string())?;

    let mut entries = Vec::new();
    for section in ["dependencies", "dev-dependencies"] {
        let Some(table) = doc.get(section).and_then(|v| v.as_table()) else {
            continue;
        };
        for (name, spec) in table {
            let spec = match spec {
                toml::Value::String(version) => version.clone(),
                toml::Value::Table(t) => match t.get("version").and_then(|v| v.as_str()) {
                    Some(version) => version.to_string(),
                    None => spec.to_string(),
                },
                other => other.to_string(),
            };
            entries.push((name.clone(), spec));
        }
    }
    Ok(entries)
}
