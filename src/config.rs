//! Analyzer configuration file.
//!
//! Configuration is optional. When present it extends the built-in ignore
//! list, pattern registry and framework catalog, and tunes the ranking
//! thresholds used by the context synthesizer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names searched for in the repository root.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["codebase-analyzer.yaml", ".codebase-analyzer.yaml"];

/// Top-level analyzer configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AnalyzerConfig {
    /// Extra path component names to ignore, on top of the built-in list.
    #[serde(default)]
    pub ignore_names: Vec<String>,
    /// Glob patterns for repo-relative paths to exclude (e.g. "**/fixtures/**").
    #[serde(default)]
    pub excluded_paths: Vec<String>,
    /// Analyze files whose extension is not in the language table.
    #[serde(default)]
    pub include_text_files: bool,
    #[serde(default)]
    pub thresholds: Thresholds,
    /// Extra tagging rules appended after the built-in ones.
    #[serde(default)]
    pub extra_patterns: ExtraPatterns,
    /// Extra framework signatures, keyed by framework name.
    #[serde(default)]
    pub extra_frameworks: BTreeMap<String, Vec<String>>,
}

/// Complexity cut-offs used when ranking files.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct Thresholds {
    /// Files scoring above this become key components.
    #[serde(default = "default_key_component")]
    pub key_component: u8,
    /// Files scoring above this are critical.
    #[serde(default = "default_critical")]
    pub critical: u8,
    /// Files scoring above this are listed in the rendered overview.
    #[serde(default = "default_overview")]
    pub overview: u8,
}

fn default_key_component() -> u8 {
    25
}

fn default_critical() -> u8 {
    40
}

fn default_overview() -> u8 {
    30
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            key_component: default_key_component(),
            critical: default_critical(),
            overview: default_overview(),
        }
    }
}

/// User-supplied tagging rules. Each regex must have one capture group.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ExtraPatterns {
    #[serde(default)]
    pub endpoint: Vec<String>,
    #[serde(default)]
    pub persistence_model: Vec<String>,
    #[serde(default)]
    pub ui_component: Vec<String>,
}

impl ExtraPatterns {
    fn all(&self) -> impl Iterator<Item = &String> {
        self.endpoint
            .iter()
            .chain(self.persistence_model.iter())
            .chain(self.ui_component.iter())
    }
}

impl AnalyzerConfig {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: AnalyzerConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config for a run: an explicit path wins, otherwise the
    /// repository root is searched, otherwise defaults apply.
    pub fn load(explicit: Option<&Path>, repo_root: &Path) -> anyhow::Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => discover(repo_root),
        };

        let config = match path {
            Some(p) => {
                tracing::info!(config = %p.display(), "loading analyzer config");
                Self::parse_file(&p)
                    .map_err(|e| anyhow::anyhow!("parsing config {}: {}", p.display(), e))?
            }
            None => Self::default(),
        };

        validate(&config)?;
        Ok(config)
    }
}

/// Find a config file in the repository root.
fn discover(repo_root: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| repo_root.join(name))
        .find(|p| p.is_file())
}

/// Validate that all patterns in the config compile.
pub fn validate(config: &AnalyzerConfig) -> anyhow::Result<()> {
    for pattern in config.extra_patterns.all() {
        let re = regex::Regex::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid extra pattern {:?}: {}", pattern, e))?;
        if re.captures_len() < 2 {
            anyhow::bail!("extra pattern {:?} needs a capture group", pattern);
        }
    }

    for (framework, signatures) in &config.extra_frameworks {
        for s in signatures {
            regex::Regex::new(s).map_err(|e| {
                anyhow::anyhow!("invalid signature {:?} for framework {}: {}", s, framework, e)
            })?;
        }
    }

    for pattern in &config.excluded_paths {
        globset::Glob::new(pattern)
            .map_err(|e| anyhow::anyhow!("invalid excluded_paths pattern {:?}: {}", pattern, e))?;
    }

    let t = &config.thresholds;
    if t.key_component > 100 || t.critical > 100 || t.overview > 100 {
        anyhow::bail!("thresholds must be within 0..=100");
    }

    Ok(())
}
