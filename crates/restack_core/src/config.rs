use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::reshape::CutSpec;

// ============================================================================
// Top-level config
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RestackConfig {
    pub input: InputConfig,
    pub cut: Option<CutConfig>,
    pub naming: NamingConfig,
    pub output: OutputConfig,
}

impl RestackConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    /// After loading, env var overrides are applied.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;
        let mut config: RestackConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML config")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from path; a missing file yields defaults with env overrides.
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!("Config file {} not found, using defaults", path.display());
            let mut cfg = Self::default();
            cfg.apply_env_overrides();
            return Ok(cfg);
        }
        Self::load(path)
    }

    /// Apply environment variable overrides on top of file-based config.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("RESTACK_DATA_DIR") {
            self.input.data_dir = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("RESTACK_MIN_SUBJECT") {
            if let Ok(n) = v.parse() {
                self.input.min_subject = Some(n);
            }
        }
        if let Ok(v) = std::env::var("RESTACK_OUTPUT") {
            self.output.csv = Some(PathBuf::from(v));
        }
        if let Ok(v) = std::env::var("RESTACK_SUMMARY") {
            self.output.summary = Some(PathBuf::from(v));
        }
    }
}

// ============================================================================
// Sub-configs
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding one trial log per subject session.
    pub data_dir: PathBuf,
    /// File extension of trial logs, without the dot.
    pub extension: String,
    /// Only files whose name starts with a digit (the subject id) are logs.
    pub require_digit_prefix: bool,
    /// Files whose name contains any of these are skipped.
    pub exclude: Vec<String>,
    /// Skip subjects with a lower id.
    pub min_subject: Option<u32>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            extension: "txt".to_string(),
            require_digit_prefix: true,
            exclude: vec!["questions".to_string()],
            min_subject: None,
        }
    }
}

/// Cut region as written in TOML.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CutConfig {
    pub start: usize,
    pub length: usize,
    pub count: usize,
    #[serde(default)]
    pub skip: Vec<usize>,
    #[serde(default)]
    pub end: Option<usize>,
}

impl CutConfig {
    pub fn to_spec(&self) -> CutSpec {
        CutSpec {
            start: self.start,
            length: self.length,
            count: self.count,
            skip: self.skip.iter().copied().collect::<BTreeSet<_>>(),
            end: self.end,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub strategy: NamingStrategy,
    /// Regex removed from both names when `strategy = "pattern"`.
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamingStrategy {
    /// Longest common substring, trimmed to the first alphanumeric character
    #[default]
    CommonSubstring,
    /// Strip a caller-supplied regex from both names
    Pattern,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Long-table CSV; `None` writes to stdout.
    pub csv: Option<PathBuf>,
    /// Per-column mean / SEM CSV; `None` skips the summary.
    pub summary: Option<PathBuf>,
}

// ============================================================================
// Tests
// ============================================================================
