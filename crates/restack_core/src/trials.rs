//! Trial log discovery and loading.
//!
//! The task scripts write one log per subject session, named
//! `<subject>[_<session>].<ext>`, with one JSON object per line (trial
//! records, block summaries, and so on).

use crate::config::InputConfig;
use anyhow::{Context, Result};
use serde_json::Value;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// A trial log found in the data directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    /// File name without extension, e.g. `131_pre_scan`.
    pub stem: String,
    /// Leading digits of the stem.
    pub subject: Option<u32>,
    /// Whatever follows `<subject>_`.
    pub session: Option<String>,
}

impl LogFile {
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?.to_string();
        let digits = stem
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(stem.len());
        let subject = stem[..digits].parse().ok();
        let session = stem[digits..]
            .strip_prefix('_')
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Some(Self {
            path,
            stem,
            subject,
            session,
        })
    }

    /// Whether this file passes the input filters.
    pub fn accepted_by(&self, input: &InputConfig) -> bool {
        let has_extension = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e == input.extension);
        if !has_extension {
            return false;
        }
        if input.require_digit_prefix && self.subject.is_none() {
            return false;
        }
        let name = self
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        if input.exclude.iter().any(|pattern| name.contains(pattern.as_str())) {
            return false;
        }
        match (input.min_subject, self.subject) {
            (Some(min), Some(subject)) => subject >= min,
            (Some(_), None) => false,
            (None, _) => true,
        }
    }
}

/// List the trial logs in `input.data_dir`, sorted by file name.
pub fn discover_logs(input: &InputConfig) -> Result<Vec<LogFile>> {
    let entries = std::fs::read_dir(&input.data_dir).with_context(|| {
        format!("Failed to read data directory: {}", input.data_dir.display())
    })?;

    let mut logs = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| {
            format!("Failed to list data directory: {}", input.data_dir.display())
        })?;
        if !entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
            continue;
        }
        match LogFile::from_path(entry.path()) {
            Some(log) if log.accepted_by(input) => logs.push(log),
            Some(log) => tracing::debug!("Skipping {}", log.path.display()),
            None => tracing::warn!("Skipping non UTF-8 file name {:?}", entry.file_name()),
        }
    }
    logs.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(logs)
}

/// Parse one JSON value per non-blank line.
pub fn load_json_lines<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open trial log: {}", path.display()))?;

    let mut records = Vec::new();
    for (i, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Value = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid JSON record", path.display(), i + 1))?;
        records.push(record);
    }
    Ok(records)
}

/// Parse a file holding a single JSON document.
pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Value> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse JSON: {}", path.display()))
}
