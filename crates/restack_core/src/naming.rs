//! Deriving one shared label for a repeated column position.
//!
//! When a block of columns repeats (`0.rt`, `0.correct`, `1.rt`,
//! `1.correct`, ...), each position inside the block needs a single name in
//! the long table. The default rule takes the longest common substring of the
//! repetition-0 and repetition-1 names, trimmed to its first alphanumeric
//! character, so `0.rt` / `1.rt` become `rt`. Callers with a naming scheme
//! they know can supply a regex or a closure instead.

use crate::config::{NamingConfig, NamingStrategy};
use anyhow::{Context, Result};
use regex::Regex;

/// A rule that merges the names of one unit position across repetitions.
pub trait MergeNaming {
    /// Shared label for `first` (repetition 0) and `second` (repetition 1),
    /// or `None` when no meaningful label exists.
    fn merge(&self, first: &str, second: &str) -> Option<String>;
}

impl<F> MergeNaming for F
where
    F: Fn(&str, &str) -> Option<String>,
{
    fn merge(&self, first: &str, second: &str) -> Option<String> {
        self(first, second)
    }
}

/// Longest-common-substring heuristic.
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonSubstring;

impl MergeNaming for CommonSubstring {
    fn merge(&self, first: &str, second: &str) -> Option<String> {
        longest_common_substring(first, second)
    }
}

/// Removes every match of `pattern` from both names; the stripped names must
/// agree and be non-empty.
#[derive(Debug, Clone)]
pub struct PatternNaming {
    pattern: Regex,
}

impl PatternNaming {
    pub fn new(pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .with_context(|| format!("Invalid naming pattern: {}", pattern))?;
        Ok(Self { pattern })
    }
}

impl MergeNaming for PatternNaming {
    fn merge(&self, first: &str, second: &str) -> Option<String> {
        let a = self.pattern.replace_all(first, "");
        let b = self.pattern.replace_all(second, "");
        (a == b && !a.is_empty()).then(|| a.into_owned())
    }
}

/// Build the naming rule selected in configuration.
pub fn from_config(config: &NamingConfig) -> Result<Box<dyn MergeNaming>> {
    match config.strategy {
        NamingStrategy::CommonSubstring => Ok(Box::new(CommonSubstring)),
        NamingStrategy::Pattern => {
            let pattern = config
                .pattern
                .as_deref()
                .context("naming strategy 'pattern' needs a `pattern`")?;
            Ok(Box::new(PatternNaming::new(pattern)?))
        }
    }
}

/// Longest common substring of `a` and `b`, starting at its first
/// alphanumeric character.
///
/// Ties go to the earliest match in `a`. Returns `None` when the strings
/// share nothing alphanumeric.
pub fn longest_common_substring(a: &str, b: &str) -> Option<String> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    // one rolling row of the classic DP table
    let mut prev = vec![0usize; b.len() + 1];
    let mut cur = vec![0usize; b.len() + 1];
    let (mut longest, mut end_in_a) = (0usize, 0usize);

    for x in 1..=a.len() {
        for y in 1..=b.len() {
            cur[y] = if a[x - 1] == b[y - 1] { prev[y - 1] + 1 } else { 0 };
            if cur[y] > longest {
                longest = cur[y];
                end_in_a = x;
            }
        }
        std::mem::swap(&mut prev, &mut cur);
    }

    let common = &a[end_in_a - longest..end_in_a];
    let start = common.iter().position(|c| c.is_alphanumeric())?;
    Some(common[start..].iter().collect())
}
