//! Bugfix detector (C6): classifies commits by message against compiled
//! case-insensitive patterns.

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use regex::Regex;

use crate::model::CommitChangeSet;

/// The default bugfix pattern list from §6's configuration surface.
pub fn default_patterns() -> Vec<String> {
    vec![
        r"\bfix(ed|es)?\b".to_string(),
        r"\bbug\b".to_string(),
        r"\bhotfix\b".to_string(),
        r"\bpatch\b".to_string(),
    ]
}

/// Result of running the detector over a change-set stream.
#[derive(Debug, Clone, Default)]
pub struct BugfixDetection {
    pub bugfix_commits: HashSet<String>,
    pub file_bugfix_counts: HashMap<String, u64>,
    pub total_bugfixes: u64,
}

/// Classifies commit messages against a compiled, case-insensitive pattern
/// list. An empty pattern list is a valid, all-false classifier.
pub struct BugfixDetector {
    patterns: Vec<Regex>,
}

impl BugfixDetector {
    /// Each pattern is trimmed, skipped if empty, and compiled
    /// case-insensitively (a `(?i)` marker is prefixed unless already
    /// present). Compilation failure fails construction, per §7.
    pub fn new(patterns: &[String]) -> Result<Self> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for raw in patterns {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }
            let with_flag = if trimmed.starts_with("(?i)") {
                trimmed.to_string()
            } else {
                format!("(?i){trimmed}")
            };
            let re = Regex::new(&with_flag)
                .with_context(|| format!("invalid bugfix pattern: {raw}"))?;
            compiled.push(re);
        }
        Ok(Self { patterns: compiled })
    }

    pub fn is_bugfix(&self, message: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(message))
    }

    /// Classify an entire change-set stream.
    pub fn detect(&self, change_sets: &[CommitChangeSet]) -> BugfixDetection {
        let mut result = BugfixDetection::default();
        if self.patterns.is_empty() {
            return result;
        }

        for cs in change_sets {
            if !self.is_bugfix(&cs.commit.short_message) {
                continue;
            }
            result.bugfix_commits.insert(cs.commit.id.clone());
            result.total_bugfixes += 1;
            for change in &cs.changes {
                if change.kind == crate::model::ChangeKind::Deleted {
                    continue;
                }
                *result.file_bugfix_counts.entry(change.path.clone()).or_insert(0) += 1;
            }
        }
        result
    }
}
