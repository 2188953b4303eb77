//! Legacy hotspot scorer (C12): sigmoid-weighted recency aggregation, the
//! original Bugspots heuristic.
//!
//! This path does not reuse the file aggregator (C7); per §9's Open
//! Question 2, it is still expected to honor path filters — the caller
//! builds `change_sets` from a reader instance that already applied the
//! configured include/exclude globs, so the filter is honored upstream
//! rather than re-applied here.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::model::{ChangeKind, CommitChangeSet};
use crate::normalize::clamp;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyHotspot {
    pub path: String,
    pub score: f64,
}

fn sigmoid(t: f64) -> f64 {
    1.0 / (1.0 + (-12.0 * t + 12.0).exp())
}

/// Bugspots' time weight for a fix at `d` within `[since, until]`. When
/// `until <= since` the window is degenerate and every fix is treated as
/// maximally recent (`t = 1`).
fn time_weight(d: DateTime<FixedOffset>, since: DateTime<FixedOffset>, until: DateTime<FixedOffset>) -> f64 {
    if until <= since {
        return sigmoid(1.0);
    }
    let total = (until - since).num_seconds() as f64;
    let remaining = (until - d).num_seconds() as f64;
    let t = clamp(1.0 - remaining / total);
    sigmoid(t)
}

/// Score each file touched by a bugfix commit in `[since, until]` by
/// summing the sigmoid-weighted recency of every such fix, then rank
/// descending and cap at `max_hotspots`.
pub fn legacy_hotspots(
    change_sets: &[CommitChangeSet],
    bugfix_commits: &HashSet<String>,
    since: DateTime<FixedOffset>,
    until: DateTime<FixedOffset>,
    max_hotspots: usize,
) -> Vec<LegacyHotspot> {
    let mut scores: HashMap<String, f64> = HashMap::new();

    for cs in change_sets {
        if !bugfix_commits.contains(&cs.commit.id) {
            continue;
        }
        if cs.commit.when < since || cs.commit.when > until {
            continue;
        }
        let weight = time_weight(cs.commit.when, since, until);
        for change in &cs.changes {
            if change.kind == ChangeKind::Deleted {
                continue;
            }
            *scores.entry(change.path.clone()).or_insert(0.0) += weight;
        }
    }

    let mut hotspots: Vec<LegacyHotspot> = scores
        .into_iter()
        .map(|(path, score)| LegacyHotspot { path, score })
        .collect();
    hotspots.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.path.cmp(&b.path))
    });
    hotspots.truncate(max_hotspots);
    hotspots
}
