//! Coupling analyzer (C11): co-change pair analysis with
//! Jaccard/confidence/lift and thresholds.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{ChangeKind, CommitChangeSet};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CouplingOptions {
    pub min_co_commits: u64,
    pub min_jaccard: f64,
    pub max_files_per_commit: usize,
    pub top_pairs: usize,
}

impl Default for CouplingOptions {
    fn default() -> Self {
        Self {
            min_co_commits: 3,
            min_jaccard: 0.1,
            max_files_per_commit: 50,
            top_pairs: 50,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CouplingPair {
    pub file_a: String,
    pub file_b: String,
    pub co_commits: u64,
    pub jaccard: f64,
    /// `co_commits / commits(file_a)`. Asymmetric by design: `file_a` is
    /// always the lexicographically smaller path, so confidence(A→B) ≠
    /// confidence(B→A) in general even though the pair key is symmetric
    /// (§4.10, Open Question 3).
    pub confidence: f64,
    pub lift: f64,
}

/// Canonical pair key: lexicographically smaller path first.
fn pair_key(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Analyze change-coupling across a change-set stream. Pair enumeration is
/// deterministic for a fixed commit order.
pub fn analyze(change_sets: &[CommitChangeSet], options: &CouplingOptions) -> Vec<CouplingPair> {
    let mut file_commit_counts: HashMap<String, u64> = HashMap::new();
    let mut pair_cocommit_counts: HashMap<(String, String), u64> = HashMap::new();

    for cs in change_sets {
        let unique_files: HashSet<String> = cs
            .changes
            .iter()
            .filter(|c| c.kind != ChangeKind::Deleted)
            .map(|c| c.path.to_lowercase())
            .collect();

        for path in &unique_files {
            *file_commit_counts.entry(path.clone()).or_insert(0) += 1;
        }

        let count = unique_files.len();
        if count < 2 || count > options.max_files_per_commit {
            continue;
        }

        let mut files: Vec<&String> = unique_files.iter().collect();
        files.sort();
        for i in 0..files.len() {
            for j in (i + 1)..files.len() {
                let key = pair_key(files[i], files[j]);
                *pair_cocommit_counts.entry(key).or_insert(0) += 1;
            }
        }
    }

    let n = change_sets.len() as f64;

    let mut pairs: Vec<CouplingPair> = pair_cocommit_counts
        .into_iter()
        .filter_map(|((a, b), co)| {
            if co < options.min_co_commits {
                return None;
            }
            let count_a = *file_commit_counts.get(&a).unwrap_or(&0);
            let count_b = *file_commit_counts.get(&b).unwrap_or(&0);
            let union = count_a + count_b - co;
            if union == 0 {
                return None;
            }
            let jaccard = co as f64 / union as f64;
            if jaccard < options.min_jaccard {
                return None;
            }
            let confidence = if count_a == 0 {
                0.0
            } else {
                co as f64 / count_a as f64
            };
            let lift = if n == 0.0 || count_a == 0 || count_b == 0 {
                0.0
            } else {
                (co as f64 / n) / ((count_a as f64 / n) * (count_b as f64 / n))
            };
            Some(CouplingPair {
                file_a: a,
                file_b: b,
                co_commits: co,
                jaccard,
                confidence,
                lift,
            })
        })
        .collect();

    pairs.sort_by(|x, y| {
        y.jaccard
            .partial_cmp(&x.jaccard)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| x.file_a.cmp(&y.file_a))
            .then_with(|| x.file_b.cmp(&y.file_b))
    });
    pairs.truncate(options.top_pairs);
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Author, CommitInfo, FileChange};
    use chrono::{FixedOffset, TimeZone};

    fn when(i: i64) -> chrono::DateTime<FixedOffset> {
        FixedOffset::east_opt(0).unwrap().timestamp_opt(i, 0).unwrap()
    }

    fn change(path: &str) -> FileChange {
        FileChange {
            path: path.into(),
            old_path: None,
            lines_added: 1,
            lines_deleted: 0,
            kind: ChangeKind::Modified,
        }
    }

    fn commit(id: &str, i: i64, paths: &[&str]) -> CommitChangeSet {
        CommitChangeSet {
            commit: CommitInfo::new(id, when(i), Author::new("a", "a@x.com"), "msg"),
            changes: paths.iter().map(|p| change(p)).collect(),
        }
    }

    #[test]
    fn coupling_precision_scenario() {
        // 4 commits touch both a and b; 6 touch a alone (with other
        // files); 2 touch b alone. Expected co=4, jaccard=4/12≈0.333,
        // confidence(a→b)=4/10=0.4 (scenario 5 of spec.md §8).
        let mut sets = Vec::new();
        for i in 0..4 {
            sets.push(commit(&format!("ab{i}"), i, &["a", "b"]));
        }
        for i in 0..6 {
            sets.push(commit(&format!("a{i}"), 100 + i, &["a", "other"]));
        }
        for i in 0..2 {
            sets.push(commit(&format!("b{i}"), 200 + i, &["b", "other2"]));
        }

        let options = CouplingOptions {
            min_co_commits: 1,
            min_jaccard: 0.0,
            max_files_per_commit: 50,
            top_pairs: 10,
        };
        let pairs = analyze(&sets, &options);
        let ab = pairs.iter().find(|p| p.file_a == "a" && p.file_b == "b").unwrap();
        assert_eq!(ab.co_commits, 4);
        assert!((ab.jaccard - 4.0 / 12.0).abs() < 1e-9);
        assert!((ab.confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn pair_key_is_commutative() {
        assert_eq!(pair_key("b", "a"), pair_key("a", "b"));
    }

    #[test]
    fn jaccard_and_confidence_never_exceed_one() {
        let sets = vec![commit("c1", 0, &["a", "b"]), commit("c2", 1, &["a", "b"])];
        let options = CouplingOptions {
            min_co_commits: 1,
            min_jaccard: 0.0,
            ..CouplingOptions::default()
        };
        let pairs = analyze(&sets, &options);
        for p in &pairs {
            assert!(p.jaccard <= 1.0 + 1e-9);
            assert!(p.confidence <= 1.0 + 1e-9);
        }
    }

    #[test]
    fn oversized_commits_skip_pair_generation_but_keep_touch_counts() {
        let paths: Vec<String> = (0..5).map(|i| format!("f{i}")).collect();
        let refs: Vec<&str> = paths.iter().map(|s| s.as_str()).collect();
        let sets = vec![commit("big", 0, &refs)];
        let options = CouplingOptions {
            min_co_commits: 1,
            min_jaccard: 0.0,
            max_files_per_commit: 3,
            top_pairs: 10,
        };
        let pairs = analyze(&sets, &options);
        assert!(pairs.is_empty());
    }

    #[test]
    fn deterministic_for_fixed_order() {
        let sets = vec![
            commit("c1", 0, &["b", "a"]),
            commit("c2", 1, &["a", "b"]),
            commit("c3", 2, &["a", "b"]),
        ];
        let options = CouplingOptions {
            min_co_commits: 1,
            min_jaccard: 0.0,
            ..CouplingOptions::default()
        };
        let a1 = analyze(&sets, &options);
        let a2 = analyze(&sets, &options);
        assert_eq!(a1, a2);
    }

    #[test]
    fn top_pairs_truncates() {
        let sets = vec![
            commit("c1", 0, &["a", "b", "c"]),
            commit("c2", 1, &["a", "b", "c"]),
        ];
        let options = CouplingOptions {
            min_co_commits: 1,
            min_jaccard: 0.0,
            max_files_per_commit: 10,
            top_pairs: 1,
        };
        let pairs = analyze(&sets, &options);
        assert_eq!(pairs.len(), 1);
    }
}
