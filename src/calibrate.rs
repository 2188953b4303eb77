//! Weight calibrator (C13): coordinate descent over the weight simplex
//! against a bugfix oracle.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, FixedOffset};

use crate::model::FileMetrics;
use crate::score::file_score::{compute_components, FileScoreContext, FileScoreWeights};

const FEATURE_COUNT: usize = FileScoreWeights::COUNT;
const INITIAL_STEP: f64 = 0.05;
const MIN_STEP: f64 = 0.01;
const MAX_PASSES: usize = 100;
const IMPROVEMENT_EPSILON: f64 = 1e-10;

struct FeatureRow {
    features: [f64; FEATURE_COUNT],
    is_bugfix_file: bool,
}

fn build_matrix(
    metrics: &HashMap<String, FileMetrics>,
    oracle: &HashSet<String>,
    half_life_days: f64,
    until: DateTime<FixedOffset>,
) -> Vec<FeatureRow> {
    let ctx = FileScoreContext::compute(metrics);
    metrics
        .iter()
        .map(|(path, m)| {
            let components = compute_components(m, &ctx, half_life_days, until);
            FeatureRow {
                features: [
                    components.commit,
                    components.churn,
                    components.recency,
                    components.burst,
                    components.ownership,
                    components.bugfix,
                    components.complexity,
                ],
                is_bugfix_file: oracle.contains(path),
            }
        })
        .collect()
}

fn dot(weights: &[f64; FEATURE_COUNT], features: &[f64; FEATURE_COUNT]) -> f64 {
    weights.iter().zip(features.iter()).map(|(w, f)| w * f).sum()
}

/// Score every row by `w · features`, take the top `⌈top_percent·N/100⌉`,
/// and return the recall of bugfix files within that slice.
fn detection_rate(rows: &[FeatureRow], weights: &[f64; FEATURE_COUNT], top_percent: f64) -> f64 {
    let total_bugfix = rows.iter().filter(|r| r.is_bugfix_file).count();
    if total_bugfix == 0 || rows.is_empty() {
        return 0.0;
    }

    let mut scored: Vec<(f64, bool)> = rows
        .iter()
        .map(|r| (dot(weights, &r.features), r.is_bugfix_file))
        .collect();
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    let top_n = ((top_percent * rows.len() as f64) / 100.0).ceil() as usize;
    let top_n = top_n.min(rows.len()).max(0);

    let hits = scored.iter().take(top_n).filter(|(_, is_bf)| *is_bf).count();
    hits as f64 / total_bugfix as f64
}

/// Coordinate-descend `current_weights` toward higher detection rate on the
/// oracle. Guarantees: non-negative weights, monotone-improving recall,
/// deterministic given input. Returns `current_weights` unchanged (not
/// rounded) if no candidate beats it.
pub fn calibrate(
    metrics: &HashMap<String, FileMetrics>,
    oracle: &HashSet<String>,
    current_weights: &FileScoreWeights,
    half_life_days: f64,
    until: DateTime<FixedOffset>,
    top_percent: f64,
) -> FileScoreWeights {
    let top_percent = if top_percent > 0.0 && top_percent <= 100.0 {
        top_percent
    } else {
        20.0
    };

    let rows = build_matrix(metrics, oracle, half_life_days, until);
    let current_array = current_weights.as_array();
    let current_rate = detection_rate(&rows, &current_array, top_percent);

    let mut w = [1.0 / FEATURE_COUNT as f64; FEATURE_COUNT];
    let mut best_rate = detection_rate(&rows, &w, top_percent);
    let mut step = INITIAL_STEP;

    'passes: for _ in 0..MAX_PASSES {
        let mut improved_this_pass = false;

        for i in 0..FEATURE_COUNT {
            for j in 0..FEATURE_COUNT {
                if i == j {
                    continue;
                }
                if w[j] < step {
                    continue;
                }
                let mut candidate = w;
                candidate[i] += step;
                candidate[j] -= step;

                let rate = detection_rate(&rows, &candidate, top_percent);
                if rate > best_rate + IMPROVEMENT_EPSILON {
                    w = candidate;
                    best_rate = rate;
                    improved_this_pass = true;
                }
            }
        }

        if !improved_this_pass {
            if step > MIN_STEP {
                step /= 2.0;
            } else {
                break 'passes;
            }
        }
    }

    if best_rate <= current_rate {
        return *current_weights;
    }

    let rounded: [f64; FEATURE_COUNT] = {
        let mut out = [0.0; FEATURE_COUNT];
        for (i, v) in w.iter().enumerate() {
            out[i] = (v * 100.0).round() / 100.0;
        }
        out
    };
    FileScoreWeights::from_array(rounded)
}
