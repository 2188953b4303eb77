//! Shared plumbing for every subcommand: turning [`HistoryArgs`] into a
//! configured reader, running it, and building the derived metric sets
//! every analysis needs.

use std::collections::HashMap;

use anyhow::Result;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone};

use crate::aggregate::{commit_metrics, FileAggregator};
use crate::bugfix::BugfixDetector;
use crate::burst::burst_score;
use crate::cli::HistoryArgs;
use crate::config::RiskConfig;
use crate::model::{CommitChangeSet, CommitMetrics, FileMetrics};
use crate::reader::git2_reader::Git2Reader;
use crate::reader::{DetailLevel, HistoryReader, NeverCancel, ReaderOptions, RenameMode};

fn day_bound(date: NaiveDate, end_of_day: bool) -> DateTime<FixedOffset> {
    let time = if end_of_day {
        chrono::NaiveTime::from_hms_opt(23, 59, 59).unwrap()
    } else {
        chrono::NaiveTime::from_hms_opt(0, 0, 0).unwrap()
    };
    let naive = date.and_time(time);
    FixedOffset::east_opt(0).unwrap().from_utc_datetime(&naive)
}

/// `--branch` wins when given; otherwise fall back to `config.default_branch`
/// unless it is the `"HEAD"` sentinel, which already means "whatever the
/// repository's current head is" via an empty revision string.
fn effective_branch(history: &HistoryArgs, config: &RiskConfig) -> String {
    if !history.branch.is_empty() {
        history.branch.clone()
    } else if config.default_branch != "HEAD" {
        config.default_branch.clone()
    } else {
        String::new()
    }
}

pub fn reader_options(history: &HistoryArgs, config: &RiskConfig) -> ReaderOptions {
    ReaderOptions {
        repo_path: history.path.clone(),
        revision: effective_branch(history, config),
        since: history.since.map(|d| day_bound(d, false)),
        until: history.until.map(|d| day_bound(d, true)),
        include: history.include.clone(),
        exclude: history.exclude.clone(),
        detail: DetailLevel::Full,
        rename_mode: RenameMode::Similarity,
        similarity_threshold: 50,
    }
}

/// The scoring reference point for recency/time-window calculations: the
/// explicit `--until` bound when given, else the current time.
pub fn effective_until(history: &HistoryArgs) -> DateTime<FixedOffset> {
    history
        .until
        .map(|d| day_bound(d, true))
        .unwrap_or_else(|| Local::now().with_timezone(&FixedOffset::east_opt(0).unwrap()))
}

pub fn read_history(history: &HistoryArgs, config: &RiskConfig) -> Result<Vec<CommitChangeSet>> {
    let options = reader_options(history, config);
    let reader = Git2Reader::new(options)?;
    log::info!("reading history from {}", history.path);
    let change_sets = reader.read_changes(&NeverCancel)?;
    log::info!("read {} commits", change_sets.len());
    Ok(change_sets)
}

/// The full set of derived inputs every file/commit analysis is built
/// from: per-file metrics (with bugfix counts folded in), per-commit
/// metrics, and the raw change-set stream (needed by coupling/legacy,
/// which don't go through C7).
pub struct HistoryBundle {
    pub change_sets: Vec<CommitChangeSet>,
    pub file_metrics: HashMap<String, FileMetrics>,
    pub commit_metrics: Vec<CommitMetrics>,
}

pub fn build_bundle(config: &RiskConfig, history: &HistoryArgs, track_times: bool) -> Result<HistoryBundle> {
    let change_sets = read_history(history, config)?;
    let detector = BugfixDetector::new(&config.bugfix_patterns)?;

    // C7 (file aggregation) and C8 (commit metrics) are independent folds
    // over the same buffered slice; run them on separate threads (§5).
    let (file_metrics, commit_metrics) = rayon::join(
        || {
            let mut aggregator = FileAggregator::new(track_times);
            for cs in &change_sets {
                aggregator.ingest(cs);
            }
            let aliases = aggregator.aliases().clone();
            let mut file_metrics = aggregator.process(&[]);

            let detection = detector.detect(&change_sets);
            FileAggregator::apply_bugfix_counts(&mut file_metrics, &aliases, &detection.file_bugfix_counts);

            if track_times {
                for metrics in file_metrics.values_mut() {
                    if let Some(times) = metrics.commit_times.as_deref() {
                        metrics.burst_score = burst_score(times, config.burst_window_days);
                    }
                }
            }
            file_metrics
        },
        || commit_metrics::compute_all(&change_sets),
    );

    let mut file_metrics = file_metrics;
    populate_file_sizes(history, config, &mut file_metrics);

    Ok(HistoryBundle {
        change_sets,
        file_metrics,
        commit_metrics,
    })
}

/// Fill in `file_size` (the complexity proxy, §4.8) from the line count of
/// the blob at the tip of the walked revision. Best-effort: a file present in history
/// but absent from the tip tree (deleted, or behind a rename the tip
/// doesn't know under this key) is left at its zero default rather than
/// failing the whole analysis.
fn populate_file_sizes(history: &HistoryArgs, config: &RiskConfig, file_metrics: &mut HashMap<String, FileMetrics>) {
    let Ok(repo) = git2::Repository::discover(&history.path) else {
        return;
    };
    let branch = effective_branch(history, config);
    let tip = if branch.is_empty() {
        repo.head().ok().and_then(|h| h.peel_to_commit().ok())
    } else {
        repo.revparse_single(&branch)
            .ok()
            .and_then(|o| o.peel_to_commit().ok())
    };
    let Some(tree) = tip.and_then(|c| c.tree().ok()) else {
        return;
    };

    for (path, metrics) in file_metrics.iter_mut() {
        if let Ok(entry) = tree.get_path(std::path::Path::new(path)) {
            if let Ok(blob) = repo.find_blob(entry.id()) {
                // §3: `file_size` is a line count, not a byte length.
                metrics.file_size = blob.content().iter().filter(|&&b| b == b'\n').count() as u64;
            }
        }
    }
}
