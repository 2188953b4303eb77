//! Burst calculator (C3): sliding-window density of a file's commit
//! timestamps.

use chrono::{DateTime, Duration, FixedOffset};

use crate::normalize::clamp;

fn is_ascending(times: &[DateTime<FixedOffset>]) -> bool {
    times.windows(2).all(|w| w[0] <= w[1])
}

fn is_descending(times: &[DateTime<FixedOffset>]) -> bool {
    times.windows(2).all(|w| w[0] >= w[1])
}

/// Fraction of `times` falling within the densest `window_days`-wide sliding
/// window, in `[0, 1]`. Never mutates `times`; sorts a private copy only
/// when the input is neither ascending nor descending.
///
/// - `n == 0` → `0.0`; `n == 1` → `1.0`.
/// - Otherwise O(n) after an O(n log n) sort, paid only when unsorted.
pub fn burst_score(times: &[DateTime<FixedOffset>], window_days: f64) -> f64 {
    let n = times.len();
    if n == 0 {
        return 0.0;
    }
    if n == 1 {
        return 1.0;
    }

    let mut sorted: Vec<DateTime<FixedOffset>>;
    if is_ascending(times) {
        sorted = times.to_vec();
    } else if is_descending(times) {
        sorted = times.to_vec();
        sorted.reverse();
    } else {
        sorted = times.to_vec();
        sorted.sort();
    }

    let window_ms = (window_days.max(0.0) * 24.0 * 3_600_000.0).round() as i64;
    let window = Duration::milliseconds(window_ms);

    let mut left = 0usize;
    let mut max_population = 1usize;
    for right in 0..sorted.len() {
        while sorted[right] - sorted[left] > window {
            left += 1;
        }
        let population = right - left + 1;
        if population > max_population {
            max_population = population;
        }
    }

    clamp(max_population as f64 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn dt(day: i64) -> DateTime<FixedOffset> {
        let offset = FixedOffset::east_opt(0).unwrap();
        offset
            .timestamp_opt(1_700_000_000 + day * 86_400, 0)
            .unwrap()
    }

    #[test]
    fn empty_is_zero() {
        assert_eq!(burst_score(&[], 7.0), 0.0);
    }

    #[test]
    fn single_commit_is_one() {
        assert_eq!(burst_score(&[dt(0)], 7.0), 1.0);
    }

    #[test]
    fn saturation_five_commits_one_day_apart_window_seven() {
        let times: Vec<_> = (0..5).map(dt).collect();
        assert_eq!(burst_score(&times, 7.0), 1.0);
    }

    #[test]
    fn spread_out_commits_are_not_bursty() {
        let times: Vec<_> = (0..5).map(|i| dt(i * 100)).collect();
        let score = burst_score(&times, 7.0);
        assert!(score < 0.5);
    }

    #[test]
    fn output_independent_of_input_order() {
        let ascending: Vec<_> = (0..6).map(dt).collect();
        let mut descending = ascending.clone();
        descending.reverse();
        let mut shuffled = ascending.clone();
        shuffled.swap(0, 3);
        shuffled.swap(1, 5);

        let a = burst_score(&ascending, 3.0);
        let d = burst_score(&descending, 3.0);
        let s = burst_score(&shuffled, 3.0);
        assert_eq!(a, d);
        assert_eq!(a, s);
    }

    #[test]
    fn input_not_mutated() {
        let mut descending: Vec<_> = (0..4).map(dt).collect();
        descending.reverse();
        let before = descending.clone();
        let _ = burst_score(&descending, 2.0);
        assert_eq!(descending, before);
    }
}
