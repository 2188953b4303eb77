//! Shannon entropy calculator (C2): normalized entropy of a commit's
//! per-file churn distribution.

use crate::model::FileChange;

/// Normalized Shannon entropy of `changes`' churn distribution, in `[0, 1]`.
///
/// - 0 or 1 changes → `0.0`.
/// - total churn `0` → `1.0` (uniform by convention).
/// - otherwise `H = -Σ pᵢ·log2(pᵢ)` normalized by `log2(n)`, clamped.
///
/// Permutation-invariant and scale-invariant: multiplying every churn value
/// by a positive constant does not change the result.
pub fn change_entropy(changes: &[FileChange]) -> f64 {
    if changes.len() <= 1 {
        return 0.0;
    }

    let total: u64 = changes.iter().map(|c| c.churn()).sum();
    if total == 0 {
        return 1.0;
    }

    let total = total as f64;
    let h: f64 = changes
        .iter()
        .filter_map(|c| {
            let churn = c.churn();
            if churn == 0 {
                return None;
            }
            let p = churn as f64 / total;
            Some(-p * p.log2())
        })
        .sum();

    let n = changes.len() as f64;
    crate::normalize::clamp(h / n.log2())
}
