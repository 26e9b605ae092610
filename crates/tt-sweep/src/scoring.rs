//! Squared-error scoring and best-match selection.

use tracing::{debug, info};
use tt_types::{Measurements, ScoreError, WorkerResult};

/// Sum of squared differences between `result` and every target key.
/// A key the result did not report counts as `0.0`.
pub fn score(result: &WorkerResult, target: &Measurements) -> f64 {
    target
        .iter()
        .map(|(key, expected)| {
            let observed = result.measurements().get(key).copied().unwrap_or(0.0);
            let diff = observed - expected;
            diff * diff
        })
        .sum()
}

/// The result with the lowest score, and that score.
///
/// Ties go to the earliest result in `results`. A NaN score never beats a
/// real one.
pub fn best_result<'a>(
    results: &'a [WorkerResult],
    target: &Measurements,
) -> Result<(&'a WorkerResult, f64), ScoreError> {
    let mut best: Option<(&WorkerResult, f64)> = None;

    for result in results {
        let s = score(result, target);
        debug!(combination = %result.combination, score = s, "scored result");

        let improves = match best {
            None => true,
            Some((_, current)) => s < current || (current.is_nan() && !s.is_nan()),
        };
        if improves {
            best = Some((result, s));
        }
    }

    let (winner, min_score) = best.ok_or(ScoreError::EmptyResults)?;
    info!(
        combination = %winner.combination,
        score = min_score,
        "best result selected"
    );
    Ok((winner, min_score))
}
