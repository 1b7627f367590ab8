use tracing::warn;

use crate::model::errors::DataError;
use crate::model::samples::PreparedScores;

/// Merges ligand (active) and decoy scores into parallel score/label arrays.
///
/// `NaN` marks a missing score and drops the row; infinities are rejected.
pub fn preprocess(ligands: &[f64], decoys: &[f64]) -> Result<PreparedScores, DataError> {
    let n_rows = ligands.len() + decoys.len();
    let mut scores = Vec::with_capacity(n_rows);
    let mut activity = Vec::with_capacity(n_rows);
    let mut dropped = 0usize;

    let rows = ligands
        .iter()
        .map(|&s| (s, true))
        .chain(decoys.iter().map(|&s| (s, false)));
    for (index, (score, active)) in rows.enumerate() {
        if score.is_nan() {
            dropped += 1;
            continue;
        }
        if score.is_infinite() {
            return Err(DataError::NonFinite {
                index,
                value: score,
            });
        }
        scores.push(score);
        activity.push(active);
    }

    if dropped > 0 {
        warn!(dropped, kept = scores.len(), "dropped rows with missing scores");
    }

    if scores.is_empty() {
        return Err(DataError::Empty);
    }
    let n_actives = activity.iter().filter(|&&a| a).count();
    if n_actives == 0 {
        return Err(DataError::NoActives);
    }
    if n_actives == activity.len() {
        return Err(DataError::NoDecoys);
    }

    Ok(PreparedScores { scores, activity })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage1_preprocess.rs"]
mod tests;
