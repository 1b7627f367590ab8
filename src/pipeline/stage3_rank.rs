use crate::model::curves::{CurveSeries, PrecisionRecallCurve, RocCurve};
use crate::model::errors::DegenerateInputError;
use crate::numeric::{descending_order, midranks, tie_groups};

/// Cumulative confusion counts after admitting each distinct probability, highest first.
#[derive(Debug, Clone)]
struct ThresholdSweep {
    thresholds: Vec<f64>,
    tps: Vec<usize>,
    fps: Vec<usize>,
    n_pos: usize,
    n_neg: usize,
}

fn sweep(
    probabilities: &[f64],
    activity: &[bool],
    metric: &'static str,
) -> Result<ThresholdSweep, DegenerateInputError> {
    if probabilities.len() != activity.len() {
        return Err(DegenerateInputError::new(
            metric,
            format!(
                "{} probabilities for {} labels",
                probabilities.len(),
                activity.len()
            ),
        ));
    }
    let n_pos = activity.iter().filter(|&&a| a).count();
    let n_neg = activity.len() - n_pos;
    if n_pos == 0 {
        return Err(DegenerateInputError::new(metric, "no actives in population"));
    }
    if n_neg == 0 {
        return Err(DegenerateInputError::new(metric, "no decoys in population"));
    }

    let order = descending_order(probabilities);
    let sorted = order.iter().map(|&i| probabilities[i]).collect::<Vec<_>>();

    let mut out = ThresholdSweep {
        thresholds: vec![f64::INFINITY],
        tps: vec![0],
        fps: vec![0],
        n_pos,
        n_neg,
    };
    let mut tp = 0usize;
    let mut fp = 0usize;
    let mut offset = 0usize;
    for group in tie_groups(&sorted) {
        for &idx in &order[offset..offset + group] {
            if activity[idx] {
                tp += 1;
            } else {
                fp += 1;
            }
        }
        out.thresholds.push(sorted[offset]);
        out.tps.push(tp);
        out.fps.push(fp);
        offset += group;
    }
    Ok(out)
}

pub fn roc_curve(
    probabilities: &[f64],
    activity: &[bool],
) -> Result<RocCurve, DegenerateInputError> {
    let s = sweep(probabilities, activity, "roc")?;
    let mut series = CurveSeries::with_capacity(s.thresholds.len());
    for (&tp, &fp) in s.tps.iter().zip(&s.fps) {
        series.push(fp as f64 / s.n_neg as f64, tp as f64 / s.n_pos as f64);
    }
    let auc = trapezoid_auc(&series.x, &series.y);
    let mut roc = RocCurve {
        series,
        thresholds: s.thresholds,
        auc,
        optimal_threshold: None,
    };
    roc.optimal_threshold = optimal_threshold(&roc);
    Ok(roc)
}

pub fn trapezoid_auc(x: &[f64], y: &[f64]) -> f64 {
    let mut area = 0.0;
    for i in 1..x.len().min(y.len()) {
        area += (x[i] - x[i - 1]) * (y[i] + y[i - 1]) / 2.0;
    }
    area
}

/// `U / (n_pos * n_neg)` from midranks; equal to the trapezoidal ROC area.
pub fn mann_whitney_auc(
    probabilities: &[f64],
    activity: &[bool],
) -> Result<f64, DegenerateInputError> {
    let s = sweep(probabilities, activity, "roc")?;
    let ranks = midranks(probabilities);
    let rank_sum = ranks
        .iter()
        .zip(activity)
        .filter(|&(_, &a)| a)
        .map(|(r, _)| r)
        .sum::<f64>();
    let n_pos = s.n_pos as f64;
    let u = rank_sum - n_pos * (n_pos + 1.0) / 2.0;
    Ok(u / (n_pos * s.n_neg as f64))
}

/// Threshold closest to the `fpr + tpr = 1` line.
pub fn optimal_threshold(roc: &RocCurve) -> Option<f64> {
    let mut best: Option<(f64, f64)> = None;
    for ((&fpr, &tpr), &t) in roc.fpr().iter().zip(roc.tpr()).zip(&roc.thresholds) {
        if !t.is_finite() {
            continue;
        }
        let d = (fpr + tpr - 1.0).abs();
        match best {
            Some((best_d, _)) if best_d <= d => {}
            _ => best = Some((d, t)),
        }
    }
    best.map(|(_, t)| t)
}

pub fn precision_recall_curve(
    probabilities: &[f64],
    activity: &[bool],
) -> Result<PrecisionRecallCurve, DegenerateInputError> {
    let s = sweep(probabilities, activity, "precision_recall")?;
    let mut series = CurveSeries::with_capacity(s.thresholds.len());
    for (&tp, &fp) in s.tps.iter().zip(&s.fps) {
        let admitted = tp + fp;
        let precision = if admitted == 0 {
            1.0
        } else {
            tp as f64 / admitted as f64
        };
        series.push(tp as f64 / s.n_pos as f64, precision);
    }
    let average_precision = average_precision(&series.x, &series.y);
    Ok(PrecisionRecallCurve {
        series,
        thresholds: s.thresholds,
        average_precision,
    })
}

/// Step-function area `sum (R_k - R_{k-1}) * P_k` over increasing recall.
pub fn average_precision(recall: &[f64], precision: &[f64]) -> f64 {
    let mut ap = 0.0;
    for i in 1..recall.len().min(precision.len()) {
        ap += (recall[i] - recall[i - 1]) * precision[i];
    }
    ap
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage3_rank.rs"]
mod tests;
