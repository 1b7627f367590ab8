use crate::model::config::MetricsConfig;
use crate::model::curves::{CurveSeries, EnrichmentPoint, PredictivenessCurve};
use crate::model::errors::DegenerateInputError;
use crate::numeric::{descending_order, tie_groups};

const METRIC: &str = "enrichment_factor";

/// Builds the predictiveness curve and the enrichment factors aligned with it.
///
/// One descending order drives everything: the ascending PC axis is its exact
/// reverse, and point `i` is paired with the selection of itself and every
/// compound above it, so `top_fractions[0] == 1` and `enrichment_factors[0] == 1`.
pub fn predictiveness_curve(
    probabilities: &[f64],
    activity: &[bool],
    config: &MetricsConfig,
) -> Result<PredictivenessCurve, DegenerateInputError> {
    if probabilities.len() != activity.len() {
        return Err(DegenerateInputError::new(
            METRIC,
            format!(
                "{} probabilities for {} labels",
                probabilities.len(),
                activity.len()
            ),
        ));
    }
    let n = probabilities.len();
    let n_actives = activity.iter().filter(|&&a| a).count();
    if n_actives == 0 {
        return Err(DegenerateInputError::new(METRIC, "no actives in population"));
    }
    if n_actives == n {
        return Err(DegenerateInputError::new(
            METRIC,
            "every compound is active; enrichment has no contrast",
        ));
    }

    let order = descending_order(probabilities);
    let ranked = order.iter().map(|&i| probabilities[i]).collect::<Vec<_>>();
    let ranked_activity = order.iter().map(|&i| activity[i]).collect::<Vec<_>>();
    let hits = expected_hits(&ranked, &ranked_activity);

    let nf = n as f64;
    let mut series = CurveSeries::with_capacity(n);
    let mut top_fractions = Vec::with_capacity(n);
    let mut enrichment_factors = Vec::with_capacity(n);
    for i in 1..=n {
        let n_selected = n - i + 1;
        series.push(i as f64 / nf, ranked[n - i]);
        top_fractions.push(n_selected as f64 / nf);
        enrichment_factors.push(ef_from_hits(&hits, n_selected, n_actives, n));
    }

    let prevalence = n_actives as f64 / nf;
    let total_gain = total_gain(&series.y, prevalence);
    let selected_quantile = selected_quantile(&series, config.selected_quantile_cutoff);
    let partial_total_gain =
        selected_quantile.map(|q| partial_total_gain(&series, prevalence, q));

    let enrichment_summary = config
        .ef_fractions
        .iter()
        .map(|&fraction| {
            let n_selected = selected_count(fraction, n);
            EnrichmentPoint {
                fraction,
                n_selected,
                enrichment_factor: ef_from_hits(&hits, n_selected, n_actives, n),
            }
        })
        .collect();

    Ok(PredictivenessCurve {
        series,
        top_fractions,
        enrichment_factors,
        prevalence,
        total_gain,
        selected_quantile,
        partial_total_gain,
        enrichment_summary,
        ranked_activity,
    })
}

/// EF for the top `fraction` of the ranking, `fraction` in (0, 1].
pub fn enrichment_factor(
    pc: &PredictivenessCurve,
    fraction: f64,
) -> Result<f64, DegenerateInputError> {
    if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
        return Err(DegenerateInputError::new(
            METRIC,
            format!("top fraction {fraction} outside (0, 1]"),
        ));
    }
    let n = pc.ranked_activity.len();
    let n_actives = pc.n_actives();
    if n == 0 || n_actives == 0 {
        return Err(DegenerateInputError::new(METRIC, "no actives in population"));
    }
    let ranked = pc.series.y.iter().rev().copied().collect::<Vec<_>>();
    let hits = expected_hits(&ranked, &pc.ranked_activity);
    Ok(ef_from_hits(&hits, selected_count(fraction, n), n_actives, n))
}

/// Smallest compound count that covers `fraction` of `n`, at least one.
pub fn selected_count(fraction: f64, n: usize) -> usize {
    let raw = (fraction * n as f64 - 1e-9).ceil();
    (raw.max(1.0) as usize).min(n)
}

/// Actives expected in the top `k` (index `k`), spreading each tie group's
/// actives evenly over the positions it spans.
fn expected_hits(ranked: &[f64], ranked_activity: &[bool]) -> Vec<f64> {
    let mut hits = Vec::with_capacity(ranked.len() + 1);
    hits.push(0.0);
    let mut start = 0usize;
    for group in tie_groups(ranked) {
        let base = hits[start];
        let actives = ranked_activity[start..start + group]
            .iter()
            .filter(|&&a| a)
            .count();
        for k in 1..=group {
            hits.push(base + (k * actives) as f64 / group as f64);
        }
        start += group;
    }
    hits
}

fn ef_from_hits(hits: &[f64], n_selected: usize, n_actives: usize, n: usize) -> f64 {
    (hits[n_selected] / n_actives as f64) / (n_selected as f64 / n as f64)
}

pub fn total_gain(probabilities: &[f64], prevalence: f64) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    let mean_abs = probabilities
        .iter()
        .map(|p| (p - prevalence).abs())
        .sum::<f64>()
        / probabilities.len() as f64;
    mean_abs / (2.0 * prevalence * (1.0 - prevalence))
}

/// Total gain restricted to the PC points at or beyond `quantile`.
pub fn partial_total_gain(pc: &CurveSeries, prevalence: f64, quantile: f64) -> f64 {
    let tail = pc
        .points()
        .filter(|&(x, _)| x >= quantile)
        .map(|(_, y)| y)
        .collect::<Vec<_>>();
    total_gain(&tail, prevalence)
}

/// First midpoint where the max-scaled PC slope exceeds `cutoff`.
pub fn selected_quantile(pc: &CurveSeries, cutoff: f64) -> Option<f64> {
    if pc.len() < 2 {
        return None;
    }
    let mut mid = Vec::with_capacity(pc.len() - 1);
    let mut slope = Vec::with_capacity(pc.len() - 1);
    for k in 0..pc.len() - 1 {
        let dx = pc.x[k + 1] - pc.x[k];
        mid.push((pc.x[k] + pc.x[k + 1]) / 2.0);
        slope.push((pc.y[k + 1] - pc.y[k]) / dx);
    }
    let max_mid = mid.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let max_slope = slope.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if !(max_slope > 0.0) || !(max_mid > 0.0) {
        return None;
    }
    let idx = slope
        .iter()
        .position(|&s| s / max_slope > cutoff)
        .unwrap_or(0);
    Some(mid[idx] / max_mid)
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage4_enrichment.rs"]
mod tests;
