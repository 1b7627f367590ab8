use crate::model::bundle::BedrocScore;
use crate::model::config::validate_alpha;
use crate::model::errors::{ComputeError, DegenerateInputError};
use crate::numeric::{clip01, descending_order, tie_groups};

const METRIC: &str = "bedroc";

/// Truchon–Bayley BEDROC over the descending probability ranking.
///
/// Rank positions run 1..=N with the most confident compound at 1, so a
/// ranking with every active on top scores exactly `RIE_max`. Actives inside a
/// tie group take the mean weight of the positions the group spans.
pub fn bedroc(
    activity: &[bool],
    probabilities: &[f64],
    alpha: f64,
) -> Result<BedrocScore, ComputeError> {
    validate_alpha(alpha)?;
    if probabilities.len() != activity.len() {
        return Err(DegenerateInputError::new(
            METRIC,
            format!(
                "{} probabilities for {} labels",
                probabilities.len(),
                activity.len()
            ),
        )
        .into());
    }
    let n = activity.len();
    let n_actives = activity.iter().filter(|&&a| a).count();
    if n_actives == 0 {
        return Err(DegenerateInputError::new(METRIC, "no actives in population").into());
    }
    if n_actives == n {
        return Err(DegenerateInputError::new(METRIC, "every compound is active").into());
    }

    let nf = n as f64;
    let ra = n_actives as f64 / nf;

    let order = descending_order(probabilities);
    let ranked = order.iter().map(|&i| probabilities[i]).collect::<Vec<_>>();
    let mut s = 0.0;
    let mut start = 0usize;
    for group in tie_groups(&ranked) {
        let actives = order[start..start + group]
            .iter()
            .filter(|&&idx| activity[idx])
            .count();
        if actives > 0 {
            let weight = (start + 1..=start + group)
                .map(|r| (-alpha * r as f64 / nf).exp())
                .sum::<f64>()
                / group as f64;
            s += actives as f64 * weight;
        }
        start += group;
    }

    let one_minus_exp_neg_alpha = -(-alpha).exp_m1();
    let rand_sum = ra * one_minus_exp_neg_alpha / (alpha / nf).exp_m1();
    let rie = s / rand_sum;

    let rie_max = -(-alpha * ra).exp_m1() / (ra * one_minus_exp_neg_alpha);
    let rie_min = rie_max * (-alpha * (1.0 - ra)).exp();

    let value = if alpha * ra < 1.0 {
        (rie - rie_min) / (rie_max * -(-alpha * (1.0 - ra)).exp_m1())
    } else {
        let half = alpha / 2.0;
        let factor = ra * half.sinh() / (half.cosh() - (half - alpha * ra).cosh());
        rie * factor + 1.0 / (1.0 - (alpha * (1.0 - ra)).exp())
    };

    if !value.is_finite() {
        return Err(DegenerateInputError::new(
            METRIC,
            format!("non-finite result for alpha={alpha}, N={n}"),
        )
        .into());
    }

    Ok(BedrocScore {
        value: clip01(value),
        rie,
        rie_min,
        rie_max,
        alpha,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage5_bedroc.rs"]
mod tests;
