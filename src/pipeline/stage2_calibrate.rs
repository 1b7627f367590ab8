use tracing::debug;

use crate::model::bundle::CalibrationSummary;
use crate::model::config::CalibrationConfig;
use crate::model::errors::FitError;
use crate::model::samples::{CalibratedSample, ScoreSample};
use crate::numeric::{log1p_exp, logit, sigmoid};

const MAX_STEP_HALVINGS: usize = 40;

/// Fitted `P(active | score) = sigmoid(bias + weight * (score - center) / scale)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogisticModel {
    center: f64,
    scale: f64,
    bias: f64,
    weight: f64,
    iterations: usize,
}

impl LogisticModel {
    pub fn predict(&self, score: f64) -> f64 {
        sigmoid(self.bias + self.weight * ((score - self.center) / self.scale))
    }

    pub fn predict_all(&self, scores: &[f64]) -> Vec<f64> {
        scores.iter().map(|&s| self.predict(s)).collect()
    }

    pub fn slope(&self) -> f64 {
        self.weight / self.scale
    }

    pub fn intercept(&self) -> f64 {
        self.bias - self.weight * self.center / self.scale
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn summary(&self) -> CalibrationSummary {
        CalibrationSummary {
            intercept: self.intercept(),
            slope: self.slope(),
            iterations: self.iterations,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LogisticCalibrator {
    config: CalibrationConfig,
}

#[derive(Debug, Clone, Copy)]
struct Evaluation {
    loss: f64,
    g0: f64,
    g1: f64,
    h00: f64,
    h01: f64,
    h11: f64,
}

impl Evaluation {
    fn gradient_norm(&self) -> f64 {
        self.g0.abs().max(self.g1.abs())
    }
}

impl LogisticCalibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// Unpenalized maximum-likelihood fit by damped Newton iterations on the standardized score.
    pub fn fit(&self, scores: &[f64], activity: &[bool]) -> Result<LogisticModel, FitError> {
        if scores.len() != activity.len() {
            return Err(FitError::LengthMismatch {
                scores: scores.len(),
                activity: activity.len(),
            });
        }
        let n = scores.len();
        let n_pos = activity.iter().filter(|&&a| a).count();
        if n_pos == 0 || n_pos == n {
            return Err(FitError::SingleClass);
        }
        if scores.iter().any(|s| !s.is_finite()) {
            return Err(FitError::NonFinite);
        }

        let nf = n as f64;
        let prevalence = n_pos as f64 / nf;
        let center = scores.iter().sum::<f64>() / nf;
        let variance = scores.iter().map(|s| (s - center).powi(2)).sum::<f64>() / nf;
        let scale = variance.sqrt();

        if !(scale > f64::EPSILON * center.abs().max(1.0)) {
            debug!("constant scores; fitting intercept-only calibration");
            return Ok(LogisticModel {
                center,
                scale: 1.0,
                bias: logit(prevalence),
                weight: 0.0,
                iterations: 0,
            });
        }

        let z = scores
            .iter()
            .map(|s| (s - center) / scale)
            .collect::<Vec<_>>();
        let y = activity
            .iter()
            .map(|&a| if a { 1.0 } else { 0.0 })
            .collect::<Vec<_>>();

        let mut b0 = logit(prevalence);
        let mut b1 = 0.0f64;
        let mut eval = evaluate(&z, &y, b0, b1);

        for iteration in 0..self.config.max_iter {
            if eval.gradient_norm() <= self.config.tol {
                return finish(center, scale, b0, b1, iteration);
            }

            let det = eval.h00 * eval.h11 - eval.h01 * eval.h01;
            let (d0, d1) = if det.is_finite() && det > 1e-300 {
                (
                    (eval.h11 * eval.g0 - eval.h01 * eval.g1) / det,
                    (eval.h00 * eval.g1 - eval.h01 * eval.g0) / det,
                )
            } else {
                (eval.g0, eval.g1)
            };

            let mut t = 1.0;
            let mut accepted = None;
            for _ in 0..MAX_STEP_HALVINGS {
                let c0 = b0 - t * d0;
                let c1 = b1 - t * d1;
                let candidate = evaluate(&z, &y, c0, c1);
                if candidate.loss.is_finite() && candidate.loss <= eval.loss {
                    accepted = Some((c0, c1, candidate));
                    break;
                }
                t *= 0.5;
            }

            let Some((c0, c1, candidate)) = accepted else {
                return Err(FitError::NotConverged {
                    iterations: iteration + 1,
                    gradient: eval.gradient_norm(),
                });
            };
            b0 = c0;
            b1 = c1;
            eval = candidate;
        }

        if eval.gradient_norm() <= self.config.tol {
            return finish(center, scale, b0, b1, self.config.max_iter);
        }
        Err(FitError::NotConverged {
            iterations: self.config.max_iter,
            gradient: eval.gradient_norm(),
        })
    }
}

fn finish(
    center: f64,
    scale: f64,
    bias: f64,
    weight: f64,
    iterations: usize,
) -> Result<LogisticModel, FitError> {
    if !bias.is_finite() || !weight.is_finite() {
        return Err(FitError::NonFinite);
    }
    debug!(iterations, bias, weight, "calibration converged");
    Ok(LogisticModel {
        center,
        scale,
        bias,
        weight,
        iterations,
    })
}

fn evaluate(z: &[f64], y: &[f64], b0: f64, b1: f64) -> Evaluation {
    let mut out = Evaluation {
        loss: 0.0,
        g0: 0.0,
        g1: 0.0,
        h00: 0.0,
        h01: 0.0,
        h11: 0.0,
    };
    for (&zi, &yi) in z.iter().zip(y) {
        let eta = b0 + b1 * zi;
        let p = sigmoid(eta);
        let r = p - yi;
        let w = p * (1.0 - p);
        out.loss += log1p_exp(eta) - yi * eta;
        out.g0 += r;
        out.g1 += r * zi;
        out.h00 += w;
        out.h01 += w * zi;
        out.h11 += w * zi * zi;
    }
    let n = z.len() as f64;
    out.loss /= n;
    out.g0 /= n;
    out.g1 /= n;
    out.h00 /= n;
    out.h01 /= n;
    out.h11 /= n;
    out
}

/// Pairs every sample with its calibrated activity probability.
pub fn calibrate(
    scores: &[f64],
    activity: &[bool],
    config: &CalibrationConfig,
) -> Result<(LogisticModel, Vec<CalibratedSample>), FitError> {
    let model = LogisticCalibrator::new(*config).fit(scores, activity)?;
    let samples = scores
        .iter()
        .zip(activity)
        .map(|(&score, &active)| CalibratedSample {
            sample: ScoreSample { score, active },
            probability: model.predict(score),
        })
        .collect();
    Ok((model, samples))
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage2_calibrate.rs"]
mod tests;
