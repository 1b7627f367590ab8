use serde::{Deserialize, Serialize};

use crate::model::errors::ComputeError;

pub const DEFAULT_ALPHA: f64 = 20.0;
pub const MAX_ALPHA: f64 = 700.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub max_iter: usize,
    pub tol: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            max_iter: 100,
            tol: 1e-4,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub alpha: f64,
    pub calibration: CalibrationConfig,
    pub ef_fractions: Vec<f64>,
    pub selected_quantile_cutoff: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self::default_v1()
    }
}

impl MetricsConfig {
    pub fn default_v1() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
            calibration: CalibrationConfig::default(),
            ef_fractions: vec![0.01, 0.05, 0.10],
            selected_quantile_cutoff: 0.34,
        }
    }

    pub fn with_alpha(alpha: f64) -> Self {
        let mut base = Self::default_v1();
        base.alpha = alpha;
        base
    }

    pub fn validate(&self) -> Result<(), ComputeError> {
        validate_alpha(self.alpha)?;
        if self.calibration.max_iter == 0 {
            return Err(ComputeError::InvalidParameter {
                name: "calibration.max_iter",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if !(self.calibration.tol.is_finite() && self.calibration.tol > 0.0) {
            return Err(ComputeError::InvalidParameter {
                name: "calibration.tol",
                value: self.calibration.tol,
                reason: "must be finite and positive",
            });
        }
        for &p in &self.ef_fractions {
            if !(p.is_finite() && p > 0.0 && p <= 1.0) {
                return Err(ComputeError::InvalidParameter {
                    name: "ef_fractions",
                    value: p,
                    reason: "fractions must lie in (0, 1]",
                });
            }
        }
        if !self.selected_quantile_cutoff.is_finite() {
            return Err(ComputeError::InvalidParameter {
                name: "selected_quantile_cutoff",
                value: self.selected_quantile_cutoff,
                reason: "must be finite",
            });
        }
        Ok(())
    }
}

pub fn validate_alpha(alpha: f64) -> Result<(), ComputeError> {
    if !alpha.is_finite() || alpha <= 0.0 || alpha > MAX_ALPHA {
        return Err(ComputeError::InvalidParameter {
            name: "alpha",
            value: alpha,
            reason: "must be finite and in (0, 700]",
        });
    }
    Ok(())
}
