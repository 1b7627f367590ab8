use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("no scores left after dropping missing rows")]
    Empty,
    #[error("no active (ligand) scores; at least one active and one decoy are required")]
    NoActives,
    #[error("no decoy scores; at least one active and one decoy are required")]
    NoDecoys,
    #[error("non-finite score {value} at row {index}")]
    NonFinite { index: usize, value: f64 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("insufficient contrast in scores: activity labels contain a single class")]
    SingleClass,
    #[error("scores ({scores}) and activity ({activity}) differ in length")]
    LengthMismatch { scores: usize, activity: usize },
    #[error(
        "insufficient contrast in scores: calibration did not converge after {iterations} iterations (gradient {gradient:e})"
    )]
    NotConverged { iterations: usize, gradient: f64 },
    #[error("insufficient contrast in scores: calibration produced non-finite parameters")]
    NonFinite,
}

/// A metric that cannot be defined for the given population.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{metric} is undefined: {reason}")]
pub struct DegenerateInputError {
    pub metric: &'static str,
    pub reason: String,
}

impl DegenerateInputError {
    pub fn new(metric: &'static str, reason: impl Into<String>) -> Self {
        Self {
            metric,
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ComputeError {
    #[error("data error: {0}")]
    Data(#[from] DataError),
    #[error("fit error: {0}")]
    Fit(#[from] FitError),
    #[error(transparent)]
    Degenerate(#[from] DegenerateInputError),
    #[error("invalid parameter {name}={value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },
}

impl ComputeError {
    pub fn metric(&self) -> Option<&'static str> {
        match self {
            ComputeError::Degenerate(e) => Some(e.metric),
            ComputeError::Fit(_) => Some("calibration"),
            ComputeError::InvalidParameter { name, .. } if *name == "alpha" => Some("bedroc"),
            _ => None,
        }
    }
}
