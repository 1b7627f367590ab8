use serde::Serialize;

use crate::model::curves::{PrecisionRecallCurve, PredictivenessCurve, RocCurve};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibrationSummary {
    pub intercept: f64,
    pub slope: f64,
    pub iterations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BedrocScore {
    pub value: f64,
    pub rie: f64,
    pub rie_min: f64,
    pub rie_max: f64,
    pub alpha: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricBundle {
    pub program: String,
    pub n_samples: usize,
    pub n_actives: usize,
    pub calibration: CalibrationSummary,
    pub roc: RocCurve,
    pub pc: PredictivenessCurve,
    pub precision_recall: PrecisionRecallCurve,
    pub bedroc: BedrocScore,
}

impl MetricBundle {
    pub fn auc(&self) -> f64 {
        self.roc.auc
    }

    pub fn prevalence(&self) -> f64 {
        self.pc.prevalence
    }

    pub fn bedroc_value(&self) -> f64 {
        self.bedroc.value
    }
}
