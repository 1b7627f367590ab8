//! Virtual-screening evaluation: logistic calibration of raw docking scores,
//! ROC / precision-recall / predictiveness curves, enrichment factors and
//! BEDROC for one or many scoring programs.

pub mod input;
pub mod logging;
pub mod model;
pub mod numeric;
pub mod pipeline;
pub mod report;

pub use model::bundle::{BedrocScore, CalibrationSummary, MetricBundle};
pub use model::config::{CalibrationConfig, DEFAULT_ALPHA, MetricsConfig};
pub use model::curves::{
    CurveSeries, EnrichmentPoint, PrecisionRecallCurve, PredictivenessCurve, RocCurve,
};
pub use model::errors::{ComputeError, DataError, DegenerateInputError, FitError};
pub use model::samples::{CalibratedSample, PreparedScores, ProgramScores, ScoreSample};
pub use pipeline::stage1_preprocess::preprocess;
pub use pipeline::stage2_calibrate::{LogisticCalibrator, LogisticModel, calibrate};
pub use pipeline::stage3_rank::{
    average_precision, mann_whitney_auc, optimal_threshold, precision_recall_curve, roc_curve,
    trapezoid_auc,
};
pub use pipeline::stage4_enrichment::{enrichment_factor, predictiveness_curve};
pub use pipeline::stage5_bedroc::bedroc;
pub use pipeline::stage6_orchestrate::{
    ProgramOutcome, compute, compute_programs, compute_with_config,
};
