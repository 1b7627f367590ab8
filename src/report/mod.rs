use serde::Serialize;

use crate::model::bundle::MetricBundle;
use crate::model::config::MetricsConfig;
use crate::model::curves::EnrichmentPoint;
use crate::pipeline::stage6_orchestrate::ProgramOutcome;

pub mod json;
pub mod text;

pub const TOOL_NAME: &str = env!("CARGO_PKG_NAME");
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramMetrics {
    pub n_samples: usize,
    pub n_actives: usize,
    pub auc: f64,
    pub bedroc: f64,
    pub prevalence: f64,
    pub average_precision: f64,
    pub total_gain: f64,
    pub optimal_threshold: Option<f64>,
    pub selected_quantile: Option<f64>,
    pub partial_total_gain: Option<f64>,
    pub enrichment: Vec<EnrichmentPoint>,
    pub calibration_slope: f64,
    pub calibration_intercept: f64,
    pub calibration_iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramFailure {
    pub metric: Option<&'static str>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProgramStatus {
    Ok(ProgramMetrics),
    Failed(ProgramFailure),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramSummary {
    pub program: String,
    #[serde(flatten)]
    pub status: ProgramStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub tool: &'static str,
    pub version: &'static str,
    pub alpha: f64,
    pub ef_fractions: Vec<f64>,
    pub programs: Vec<ProgramSummary>,
}

impl ProgramMetrics {
    pub fn from_bundle(bundle: &MetricBundle) -> Self {
        Self {
            n_samples: bundle.n_samples,
            n_actives: bundle.n_actives,
            auc: bundle.auc(),
            bedroc: bundle.bedroc_value(),
            prevalence: bundle.prevalence(),
            average_precision: bundle.precision_recall.average_precision,
            total_gain: bundle.pc.total_gain,
            optimal_threshold: bundle.roc.optimal_threshold,
            selected_quantile: bundle.pc.selected_quantile,
            partial_total_gain: bundle.pc.partial_total_gain,
            enrichment: bundle.pc.enrichment_summary.clone(),
            calibration_slope: bundle.calibration.slope,
            calibration_intercept: bundle.calibration.intercept,
            calibration_iterations: bundle.calibration.iterations,
        }
    }
}

impl ProgramSummary {
    pub fn from_outcome(outcome: &ProgramOutcome) -> Self {
        let status = match &outcome.result {
            Ok(bundle) => ProgramStatus::Ok(ProgramMetrics::from_bundle(bundle)),
            Err(err) => ProgramStatus::Failed(ProgramFailure {
                metric: err.metric(),
                message: err.to_string(),
            }),
        };
        Self {
            program: outcome.program.clone(),
            status,
        }
    }

    pub fn metrics(&self) -> Option<&ProgramMetrics> {
        match &self.status {
            ProgramStatus::Ok(m) => Some(m),
            ProgramStatus::Failed(_) => None,
        }
    }
}

impl RunSummary {
    pub fn build(outcomes: &[ProgramOutcome], config: &MetricsConfig) -> Self {
        Self {
            tool: TOOL_NAME,
            version: TOOL_VERSION,
            alpha: config.alpha,
            ef_fractions: config.ef_fractions.clone(),
            programs: outcomes.iter().map(ProgramSummary::from_outcome).collect(),
        }
    }

    /// Successful programs, best first: BEDROC, then AUC, then name.
    pub fn ranking(&self) -> Vec<(&str, &ProgramMetrics)> {
        let mut ranked = self
            .programs
            .iter()
            .filter_map(|p| p.metrics().map(|m| (p.program.as_str(), m)))
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| {
            b.1.bedroc
                .total_cmp(&a.1.bedroc)
                .then_with(|| b.1.auc.total_cmp(&a.1.auc))
                .then_with(|| a.0.cmp(b.0))
        });
        ranked
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &ProgramFailure)> {
        self.programs.iter().filter_map(|p| match &p.status {
            ProgramStatus::Failed(f) => Some((p.program.as_str(), f)),
            ProgramStatus::Ok(_) => None,
        })
    }
}

pub fn format_f64_6(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v == f64::INFINITY {
        "inf".to_string()
    } else if v == f64::NEG_INFINITY {
        "-inf".to_string()
    } else {
        format!("{:.6}", v)
    }
}

pub fn format_opt_f64_6(v: Option<f64>) -> String {
    v.map(format_f64_6).unwrap_or_else(|| "NA".to_string())
}

#[cfg(test)]
#[path = "../../tests/src_inline/report/mod.rs"]
mod tests;
