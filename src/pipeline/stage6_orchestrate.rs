use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::model::bundle::MetricBundle;
use crate::model::config::MetricsConfig;
use crate::model::errors::ComputeError;
use crate::model::samples::ProgramScores;
use crate::pipeline::stage1_preprocess::preprocess;
use crate::pipeline::stage2_calibrate::LogisticCalibrator;
use crate::pipeline::stage3_rank::{precision_recall_curve, roc_curve};
use crate::pipeline::stage4_enrichment::predictiveness_curve;
use crate::pipeline::stage5_bedroc::bedroc;

pub const UNNAMED_PROGRAM: &str = "program";

/// Computes every curve and scalar metric for one ligand/decoy score pair.
pub fn compute(
    ligand_scores: &[f64],
    decoy_scores: &[f64],
    alpha: f64,
) -> Result<MetricBundle, ComputeError> {
    compute_with_config(
        UNNAMED_PROGRAM,
        ligand_scores,
        decoy_scores,
        &MetricsConfig::with_alpha(alpha),
    )
}

pub fn compute_with_config(
    program: &str,
    ligand_scores: &[f64],
    decoy_scores: &[f64],
    config: &MetricsConfig,
) -> Result<MetricBundle, ComputeError> {
    let _span = info_span!("compute", program = %program).entered();
    config.validate()?;

    let prepared = preprocess(ligand_scores, decoy_scores)?;
    let n_actives = prepared.n_actives();
    debug!(
        n_samples = prepared.len(),
        n_actives, "preprocessed score tables"
    );

    let model = LogisticCalibrator::new(config.calibration).fit(&prepared.scores, &prepared.activity)?;
    let probabilities = model.predict_all(&prepared.scores);
    debug!(
        slope = model.slope(),
        intercept = model.intercept(),
        iterations = model.iterations(),
        "calibrated scores"
    );

    let roc = roc_curve(&probabilities, &prepared.activity)?;
    let precision_recall = precision_recall_curve(&probabilities, &prepared.activity)?;
    let pc = predictiveness_curve(&probabilities, &prepared.activity, config)?;
    let bedroc = bedroc(&prepared.activity, &probabilities, config.alpha)?;

    info!(
        auc = roc.auc,
        bedroc = bedroc.value,
        prevalence = pc.prevalence,
        "metrics computed"
    );

    Ok(MetricBundle {
        program: program.to_string(),
        n_samples: prepared.len(),
        n_actives,
        calibration: model.summary(),
        roc,
        pc,
        precision_recall,
        bedroc,
    })
}

#[derive(Debug, Clone)]
pub struct ProgramOutcome {
    pub program: String,
    pub result: Result<MetricBundle, ComputeError>,
}

impl ProgramOutcome {
    pub fn bundle(&self) -> Option<&MetricBundle> {
        self.result.as_ref().ok()
    }
}

/// Evaluates independent programs in parallel; outcomes keep input order.
pub fn compute_programs(programs: &[ProgramScores], config: &MetricsConfig) -> Vec<ProgramOutcome> {
    programs
        .par_iter()
        .map(|p| {
            let result = compute_with_config(&p.name, &p.ligands, &p.decoys, config);
            if let Err(err) = &result {
                warn!(program = %p.name, metric = err.metric().unwrap_or("input"), "{err}");
            }
            ProgramOutcome {
                program: p.name.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage6_orchestrate.rs"]
mod tests;
