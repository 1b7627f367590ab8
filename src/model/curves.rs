use serde::Serialize;

/// Parallel plotting arrays; auxiliary per-point values live on the owning curve.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CurveSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl CurveSeries {
    pub fn with_capacity(n: usize) -> Self {
        Self {
            x: Vec::with_capacity(n),
            y: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, x: f64, y: f64) {
        self.x.push(x);
        self.y.push(y);
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocCurve {
    pub series: CurveSeries,
    /// Descending; the first entry is `+inf` (nothing admitted).
    pub thresholds: Vec<f64>,
    pub auc: f64,
    pub optimal_threshold: Option<f64>,
}

impl RocCurve {
    pub fn fpr(&self) -> &[f64] {
        &self.series.x
    }

    pub fn tpr(&self) -> &[f64] {
        &self.series.y
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrecisionRecallCurve {
    pub series: CurveSeries,
    pub thresholds: Vec<f64>,
    pub average_precision: f64,
}

impl PrecisionRecallCurve {
    pub fn recall(&self) -> &[f64] {
        &self.series.x
    }

    pub fn precision(&self) -> &[f64] {
        &self.series.y
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnrichmentPoint {
    pub fraction: f64,
    pub n_selected: usize,
    pub enrichment_factor: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictivenessCurve {
    /// x = i/N, y = calibrated probabilities in ascending order.
    pub series: CurveSeries,
    /// Fraction of the population at or above point i: (N - i + 1)/N.
    pub top_fractions: Vec<f64>,
    pub enrichment_factors: Vec<f64>,
    pub prevalence: f64,
    pub total_gain: f64,
    pub selected_quantile: Option<f64>,
    pub partial_total_gain: Option<f64>,
    pub enrichment_summary: Vec<EnrichmentPoint>,
    /// Activity labels in descending probability order.
    #[serde(skip)]
    pub ranked_activity: Vec<bool>,
}

impl PredictivenessCurve {
    pub fn quantiles(&self) -> &[f64] {
        &self.series.x
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.series.y
    }

    pub fn n_actives(&self) -> usize {
        self.ranked_activity.iter().filter(|&&a| a).count()
    }
}
