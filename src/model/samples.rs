use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreSample {
    pub score: f64,
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalibratedSample {
    pub sample: ScoreSample,
    pub probability: f64,
}

/// Raw ligand and decoy scores of one program, exactly as the caller supplied them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgramScores {
    pub name: String,
    pub ligands: Vec<f64>,
    pub decoys: Vec<f64>,
}

impl ProgramScores {
    pub fn new(name: impl Into<String>, ligands: Vec<f64>, decoys: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            ligands,
            decoys,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.ligands.len() + self.decoys.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreparedScores {
    pub scores: Vec<f64>,
    pub activity: Vec<bool>,
}

impl PreparedScores {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn n_actives(&self) -> usize {
        self.activity.iter().filter(|&&a| a).count()
    }

    pub fn samples(&self) -> impl Iterator<Item = ScoreSample> + '_ {
        self.scores
            .iter()
            .zip(&self.activity)
            .map(|(&score, &active)| ScoreSample { score, active })
    }
}
