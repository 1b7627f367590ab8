use std::collections::BTreeSet;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::model::samples::ProgramScores;

pub mod reader;
pub mod table;

pub use reader::open_maybe_gz;
pub use table::{Delimiter, ScoreTable, load_score_table, parse_score_table};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error at {}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// One `--program NAME=LIGANDS,DECOYS` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramSpec {
    pub name: String,
    pub ligands: PathBuf,
    pub decoys: PathBuf,
}

impl ProgramSpec {
    pub fn parse(raw: &str) -> Result<Self, InputError> {
        let (name, paths) = raw.split_once('=').ok_or_else(|| {
            InputError::InvalidInput(format!("program '{raw}' is not NAME=LIGANDS,DECOYS"))
        })?;
        let name = name.trim();
        if name.is_empty() {
            return Err(InputError::InvalidInput(format!(
                "program '{raw}' has an empty name"
            )));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(InputError::InvalidInput(format!(
                "program name '{name}' cannot be used as a directory name"
            )));
        }
        let (ligands, decoys) = paths.split_once(',').ok_or_else(|| {
            InputError::InvalidInput(format!(
                "program '{name}' needs two score files separated by ','"
            ))
        })?;
        let (ligands, decoys) = (ligands.trim(), decoys.trim());
        if ligands.is_empty() || decoys.is_empty() {
            return Err(InputError::InvalidInput(format!(
                "program '{name}' has an empty score file path"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            ligands: PathBuf::from(ligands),
            decoys: PathBuf::from(decoys),
        })
    }

    pub fn load(&self) -> Result<ProgramScores, InputError> {
        let ligands = load_score_table(&self.ligands)?;
        let decoys = load_score_table(&self.decoys)?;
        info!(
            program = %self.name,
            ligands = ligands.len(),
            decoys = decoys.len(),
            "loaded score tables"
        );
        Ok(ProgramScores::new(
            self.name.clone(),
            ligands.scores,
            decoys.scores,
        ))
    }
}

pub fn load_programs(specs: &[ProgramSpec]) -> Result<Vec<ProgramScores>, InputError> {
    let mut seen = BTreeSet::new();
    for spec in specs {
        if !seen.insert(spec.name.as_str()) {
            return Err(InputError::InvalidInput(format!(
                "program '{}' given more than once",
                spec.name
            )));
        }
    }
    specs.iter().map(ProgramSpec::load).collect()
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/tests.rs"]
mod tests;
