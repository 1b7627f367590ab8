use std::io::BufRead;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::input::{InputError, open_maybe_gz};

const MISSING_TOKENS: &[&str] = &["na", "nan", "null", "none", "n/a"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
    Semicolon,
    Whitespace,
}

impl Delimiter {
    /// Picks the separator from one line: tab, then comma, then semicolon.
    pub fn sniff(line: &str) -> Self {
        if line.contains('\t') {
            Delimiter::Tab
        } else if line.contains(',') {
            Delimiter::Comma
        } else if line.contains(';') {
            Delimiter::Semicolon
        } else {
            Delimiter::Whitespace
        }
    }

    fn split<'a>(self, line: &'a str) -> Vec<&'a str> {
        let cells: Vec<&str> = match self {
            Delimiter::Tab => line.split('\t').collect(),
            Delimiter::Comma => line.split(',').collect(),
            Delimiter::Semicolon => line.split(';').collect(),
            Delimiter::Whitespace => line.split_whitespace().collect(),
        };
        cells
            .into_iter()
            .map(|c| c.trim().trim_matches('"').trim())
            .collect()
    }
}

/// Scores of one table, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreTable {
    pub path: PathBuf,
    pub column: Option<String>,
    pub delimiter: Delimiter,
    pub scores: Vec<f64>,
    pub dropped_rows: usize,
}

impl ScoreTable {
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

pub fn load_score_table(path: &Path) -> Result<ScoreTable, InputError> {
    let reader = open_maybe_gz(path)?;
    parse_score_table(reader, path)
}

/// Parses a delimited score table; `path` is used for error messages only.
pub fn parse_score_table<R: BufRead>(reader: R, path: &Path) -> Result<ScoreTable, InputError> {
    let mut delimiter = None;
    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<(usize, Vec<String>)> = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let raw = line?;
        let line_no = idx + 1;
        let line = if idx == 0 {
            raw.trim_start_matches('\u{feff}')
        } else {
            raw.as_str()
        };
        if line.trim().is_empty() {
            continue;
        }
        let delim = *delimiter.get_or_insert_with(|| Delimiter::sniff(line));
        let cells = delim
            .split(line)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        if rows.is_empty() && header.is_none() && !cells.iter().any(|c| is_numeric(c)) {
            header = Some(cells);
            continue;
        }
        rows.push((line_no, cells));
    }

    let Some(delimiter) = delimiter else {
        return Err(InputError::InvalidInput(format!(
            "score table {} is empty",
            path.display()
        )));
    };
    if rows.is_empty() {
        return Err(InputError::InvalidInput(format!(
            "score table {} has no data rows",
            path.display()
        )));
    }

    let width = rows
        .iter()
        .map(|(_, cells)| cells.len())
        .chain(header.iter().map(Vec::len))
        .max()
        .unwrap_or(0);
    let column = (0..width)
        .find(|&col| {
            rows.iter()
                .any(|(_, cells)| cells.get(col).is_some_and(|c| !is_missing(c)))
        })
        .ok_or_else(|| {
            InputError::InvalidInput(format!(
                "score table {} has no non-empty column",
                path.display()
            ))
        })?;

    let mut scores = Vec::with_capacity(rows.len());
    let mut dropped_rows = 0usize;
    for (line, cells) in &rows {
        let cell = cells.get(column).map(String::as_str).unwrap_or("");
        if is_missing(cell) {
            dropped_rows += 1;
            continue;
        }
        let value = cell.parse::<f64>().map_err(|_| InputError::Parse {
            path: path.to_path_buf(),
            line: *line,
            message: format!("score '{cell}' is not a number"),
        })?;
        scores.push(value);
    }

    if dropped_rows > 0 {
        warn!(
            path = %path.display(),
            dropped_rows,
            "dropped rows with a missing score"
        );
    }
    debug!(
        path = %path.display(),
        rows = scores.len(),
        column,
        ?delimiter,
        "parsed score table"
    );

    Ok(ScoreTable {
        path: path.to_path_buf(),
        column: header.and_then(|h| h.get(column).cloned()),
        delimiter,
        scores,
        dropped_rows,
    })
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty()
        || MISSING_TOKENS
            .iter()
            .any(|token| cell.eq_ignore_ascii_case(token))
}

fn is_numeric(cell: &str) -> bool {
    !is_missing(cell) && cell.parse::<f64>().is_ok()
}
