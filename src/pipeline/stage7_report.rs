use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::model::bundle::MetricBundle;
use crate::model::config::MetricsConfig;
use crate::pipeline::stage6_orchestrate::ProgramOutcome;
use crate::report::json::render_summary_json;
use crate::report::text::render_report_text;
use crate::report::{RunSummary, format_f64_6};

pub const ROC_FILE: &str = "roc.tsv";
pub const PC_FILE: &str = "pc.tsv";
pub const PR_FILE: &str = "precision_recall.tsv";
pub const SUMMARY_FILE: &str = "summary.json";
pub const REPORT_FILE: &str = "report.txt";

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialise summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// Writes per-program curve tables plus `summary.json` and `report.txt`.
pub fn write_reports(
    outcomes: &[ProgramOutcome],
    config: &MetricsConfig,
    out_dir: &Path,
) -> Result<RunSummary, ReportError> {
    create_dir(out_dir)?;

    for bundle in outcomes.iter().filter_map(ProgramOutcome::bundle) {
        let dir = out_dir.join(&bundle.program);
        create_dir(&dir)?;
        write_roc_tsv(bundle, &dir.join(ROC_FILE))?;
        write_pc_tsv(bundle, &dir.join(PC_FILE))?;
        write_pr_tsv(bundle, &dir.join(PR_FILE))?;
        debug!(program = %bundle.program, dir = %dir.display(), "wrote curve tables");
    }

    let summary = RunSummary::build(outcomes, config);
    let json = render_summary_json(&summary)?;
    write_text(&out_dir.join(SUMMARY_FILE), &json)?;
    write_text(&out_dir.join(REPORT_FILE), &render_report_text(&summary))?;

    info!(
        out_dir = %out_dir.display(),
        programs = summary.programs.len(),
        "reports written"
    );
    Ok(summary)
}

fn write_roc_tsv(bundle: &MetricBundle, path: &Path) -> Result<(), ReportError> {
    let roc = &bundle.roc;
    write_rows(path, &["threshold", "fpr", "tpr"], |w| {
        for ((&t, &x), &y) in roc.thresholds.iter().zip(roc.fpr()).zip(roc.tpr()) {
            write_row(w, &[t, x, y])?;
        }
        Ok(())
    })
}

fn write_pc_tsv(bundle: &MetricBundle, path: &Path) -> Result<(), ReportError> {
    let pc = &bundle.pc;
    write_rows(
        path,
        &["quantile", "probability", "top_fraction", "enrichment_factor"],
        |w| {
            for (i, (x, y)) in pc.series.points().enumerate() {
                write_row(w, &[x, y, pc.top_fractions[i], pc.enrichment_factors[i]])?;
            }
            Ok(())
        },
    )
}

fn write_pr_tsv(bundle: &MetricBundle, path: &Path) -> Result<(), ReportError> {
    let pr = &bundle.precision_recall;
    write_rows(path, &["threshold", "recall", "precision"], |w| {
        for ((&t, &r), &p) in pr.thresholds.iter().zip(pr.recall()).zip(pr.precision()) {
            write_row(w, &[t, r, p])?;
        }
        Ok(())
    })
}

fn write_rows<F>(path: &Path, header: &[&str], body: F) -> Result<(), ReportError>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let io = |source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io)?);
    writeln!(w, "{}", header.join("\t")).map_err(io)?;
    body(&mut w).map_err(io)?;
    w.flush().map_err(io)
}

fn write_row(w: &mut impl Write, values: &[f64]) -> std::io::Result<()> {
    let row = values
        .iter()
        .map(|&v| format_f64_6(v))
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(w, "{}", row)
}

fn write_text(path: &Path, contents: &str) -> Result<(), ReportError> {
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create_dir(path: &Path) -> Result<(), ReportError> {
    fs::create_dir_all(path).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/stage7_report.rs"]
mod tests;
