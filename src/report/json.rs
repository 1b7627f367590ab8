use crate::report::RunSummary;

/// Pretty JSON for `summary.json`. Non-finite numbers become `null`.
pub fn render_summary_json(summary: &RunSummary) -> Result<String, serde_json::Error> {
    let mut out = serde_json::to_string_pretty(summary)?;
    out.push('\n');
    Ok(out)
}
