use crate::report::{ProgramMetrics, RunSummary, format_f64_6, format_opt_f64_6};

pub fn render_report_text(summary: &RunSummary) -> String {
    let mut out = String::new();

    out.push_str("Virtual Screening Performance Report\n");
    out.push_str("====================================\n\n");
    out.push_str(&format!(
        "Tool: {} {}\nBEDROC alpha: {}\nPrograms: {}\n\n",
        summary.tool,
        summary.version,
        format_f64_6(summary.alpha),
        summary.programs.len()
    ));

    let ranking = summary.ranking();
    out.push_str("1. Ranking (BEDROC, then AUC)\n");
    if ranking.is_empty() {
        out.push_str("No program produced metrics.\n");
    }
    for (pos, (name, m)) in ranking.iter().enumerate() {
        out.push_str(&format!(
            "{}. {}: BEDROC={} AUC={} AP={}\n",
            pos + 1,
            name,
            format_f64_6(m.bedroc),
            format_f64_6(m.auc),
            format_f64_6(m.average_precision)
        ));
    }
    out.push('\n');

    out.push_str("2. Per-program detail\n");
    for (name, m) in &ranking {
        out.push_str(&format!("[{}]\n", name));
        render_program(&mut out, m);
        out.push('\n');
    }

    let failures = summary.failures().collect::<Vec<_>>();
    if !failures.is_empty() {
        out.push_str("3. Failed programs\n");
        for (name, f) in failures {
            match f.metric {
                Some(metric) => {
                    out.push_str(&format!("{} ({}): {}\n", name, metric, f.message))
                }
                None => out.push_str(&format!("{}: {}\n", name, f.message)),
            }
        }
    }

    out
}

fn render_program(out: &mut String, m: &ProgramMetrics) {
    out.push_str(&format!(
        "Compounds: {} ({} actives, prevalence {})\n",
        m.n_samples,
        m.n_actives,
        format_f64_6(m.prevalence)
    ));
    out.push_str(&format!(
        "Calibration: slope={} intercept={} ({} iterations)\n",
        format_f64_6(m.calibration_slope),
        format_f64_6(m.calibration_intercept),
        m.calibration_iterations
    ));
    out.push_str(&format!(
        "Optimal threshold: {}\n",
        format_opt_f64_6(m.optimal_threshold)
    ));
    out.push_str(&format!(
        "Total gain: {}, partial total gain: {} (from quantile {})\n",
        format_f64_6(m.total_gain),
        format_opt_f64_6(m.partial_total_gain),
        format_opt_f64_6(m.selected_quantile)
    ));
    let efs = m
        .enrichment
        .iter()
        .map(|p| {
            format!(
                "EF{}%={}",
                format_percent(p.fraction),
                format_f64_6(p.enrichment_factor)
            )
        })
        .collect::<Vec<_>>();
    if !efs.is_empty() {
        out.push_str(&format!("Enrichment: {}\n", efs.join(", ")));
    }
    out.push_str(&format!("{}\n", auc_statement(m.auc)));
}

fn format_percent(fraction: f64) -> String {
    let pct = fraction * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}", pct.round() as i64)
    } else {
        format!("{:.2}", pct)
    }
}

fn auc_statement(auc: f64) -> &'static str {
    if auc >= 0.9 {
        "Conclusion: excellent separation of actives from decoys."
    } else if auc >= 0.7 {
        "Conclusion: useful separation of actives from decoys."
    } else if auc > 0.5 {
        "Conclusion: weak separation; close to random selection."
    } else {
        "Conclusion: no better than random selection."
    }
}
