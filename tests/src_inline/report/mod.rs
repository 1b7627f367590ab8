use super::json::render_summary_json;
use super::text::render_report_text;
use super::*;
use crate::model::errors::{ComputeError, DataError};
use crate::pipeline::stage6_orchestrate::compute_with_config;

fn outcomes() -> Vec<ProgramOutcome> {
    let config = MetricsConfig::default_v1();
    let weak = compute_with_config(
        "weak",
        &[-9.0, -6.0, -8.0],
        &[-8.5, -7.0, -5.0, -9.5],
        &config,
    );
    let perfect = compute_with_config("perfect", &[5.0, 4.0], &[3.0, 2.0, 1.0], &config);
    vec![
        ProgramOutcome {
            program: "weak".to_string(),
            result: weak,
        },
        ProgramOutcome {
            program: "broken".to_string(),
            result: Err(ComputeError::Data(DataError::NoDecoys)),
        },
        ProgramOutcome {
            program: "perfect".to_string(),
            result: perfect,
        },
    ]
}

#[test]
fn test_format_f64_6() {
    assert_eq!(format_f64_6(0.5), "0.500000");
    assert_eq!(format_f64_6(-1.0 / 3.0), "-0.333333");
    assert_eq!(format_f64_6(f64::INFINITY), "inf");
    assert_eq!(format_opt_f64_6(None), "NA");
}

#[test]
fn test_ranking_orders_by_bedroc_then_auc() {
    let summary = RunSummary::build(&outcomes(), &MetricsConfig::default_v1());
    let names = summary
        .ranking()
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["perfect", "weak"]);
    let failures = summary.failures().collect::<Vec<_>>();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "broken");
}

#[test]
fn test_summary_json_shape() {
    let summary = RunSummary::build(&outcomes(), &MetricsConfig::default_v1());
    let json = render_summary_json(&summary).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["tool"], "kira-dockstats");
    assert_eq!(value["alpha"], 20.0);
    let programs = value["programs"].as_array().unwrap();
    assert_eq!(programs.len(), 3);
    assert_eq!(programs[0]["program"], "weak");
    assert_eq!(programs[1]["status"], "failed");
    assert!(programs[1]["message"].as_str().unwrap().contains("decoy"));
    assert_eq!(programs[2]["status"], "ok");
    assert!((programs[2]["auc"].as_f64().unwrap() - 1.0).abs() < 1e-12);
    assert_eq!(programs[2]["enrichment"].as_array().unwrap().len(), 3);
}

#[test]
fn test_report_text_lists_ranking_and_failures() {
    let summary = RunSummary::build(&outcomes(), &MetricsConfig::default_v1());
    let text = render_report_text(&summary);
    let perfect = text.find("1. perfect").unwrap();
    let weak = text.find("2. weak").unwrap();
    assert!(perfect < weak);
    assert!(text.contains("Failed programs"));
    assert!(text.contains("broken"));
    assert!(text.contains("EF5%="));
}
