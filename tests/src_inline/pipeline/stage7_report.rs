use super::*;
use crate::model::errors::{ComputeError, DataError};
use crate::pipeline::stage6_orchestrate::compute_with_config;

fn outcomes(config: &MetricsConfig) -> Vec<ProgramOutcome> {
    vec![
        ProgramOutcome {
            program: "vina".to_string(),
            result: compute_with_config("vina", &[5.0, 4.0], &[3.0, 2.0, 1.0], config),
        },
        ProgramOutcome {
            program: "empty".to_string(),
            result: Err(ComputeError::Data(DataError::NoActives)),
        },
    ]
}

#[test]
fn test_write_reports_produces_documented_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = MetricsConfig::default_v1();
    let summary = write_reports(&outcomes(&config), &config, dir.path()).unwrap();
    assert_eq!(summary.programs.len(), 2);

    for name in [ROC_FILE, PC_FILE, PR_FILE] {
        assert!(dir.path().join("vina").join(name).is_file(), "{name}");
    }
    assert!(!dir.path().join("empty").exists());
    assert!(dir.path().join(SUMMARY_FILE).is_file());
    assert!(dir.path().join(REPORT_FILE).is_file());
}

#[test]
fn test_curve_tables_content() {
    let dir = tempfile::tempdir().unwrap();
    let config = MetricsConfig::default_v1();
    write_reports(&outcomes(&config), &config, dir.path()).unwrap();

    let roc = fs::read_to_string(dir.path().join("vina").join(ROC_FILE)).unwrap();
    let mut lines = roc.lines();
    assert_eq!(lines.next(), Some("threshold\tfpr\ttpr"));
    assert_eq!(lines.next(), Some("inf\t0.000000\t0.000000"));
    assert!(roc.trim_end().ends_with("\t1.000000\t1.000000"));

    let pc = fs::read_to_string(dir.path().join("vina").join(PC_FILE)).unwrap();
    let rows = pc.lines().collect::<Vec<_>>();
    assert_eq!(
        rows[0],
        "quantile\tprobability\ttop_fraction\tenrichment_factor"
    );
    assert_eq!(rows.len(), 6);
    assert!(rows[1].starts_with("0.200000\t"));
    assert!(rows[1].ends_with("\t1.000000\t1.000000"));
    assert!(rows[4].ends_with("\t0.400000\t2.500000"));

    let pr = fs::read_to_string(dir.path().join("vina").join(PR_FILE)).unwrap();
    let mut lines = pr.lines();
    assert_eq!(lines.next(), Some("threshold\trecall\tprecision"));
    assert_eq!(lines.next(), Some("inf\t0.000000\t1.000000"));
}

#[test]
fn test_summary_json_records_failures() {
    let dir = tempfile::tempdir().unwrap();
    let config = MetricsConfig::default_v1();
    write_reports(&outcomes(&config), &config, dir.path()).unwrap();
    let raw = fs::read_to_string(dir.path().join(SUMMARY_FILE)).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["programs"][0]["status"], "ok");
    assert_eq!(value["programs"][1]["status"], "failed");
    assert_eq!(value["programs"][1]["program"], "empty");
}

#[test]
fn test_unwritable_output_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, "x").unwrap();
    let config = MetricsConfig::default_v1();
    let err = write_reports(&outcomes(&config), &config, &blocker.join("out")).unwrap_err();
    assert!(matches!(err, ReportError::Io { .. }));
}
