use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;

use super::*;

fn parse(text: &str) -> Result<ScoreTable, InputError> {
    parse_score_table(Cursor::new(text.as_bytes()), Path::new("scores.csv"))
}

fn write_gz(path: &Path, contents: &str) {
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(contents.as_bytes()).unwrap();
    fs::write(path, enc.finish().unwrap()).unwrap();
}

#[test]
fn test_single_column_without_header() {
    let table = parse("-9.1\n-8.4\n-7.75\n").unwrap();
    assert_eq!(table.scores, vec![-9.1, -8.4, -7.75]);
    assert_eq!(table.column, None);
    assert_eq!(table.dropped_rows, 0);
}

#[test]
fn test_header_and_sniffed_delimiters() {
    let table = parse("score,name\n-9.1,lig1\n-8.4,lig2\n").unwrap();
    assert_eq!(table.delimiter, Delimiter::Comma);
    assert_eq!(table.column.as_deref(), Some("score"));
    assert_eq!(table.scores, vec![-9.1, -8.4]);

    let table = parse("score\tid\n1.5\ta\n2.5\tb\n").unwrap();
    assert_eq!(table.delimiter, Delimiter::Tab);
    assert_eq!(table.scores, vec![1.5, 2.5]);

    let table = parse("score;id\n1.5;a\n").unwrap();
    assert_eq!(table.delimiter, Delimiter::Semicolon);

    let table = parse("  1.0   x\n 2.0  y\n").unwrap();
    assert_eq!(table.delimiter, Delimiter::Whitespace);
    assert_eq!(table.scores, vec![1.0, 2.0]);
}

#[test]
fn test_missing_cells_and_empty_columns() {
    // first column is entirely empty and gets dropped
    let table = parse(",score\n,4.0\n,NA\n,\n,nan\n,3.0\n\n").unwrap();
    assert_eq!(table.column.as_deref(), Some("score"));
    assert_eq!(table.scores, vec![4.0, 3.0]);
    assert_eq!(table.dropped_rows, 3);
}

#[test]
fn test_quoted_cells_and_bom() {
    let table = parse("\u{feff}\"score\"\n\"1.25\"\n").unwrap();
    assert_eq!(table.column.as_deref(), Some("score"));
    assert_eq!(table.scores, vec![1.25]);
}

#[test]
fn test_non_numeric_score_reports_line() {
    match parse("score\n1.0\nabc\n") {
        Err(InputError::Parse { line, message, .. }) => {
            assert_eq!(line, 3);
            assert!(message.contains("abc"));
        }
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn test_empty_tables_are_invalid() {
    assert!(matches!(parse(""), Err(InputError::InvalidInput(_))));
    assert!(matches!(parse("\n\n"), Err(InputError::InvalidInput(_))));
    assert!(matches!(parse("score\n"), Err(InputError::InvalidInput(_))));
    assert!(matches!(
        parse("score\nNA\n\n"),
        Err(InputError::InvalidInput(_))
    ));
}

#[test]
fn test_infinite_scores_pass_through() {
    let table = parse("1.0\ninf\n").unwrap();
    assert!(table.scores[1].is_infinite());
}

#[test]
fn test_load_plain_and_gzip_files() {
    let dir = tempfile::tempdir().unwrap();
    let plain = dir.path().join("ligands.csv");
    let gz = dir.path().join("decoys.csv.gz");
    fs::write(&plain, "score\n-9.0\n-8.0\n").unwrap();
    write_gz(&gz, "score\n-5.0\n-6.5\n-4.0\n");

    let table = load_score_table(&plain).unwrap();
    assert_eq!(table.scores, vec![-9.0, -8.0]);
    let table = load_score_table(&gz).unwrap();
    assert_eq!(table.scores, vec![-5.0, -6.5, -4.0]);

    assert!(matches!(
        load_score_table(&dir.path().join("missing.csv")),
        Err(InputError::Io(_))
    ));
}

#[test]
fn test_program_spec_parsing() {
    let spec = ProgramSpec::parse("vina=lig.csv,dec.csv.gz").unwrap();
    assert_eq!(spec.name, "vina");
    assert_eq!(spec.ligands, Path::new("lig.csv"));
    assert_eq!(spec.decoys, Path::new("dec.csv.gz"));

    for bad in ["vina", "=a,b", "vina=a", "vina=,b", "a/b=x,y", "..=x,y"] {
        assert!(
            matches!(ProgramSpec::parse(bad), Err(InputError::InvalidInput(_))),
            "{bad}"
        );
    }
}

#[test]
fn test_load_programs_builds_scores_and_rejects_duplicates() {
    let dir = tempfile::tempdir().unwrap();
    let lig = dir.path().join("lig.tsv");
    let dec = dir.path().join("dec.tsv");
    fs::write(&lig, "-9.5\n-9.0\n").unwrap();
    fs::write(&dec, "-6.0\n-5.0\n-7.0\n").unwrap();
    let raw = format!("vina={},{}", lig.display(), dec.display());
    let spec = ProgramSpec::parse(&raw).unwrap();

    let programs = load_programs(std::slice::from_ref(&spec)).unwrap();
    assert_eq!(programs[0].name, "vina");
    assert_eq!(programs[0].ligands, vec![-9.5, -9.0]);
    assert_eq!(programs[0].decoys, vec![-6.0, -5.0, -7.0]);

    assert!(matches!(
        load_programs(&[spec.clone(), spec]),
        Err(InputError::InvalidInput(_))
    ));
}
