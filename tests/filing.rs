//! End-to-end filing runs against temporary folders.

use std::fs;
use std::path::Path;

use orlit::{CitationStyle, Pipeline, RecordParser, RunConfig, Stores, file_access_date, render};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

const RIS: &str = "TY  - JOUR
TI  - Deep Learning for Citations
AU  - Smith, John
AU  - Doe, Jane
PY  - 2021
JO  - Journal of Tests
VL  - 12
IS  - 3
SP  - 45-67
DO  - 10.1000/test.2021
ER  -
";

const BIBTEX: &str = "@article{roe2019,
  author = {Roe, Richard and Poe, Paula},
  title = {Filing Things Properly},
  journal = {Archive Science},
  year = {2019},
  doi = {10.5555/fp.2019}
}
";

fn config(source: &Path, target: &Path, data: &Path) -> RunConfig {
    let mut config = RunConfig::new(source, target);
    config.set_data_dir(data).set_style("MLA 9");
    config
}

fn spreadsheet_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect()
}

#[test]
fn test_two_runs_share_spreadsheet_and_cache() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("downloads");
    let target = root.path().join("library");
    let data = root.path().join("state");
    fs::create_dir_all(&source).unwrap();

    fs::write(source.join("smith2021.ris"), RIS).unwrap();
    let mut stores = Stores::load(&data);
    let first = Pipeline::new(config(&source, &target, &data))
        .run(&mut stores)
        .unwrap();
    assert_eq!(first.appended, 1);

    // Same article downloaded again, plus a new one.
    fs::write(source.join("smith2021-copy.ris"), RIS).unwrap();
    fs::write(source.join("roe2019.bib"), BIBTEX).unwrap();
    let mut stores = Stores::load(&data);
    let second = Pipeline::new(config(&source, &target, &data))
        .run(&mut stores)
        .unwrap();

    assert_eq!(second.parsed, 2);
    assert_eq!(second.appended, 1);
    assert_eq!(second.duplicates.len(), 1);

    let rows = spreadsheet_rows(&target.join("Literature Organisation.csv"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][0], "1");
    assert_eq!(rows[1][0], "2");
    assert_eq!(rows[0][1], "Smith John, Doe Jane");
    assert_eq!(rows[1][1], "Roe Richard, Poe Paula");
    assert!(rows[1][3].starts_with("=HYPERLINK("));
    assert!(rows[1][3].contains("roe2019.txt"));

    let reloaded = Stores::load(&data);
    assert_eq!(reloaded.archive.records().len(), 2);
    assert!(reloaded.titles.contains("Deep Learning for Citations"));
    assert!(reloaded.titles.contains("Filing Things Properly"));
    assert_eq!(reloaded.source_history.entries().len(), 1);
}

#[test]
fn test_run_files_pdf_next_to_citation() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("downloads");
    let target = root.path().join("library");
    fs::create_dir_all(&source).unwrap();
    let pdf = root.path().join("smith2021.pdf");
    fs::write(&pdf, b"%PDF-1.4").unwrap();
    let date = file_access_date(&pdf).unwrap();

    let mut config = config(&source, &target, &root.path().join("state"));
    config.add_pdfs([pdf.clone()]);
    let mut stores = Stores::load(config.data_dir());
    let summary = Pipeline::new(config).run(&mut stores).unwrap();

    assert_eq!(summary.pdfs_moved, 1);
    assert!(target.join(date).join("smith2021.pdf").is_file());
    assert!(!pdf.exists());
}

#[test]
fn test_every_style_renders_a_full_record() {
    let record = RecordParser::new().parse_str(RIS, "Jan 02 2024");
    assert_eq!(record.doi.as_deref(), Some("https://doi.org/10.1000/test.2021"));

    for style in CitationStyle::ALL {
        let rendering = render(&record, style);
        assert!(
            rendering.bibliography.contains("Deep Learning for Citations"),
            "{style} bibliography is missing the title: {}",
            rendering.bibliography
        );
        assert_eq!(rendering.in_text.is_empty(), !style.has_in_text());
    }
}
