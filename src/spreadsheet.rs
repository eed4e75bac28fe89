//! Spreadsheet index of filed citations.
//!
//! The index is a CSV workbook with one row per citation and the columns
//! listed in [`RECORD_KEYS`]. Access dates, titles and DOIs are written as
//! `=HYPERLINK(...)` formulas pointing at the date folder, the companion
//! citation text file and the DOI resolver, which spreadsheet applications
//! evaluate on open.

use crate::error::{CitationError, Result};
use crate::{CitationRecord, RECORD_KEYS};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use tracing::info;

/// A record on its way into the spreadsheet.
#[derive(Debug, Clone)]
pub struct FiledCitation {
    pub record: CitationRecord,
    /// File name of the companion citation text file, if one was written
    pub companion_file: Option<String>,
}

/// Append-only handle on the spreadsheet file.
#[derive(Debug)]
pub struct Spreadsheet {
    path: PathBuf,
    rows: usize,
}

impl Spreadsheet {
    /// Opens the spreadsheet at `path`, creating it with the header row if
    /// it does not exist yet or is empty.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::Spreadsheet`] if an existing file cannot be
    /// read or a new one cannot be written.
    pub fn open_or_create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let has_content = std::fs::metadata(&path).is_ok_and(|m| m.is_file() && m.len() > 0);
        if has_content {
            let mut reader = ReaderBuilder::new()
                .has_headers(true)
                .flexible(true)
                .from_path(&path)?;
            let mut rows = 0;
            for record in reader.records() {
                record?;
                rows += 1;
            }
            return Ok(Self { path, rows });
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| CitationError::io(parent, e))?;
        }
        let mut writer = WriterBuilder::new().from_path(&path)?;
        writer.write_record(RECORD_KEYS)?;
        writer.flush().map_err(|e| CitationError::io(&path, e))?;
        info!(path = %path.display(), "created spreadsheet");
        Ok(Self { path, rows: 0 })
    }

    /// Number of data rows below the header.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one row per citation, numbering them after the existing
    /// rows and storing each number in the record. Links resolve relative
    /// to `target_dir`.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::Io`] or [`CitationError::Spreadsheet`] if
    /// the file cannot be written.
    pub fn append(&mut self, citations: &mut [FiledCitation], target_dir: &Path) -> Result<usize> {
        if citations.is_empty() {
            return Ok(0);
        }

        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| CitationError::io(&self.path, e))?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        for citation in citations.iter_mut() {
            self.rows += 1;
            citation.record.serial_number = u32::try_from(self.rows).ok();
            writer.write_record(row_cells(citation, self.rows, target_dir))?;
        }
        writer.flush().map_err(|e| CitationError::io(&self.path, e))?;

        info!(
            path = %self.path.display(),
            count = citations.len(),
            "appended spreadsheet rows"
        );
        Ok(citations.len())
    }
}

/// Builds the cells of one row, in [`RECORD_KEYS`] order.
fn row_cells(citation: &FiledCitation, serial: usize, target_dir: &Path) -> [String; 14] {
    let record = &citation.record;
    let text = |value: &Option<String>| value.clone().unwrap_or_default();

    let date_folder = target_dir.join(&record.access_date);
    let access_date = hyperlink(&date_folder.to_string_lossy(), &record.access_date);

    let title = match (&record.title, &citation.companion_file) {
        (Some(title), Some(file)) => hyperlink(&date_folder.join(file).to_string_lossy(), title),
        (title, _) => text(title),
    };

    let doi = match &record.doi {
        Some(doi) if doi.starts_with("http") => hyperlink(doi, doi),
        other => text(other),
    };

    [
        serial.to_string(),
        record.authors_joined(),
        access_date,
        title,
        text(&record.first_author),
        text(&record.last_author),
        text(&record.publication_date),
        text(&record.journal),
        text(&record.volume),
        text(&record.issue),
        text(&record.pages),
        text(&record.abstract_text),
        doi,
        text(&record.remarks),
    ]
}

/// A `=HYPERLINK("target", "label")` formula with embedded quotes doubled.
pub fn hyperlink(target: &str, label: &str) -> String {
    format!(
        "=HYPERLINK(\"{}\", \"{}\")",
        target.replace('"', "\"\""),
        label.replace('"', "\"\"")
    )
}
