//! A library for filing citation exports and rendering formatted references.
//!
//! `orlit` picks up citation export files (RIS, PubMed/NBIB, EndNote tagged,
//! BibTeX), extracts a fixed set of bibliographic fields from each one,
//! renders the result in a chosen citation style, and files everything into
//! date-stamped folders next to a spreadsheet index.
//!
//! # Features
//!
//! - `parallel` - Parse a batch of files on the `rayon` thread pool (enabled by default)
//! - `regex` - Use the `regex` crate for field patterns (enabled by default)
//! - `lite` - Use `regex-lite` instead, for smaller binaries
//! - `cli` - Build the `orlit` command-line tool (enabled by default)
//!
//! # Basic Usage
//!
//! ```rust
//! use orlit::{CitationStyle, RecordParser};
//!
//! let input = r#"TY  - JOUR
//! TI  - Example Article
//! AU  - Doe, Jane
//! DA  - 2020
//! JO  - Journal of Examples
//! ER  -"#;
//!
//! let record = RecordParser::new().parse_str(input, "Mar 11 2025");
//! let rendering = orlit::render(&record, CitationStyle::Apa);
//! assert_eq!(rendering.in_text, "(Doe Jane, 2020)");
//! ```
//!
//! # Batch Processing
//!
//! [`Pipeline`] runs the whole filing workflow: move citation files from a
//! source folder, parse and render them, write companion citation text
//! files, append spreadsheet rows and sort everything into date folders.
//! State that outlives a run (recent directories, known titles, the record
//! archive) lives in explicit [`store`] objects owned by the caller.
//!
//! ```rust,no_run
//! use orlit::{Pipeline, RunConfig, Stores};
//!
//! let mut config = RunConfig::new("/downloads", "/library");
//! config.set_style("MLA 9");
//!
//! let mut stores = Stores::load(config.data_dir());
//! let summary = Pipeline::new(config).run(&mut stores)?;
//! println!("Filed {} new citations", summary.appended);
//! # Ok::<(), orlit::CitationError>(())
//! ```
//!
//! # Error Handling
//!
//! The library uses a crate [`Result`] type wrapping [`CitationError`]. A
//! batch never aborts because of one bad citation file; per-file failures
//! are reported in the [`RunSummary`].
//!
//! # Thread Safety
//!
//! [`RecordParser`] and the style formatter hold no mutable state and can be
//! shared freely between threads.

use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

pub mod config;
pub mod error;
pub mod organize;
pub mod pipeline;
pub mod record;
pub mod spreadsheet;
pub mod store;
pub mod style;

// Reexports
pub use config::RunConfig;
pub use error::{CitationError, Result};
pub use pipeline::{Pipeline, RunSummary};
pub use record::{RecordParser, RuleSet};
pub use store::Stores;
pub use style::{CitationRendering, CitationStyle, render, render_named};
pub use utils::{clean_field, doi_id, file_access_date, normalize_doi};

mod regex;
mod utils;

/// Column keys of a record, in spreadsheet order.
pub const RECORD_KEYS: [&str; 14] = [
    "Sr. No.",
    "Authors",
    "Access Date",
    "Title",
    "First Author",
    "Last Author",
    "Publication Date",
    "Journal",
    "Volume",
    "Issue",
    "Pages",
    "Abstract",
    "DOI",
    "Remarks",
];

/// Citation export dialects, recognized by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CitationFormat {
    Ris,
    PubMed,
    EndNote,
    BibTex,
}

impl CitationFormat {
    /// Every recognized dialect.
    pub const ALL: [CitationFormat; 4] = [
        CitationFormat::Ris,
        CitationFormat::PubMed,
        CitationFormat::EndNote,
        CitationFormat::BibTex,
    ];

    /// Convert the format to a string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationFormat::Ris => "RIS",
            CitationFormat::PubMed => "PubMed",
            CitationFormat::EndNote => "EndNote",
            CitationFormat::BibTex => "BibTeX",
        }
    }

    /// The file extension used by exports in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            CitationFormat::Ris => "ris",
            CitationFormat::PubMed => "nbib",
            CitationFormat::EndNote => "enw",
            CitationFormat::BibTex => "bib",
        }
    }

    /// Detect the format from a file extension, ignoring case.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.trim();
        Self::ALL
            .into_iter()
            .find(|format| extension.eq_ignore_ascii_case(format.extension()))
    }
}

impl std::fmt::Display for CitationFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bibliographic fields extracted from one citation file.
///
/// Serializes with the spreadsheet column names as keys, in
/// [`RECORD_KEYS`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    /// Row number, assigned when the record is written to a spreadsheet
    #[serde(rename = "Sr. No.", default)]
    pub serial_number: Option<u32>,
    /// Authors in order of appearance
    #[serde(rename = "Authors", default, deserialize_with = "null_as_empty")]
    pub authors: Vec<String>,
    /// Creation (or modification) date of the citation file, `Mon DD YYYY`
    #[serde(rename = "Access Date", default)]
    pub access_date: String,
    #[serde(rename = "Title", default)]
    pub title: Option<String>,
    #[serde(rename = "First Author", default)]
    pub first_author: Option<String>,
    #[serde(rename = "Last Author", default)]
    pub last_author: Option<String>,
    /// Free-text publication date
    #[serde(rename = "Publication Date", default)]
    pub publication_date: Option<String>,
    #[serde(rename = "Journal", default)]
    pub journal: Option<String>,
    #[serde(rename = "Volume", default)]
    pub volume: Option<String>,
    #[serde(rename = "Issue", default)]
    pub issue: Option<String>,
    #[serde(rename = "Pages", default)]
    pub pages: Option<String>,
    #[serde(rename = "Abstract", default)]
    pub abstract_text: Option<String>,
    /// DOI as a resolver URL
    #[serde(rename = "DOI", default)]
    pub doi: Option<String>,
    #[serde(rename = "Remarks", default)]
    pub remarks: Option<String>,
}

impl CitationRecord {
    /// Create a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Authors joined with `", "`, empty when there are none.
    pub fn authors_joined(&self) -> String {
        self.authors.join(", ")
    }

    /// The DOI without its `doi.org` resolver prefix.
    pub fn doi_id(&self) -> Option<&str> {
        self.doi.as_deref().map(utils::doi_id)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}
