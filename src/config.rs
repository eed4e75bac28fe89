//! Configuration for a filing run.
//!
//! This module defines the directories, style and storage locations a
//! [`Pipeline`](crate::Pipeline) run works with.

use crate::error::{CitationError, Result};
use crate::record::RuleSet;
use crate::style::CitationStyle;
use std::path::{Path, PathBuf};

/// Placeholder entry shown by directory pickers; never a real selection.
pub const DIRECTORY_PLACEHOLDER: &str = "📂 Choose a New Directory";

/// Default spreadsheet file name inside the target directory.
pub const DEFAULT_SPREADSHEET_NAME: &str = "Literature Organisation.csv";

/// Name of the per-user data directory under the home directory.
const DATA_DIR_NAME: &str = ".orlit";

/// Configuration for one filing run.
///
/// # Examples
///
/// ```
/// use orlit::{RunConfig, RuleSet};
///
/// let mut config = RunConfig::new("/downloads", "/library");
/// config
///     .set_style("Chicago")
///     .set_rules(RuleSet::Compatible)
///     .set_parallel(false);
///
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Folder citation exports are picked up from
    pub(crate) source_dir: PathBuf,
    /// Folder the library is organized in
    pub(crate) target_dir: PathBuf,
    /// Citation style name, checked by `validate`
    pub(crate) style: String,
    /// PDFs to file into date folders alongside the citations
    pub(crate) pdfs: Vec<PathBuf>,
    /// Spreadsheet file name inside the target folder
    pub(crate) spreadsheet_name: String,
    /// Folder holding the history, title cache and record archive
    pub(crate) data_dir: PathBuf,
    /// Rule table for field extraction
    pub(crate) rules: RuleSet,
    /// Whether to parse files on the rayon pool
    pub(crate) parallel: bool,
}

impl RunConfig {
    /// Creates a configuration with APA style and default locations.
    #[must_use]
    pub fn new(source_dir: impl Into<PathBuf>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
            target_dir: target_dir.into(),
            style: CitationStyle::default().as_str().to_string(),
            pdfs: Vec::new(),
            spreadsheet_name: DEFAULT_SPREADSHEET_NAME.to_string(),
            data_dir: default_data_dir(),
            rules: RuleSet::default(),
            parallel: cfg!(feature = "parallel"),
        }
    }

    /// Sets the citation style by name
    pub fn set_style(&mut self, style: impl Into<String>) -> &mut Self {
        self.style = style.into();
        self
    }

    /// Adds PDFs to be filed by their own access dates
    pub fn add_pdfs(&mut self, pdfs: impl IntoIterator<Item = PathBuf>) -> &mut Self {
        self.pdfs.extend(pdfs);
        self
    }

    /// Sets the spreadsheet file name
    pub fn set_spreadsheet_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.spreadsheet_name = name.into();
        self
    }

    /// Sets the folder for persistent stores
    pub fn set_data_dir(&mut self, dir: impl Into<PathBuf>) -> &mut Self {
        self.data_dir = dir.into();
        self
    }

    /// Sets the rule table used for field extraction
    pub fn set_rules(&mut self, rules: RuleSet) -> &mut Self {
        self.rules = rules;
        self
    }

    /// Sets whether files are parsed in parallel
    pub fn set_parallel(&mut self, parallel: bool) -> &mut Self {
        self.parallel = parallel;
        self
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn pdfs(&self) -> &[PathBuf] {
        &self.pdfs
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    pub fn parallel(&self) -> bool {
        self.parallel
    }

    /// Full path of the spreadsheet.
    pub fn spreadsheet_path(&self) -> PathBuf {
        self.target_dir.join(&self.spreadsheet_name)
    }

    /// The configured style.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::UnsupportedStyle`] for an unknown name.
    pub fn style(&self) -> Result<CitationStyle> {
        self.style.parse()
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::MissingDirectory`] when either directory is
    /// blank or still the picker placeholder, and
    /// [`CitationError::UnsupportedStyle`] for an unknown style.
    pub fn validate(&self) -> Result<()> {
        if !is_selected(&self.source_dir) {
            return Err(CitationError::MissingDirectory("source"));
        }
        if !is_selected(&self.target_dir) {
            return Err(CitationError::MissingDirectory("target"));
        }
        self.style().map(|_| ())
    }
}

/// Whether `dir` is a real selection rather than blank or the placeholder.
pub(crate) fn is_selected(dir: &Path) -> bool {
    let text = dir.to_string_lossy();
    let text = text.trim();
    !text.is_empty() && text != DIRECTORY_PLACEHOLDER
}

/// `~/.orlit`, or `./.orlit` when no home directory is known.
pub fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}
