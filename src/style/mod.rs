//! Citation style formatter.
//!
//! Renders a [`CitationRecord`] as an in-text citation and a bibliography
//! reference. Each [`CitationStyle`] variant maps to its own template
//! function; absent fields fall back to fixed placeholder text.
//!
//! # Example
//!
//! ```
//! use orlit::{CitationRecord, CitationStyle, render};
//!
//! let record = CitationRecord {
//!     first_author: Some("Doe".to_string()),
//!     publication_date: Some("2020".to_string()),
//!     ..Default::default()
//! };
//!
//! let rendering = render(&record, CitationStyle::Apa);
//! assert_eq!(rendering.in_text, "(Doe, 2020)");
//! ```

mod templates;

use crate::CitationRecord;
use crate::error::{CitationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Header line preceding the in-text citation in a companion text file.
pub const IN_TEXT_HEADER: &str = "------------In Text Citation------------";
/// Header line preceding the bibliography reference in a companion text file.
pub const BIBLIOGRAPHY_HEADER: &str = "------------Bibliography Reference------------";

/// Supported citation styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CitationStyle {
    #[default]
    Apa,
    Mla9,
    Acs,
    Chicago,
    Asa,
    Elsevier,
    Ieee,
    Nature,
}

impl CitationStyle {
    /// Every supported style, in menu order.
    pub const ALL: [CitationStyle; 8] = [
        CitationStyle::Apa,
        CitationStyle::Mla9,
        CitationStyle::Acs,
        CitationStyle::Chicago,
        CitationStyle::Asa,
        CitationStyle::Elsevier,
        CitationStyle::Ieee,
        CitationStyle::Nature,
    ];

    /// The exact style name used by callers and configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "APA",
            CitationStyle::Mla9 => "MLA 9",
            CitationStyle::Acs => "ACS",
            CitationStyle::Chicago => "Chicago",
            CitationStyle::Asa => "ASA",
            CitationStyle::Elsevier => "Elsevier",
            CitationStyle::Ieee => "IEEE",
            CitationStyle::Nature => "Nature",
        }
    }

    /// Whether the style produces an in-text citation.
    ///
    /// Nature cites by superscript number, which has no plain-text form, so
    /// only its bibliography reference is rendered.
    pub fn has_in_text(&self) -> bool {
        !matches!(self, CitationStyle::Nature)
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CitationStyle {
    type Err = CitationError;

    /// Parses a style name. Matching is case- and spelling-exact.
    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|style| style.as_str() == name)
            .ok_or_else(|| CitationError::UnsupportedStyle(name.to_string()))
    }
}

/// The two rendered forms of one citation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationRendering {
    /// Short parenthetical or bracketed form for use in prose
    pub in_text: String,
    /// Full reference-list entry
    pub bibliography: String,
}

impl CitationRendering {
    /// Body of the companion text file written next to a citation file.
    pub fn companion_text(&self) -> String {
        format!(
            "{IN_TEXT_HEADER}\n {}\n\n\n\n\n\n\n{BIBLIOGRAPHY_HEADER}\n {}\n",
            self.in_text, self.bibliography
        )
    }
}

/// Record fields with placeholder text substituted for absent values.
#[derive(Debug)]
pub(crate) struct Fields<'a> {
    pub(crate) authors: String,
    pub(crate) first_author: &'a str,
    pub(crate) date: &'a str,
    pub(crate) title: &'a str,
    pub(crate) journal: &'a str,
    pub(crate) volume: &'a str,
    pub(crate) issue: &'a str,
    pub(crate) pages: &'a str,
    /// Resolver link, for styles printing `https://doi.org/...`
    pub(crate) doi_link: &'a str,
    /// Bare identifier, for styles printing `doi:...`
    pub(crate) doi_id: &'a str,
}

impl<'a> Fields<'a> {
    fn resolve(record: &'a CitationRecord) -> Self {
        Self {
            authors: record.authors_joined(),
            first_author: record.first_author.as_deref().unwrap_or("Unknown"),
            date: record.publication_date.as_deref().unwrap_or("n.d."),
            title: record.title.as_deref().unwrap_or("Untitled"),
            journal: record.journal.as_deref().unwrap_or("Unknown Journal"),
            volume: record.volume.as_deref().unwrap_or_default(),
            issue: record.issue.as_deref().unwrap_or_default(),
            pages: record.pages.as_deref().unwrap_or_default(),
            doi_link: record.doi.as_deref().unwrap_or_default(),
            doi_id: record.doi_id().unwrap_or_default(),
        }
    }
}

/// Renders `record` in `style`.
pub fn render(record: &CitationRecord, style: CitationStyle) -> CitationRendering {
    let fields = Fields::resolve(record);
    let (in_text, bibliography) = match style {
        CitationStyle::Apa => templates::apa(&fields),
        CitationStyle::Mla9 => templates::mla9(&fields),
        CitationStyle::Acs => templates::acs(&fields),
        CitationStyle::Chicago => templates::chicago(&fields),
        CitationStyle::Asa => templates::asa(&fields),
        CitationStyle::Elsevier => templates::elsevier(&fields),
        CitationStyle::Ieee => templates::ieee(&fields),
        CitationStyle::Nature => templates::nature(&fields),
    };
    CitationRendering {
        in_text,
        bibliography,
    }
}

/// Renders `record` in the style called `style_name`.
///
/// # Errors
///
/// Returns [`CitationError::UnsupportedStyle`] if `style_name` is not one of
/// the names listed by [`CitationStyle::ALL`].
pub fn render_named(record: &CitationRecord, style_name: &str) -> Result<CitationRendering> {
    Ok(render(record, style_name.parse()?))
}
