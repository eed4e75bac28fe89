//! Citation record parser.
//!
//! Reads a citation export file and extracts one [`CitationRecord`] from it.
//! The dialect is never detected up front: every line is matched against an
//! ordered rule table covering RIS, PubMed (NBIB), EndNote tagged and BibTeX
//! lines, so a file mixing dialects still yields a single record.
//!
//! # Example
//!
//! ```
//! use orlit::RecordParser;
//!
//! let input = r#"TY  - JOUR
//! TI  - Example Title
//! AU  - Smith, John
//! DO  - 10.1000/xyz
//! ER  -"#;
//!
//! let record = RecordParser::new().parse_str(input, "Mar 11 2025");
//! assert_eq!(record.title.as_deref(), Some("Example Title"));
//! assert_eq!(record.doi.as_deref(), Some("https://doi.org/10.1000/xyz"));
//! ```

mod parse;
mod rules;
mod structure;

pub use rules::RuleSet;

use crate::error::{CitationError, Result};
use crate::utils::file_access_date;
use crate::CitationRecord;
use parse::record_parse;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Parser producing one [`CitationRecord`] per citation file.
///
/// The parser holds no mutable state and can be shared between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordParser {
    rules: RuleSet,
}

impl RecordParser {
    /// Creates a parser using the [`RuleSet::Standard`] rules.
    ///
    /// # Examples
    ///
    /// ```
    /// use orlit::RecordParser;
    /// let parser = RecordParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Selects the rule table used for line dispatch.
    #[must_use]
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// The rule table in use.
    pub fn rules(&self) -> RuleSet {
        self.rules
    }

    /// Parses a citation file.
    ///
    /// The access date comes from the file's creation time, or its
    /// modification time where the platform has no creation time.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::FileAccess`] if the file is missing,
    /// unreadable, or not valid UTF-8.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<CitationRecord> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| CitationError::file_access(path, e))?;
        let access_date =
            file_access_date(path).map_err(|e| CitationError::file_access(path, e))?;

        let record = self.parse_str(&text, &access_date);
        debug!(
            path = %path.display(),
            title = record.title.as_deref().unwrap_or_default(),
            authors = record.authors.len(),
            "parsed citation file"
        );
        Ok(record)
    }

    /// Parses citation text that has already been read.
    ///
    /// Lines matching no rule are skipped; text with no recognizable line
    /// yields a record holding only `access_date`.
    pub fn parse_str(&self, text: &str, access_date: &str) -> CitationRecord {
        let raw = record_parse(text, self.rules.rules());
        if !raw.ignored_lines.is_empty() {
            debug!(count = raw.ignored_lines.len(), "skipped unrecognized lines");
        }
        raw.into_record(access_date.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const ACCESS: &str = "Mar 11 2025";

    #[test]
    fn test_ris_authors_in_order() {
        let input = "AU  - Doe, Jane\nAU  - Smith, John\n";
        let record = RecordParser::new().parse_str(input, ACCESS);

        assert_eq!(record.authors, vec!["Doe Jane", "Smith John"]);
        assert_eq!(record.first_author.as_deref(), Some("Doe Jane"));
        assert_eq!(record.last_author.as_deref(), Some("Smith John"));
    }

    #[test]
    fn test_bibtex_entry() {
        let input = r#"@article{doe2020,
  author = {Doe, Jane and Smith, John},
  title = {Deep {Learning} for Citations},
  journal = {Journal of Testing},
  year = {2020},
  volume = {12},
  number = {3},
  pages = {45--67},
  doi = {10.1000/xyz},
  abstract = {A short abstract.},
}"#;
        let record = RecordParser::new().parse_str(input, ACCESS);

        assert_eq!(record.authors, vec!["Doe Jane", "Smith John"]);
        assert_eq!(record.title.as_deref(), Some("Deep Learning for Citations"));
        assert_eq!(record.journal.as_deref(), Some("Journal of Testing"));
        assert_eq!(record.publication_date.as_deref(), Some("2020"));
        assert_eq!(record.volume.as_deref(), Some("12"));
        assert_eq!(record.issue.as_deref(), Some("3"));
        assert_eq!(record.pages.as_deref(), Some("45--67"));
        assert_eq!(record.doi.as_deref(), Some("https://doi.org/10.1000/xyz"));
        assert_eq!(record.abstract_text.as_deref(), Some("A short abstract."));
    }

    #[test]
    fn test_pubmed_record() {
        let input = r#"PMID- 12345678
TI  - Test Article Title
FAU - Smith, John
AU  - Smith J
JT  - Test Journal
DP  - 2023 Jan 23
VI  - 10
IP  - 2
IS  - 1234-5678 (Linking)
PG  - 100-110
LID - 10.1000/test [doi]
AB  - This is a test abstract.
"#;
        let record = RecordParser::new().parse_str(input, ACCESS);

        assert_eq!(record.title.as_deref(), Some("Test Article Title"));
        assert_eq!(record.authors, vec!["Smith John", "Smith J"]);
        assert_eq!(record.journal.as_deref(), Some("Test Journal"));
        assert_eq!(record.publication_date.as_deref(), Some("2023 Jan 23"));
        assert_eq!(record.volume.as_deref(), Some("10"));
        assert_eq!(record.issue.as_deref(), Some("2"));
        assert_eq!(record.pages.as_deref(), Some("100-110"));
        assert_eq!(record.doi.as_deref(), Some("https://doi.org/10.1000/test"));
        assert_eq!(record.abstract_text.as_deref(), Some("This is a test abstract."));
    }

    #[test]
    fn test_endnote_record() {
        let input = "%0 Journal Article\n%T EndNote Title\n%A Brown, Alex\n%D 2019\n%V 33\n%N 4\n%P 12-19\n%M 10.1000/enw\n";
        let record = RecordParser::new().parse_str(input, ACCESS);

        assert_eq!(record.title.as_deref(), Some("EndNote Title"));
        assert_eq!(record.authors, vec!["Brown Alex"]);
        assert_eq!(record.journal.as_deref(), Some("Journal Article"));
        assert_eq!(record.publication_date.as_deref(), Some("2019"));
        assert_eq!(record.volume.as_deref(), Some("33"));
        assert_eq!(record.issue.as_deref(), Some("4"));
        assert_eq!(record.pages.as_deref(), Some("12-19"));
        assert_eq!(record.doi.as_deref(), Some("https://doi.org/10.1000/enw"));
    }

    #[test]
    fn test_compatible_rules_put_issn_in_pages() {
        let input = "TI  - Title\nSN - 0028-0836\nSP  - 45-67\n";
        let compatible = RecordParser::new()
            .with_rules(RuleSet::Compatible)
            .parse_str(input, ACCESS);
        let standard = RecordParser::new().parse_str(input, ACCESS);

        assert_eq!(compatible.pages.as_deref(), Some("0028-0836"));
        assert_eq!(standard.pages.as_deref(), Some("45-67"));
    }

    #[test]
    fn test_compatible_rules_skip_indented_bibtex_fields() {
        let input = "@article{k,\n  title = {Indented},\n  volume = {12},\n  author = {Roe, R},\n}\n";
        let compatible = RecordParser::new()
            .with_rules(RuleSet::Compatible)
            .parse_str(input, ACCESS);
        let standard = RecordParser::new().parse_str(input, ACCESS);

        assert_eq!(compatible.title, None);
        assert_eq!(compatible.volume, None);
        assert_eq!(compatible.authors, vec!["Roe R"]);
        assert_eq!(standard.title.as_deref(), Some("Indented"));
        assert_eq!(standard.volume.as_deref(), Some("12"));
    }

    #[test]
    fn test_full_url_doi_unchanged() {
        let input = "DO  - https://doi.org/10.1000/xyz\n";
        let record = RecordParser::new().parse_str(input, ACCESS);
        assert_eq!(record.doi.as_deref(), Some("https://doi.org/10.1000/xyz"));
    }

    #[test]
    fn test_no_recognizable_lines() {
        let input = "Some random content\nthat doesn't match\nany known format";
        let record = RecordParser::new().parse_str(input, ACCESS);

        assert_eq!(
            record,
            CitationRecord {
                access_date: ACCESS.to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_fields_are_cleaned() {
        let input = "TI  - {Braces}, [brackets]\nAU  - {Doe}, [J]\nJO  - Acta, Physica\n";
        let record = RecordParser::new().parse_str(input, ACCESS);

        for value in record
            .authors
            .iter()
            .chain(record.title.iter())
            .chain(record.journal.iter())
        {
            assert!(!value.contains(['{', '}', ',', '[', ']']), "{value}");
        }
    }

    #[test]
    fn test_parse_is_repeatable() {
        let input = "TI  - Stable Title\nAU  - Doe, Jane\n";
        let parser = RecordParser::new();
        assert_eq!(parser.parse_str(input, ACCESS), parser.parse_str(input, ACCESS));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::Builder::new().suffix(".ris").tempfile().unwrap();
        writeln!(file, "TY  - JOUR").unwrap();
        writeln!(file, "TI  - File Title").unwrap();
        writeln!(file, "ER  -").unwrap();
        file.flush().unwrap();

        let record = RecordParser::new().parse_file(file.path()).unwrap();
        assert_eq!(record.title.as_deref(), Some("File Title"));
        assert_eq!(record.access_date.len(), "Mar 11 2025".len());
    }

    #[test]
    fn test_parse_missing_file() {
        let result = RecordParser::new().parse_file("/definitely/not/here.ris");
        assert!(matches!(result, Err(CitationError::FileAccess { .. })));
    }

    #[test]
    fn test_parse_invalid_utf8() {
        let mut file = tempfile::Builder::new().suffix(".ris").tempfile().unwrap();
        file.write_all(&[0x54, 0x49, 0xff, 0xfe]).unwrap();
        file.flush().unwrap();

        let result = RecordParser::new().parse_file(file.path());
        assert!(matches!(result, Err(CitationError::FileAccess { .. })));
    }
}
