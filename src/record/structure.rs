//! Accumulator for the values found while walking a citation file.
//!
//! # Field Processing Strategy
//! - **Last-wins**: scalar fields keep the value from the last matching line
//! - **Append-only**: authors keep every name, in order of appearance
//! - **Clean once**: noise characters are stripped when the record is built

use crate::record::rules::Field;
use crate::utils::{clean_field, normalize_doi};
use crate::CitationRecord;
use std::collections::HashMap;

/// Raw values collected from one citation file.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawRecord {
    /// Scalar field values, overwritten by later lines.
    pub(crate) data: HashMap<Field, String>,
    /// Author names in order of appearance.
    pub(crate) authors: Vec<String>,
    /// Line numbers that matched no rule.
    pub(crate) ignored_lines: Vec<usize>,
}

impl RawRecord {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Store an extracted value for `field`.
    pub(crate) fn add_value(&mut self, field: Field, value: String) {
        match field {
            Field::Author => self.authors.push(value),
            Field::Doi => {
                self.data.insert(field, normalize_doi(&value));
            }
            _ => {
                self.data.insert(field, value);
            }
        }
    }

    pub(crate) fn add_ignored_line(&mut self, line_number: usize) {
        self.ignored_lines.push(line_number);
    }

    fn take(&mut self, field: Field) -> Option<String> {
        self.data.remove(&field).map(|value| clean_field(&value))
    }

    /// Build the final record, deriving first/last author and cleaning
    /// every field.
    pub(crate) fn into_record(mut self, access_date: String) -> CitationRecord {
        let authors: Vec<String> = self.authors.iter().map(|a| clean_field(a)).collect();

        CitationRecord {
            serial_number: None,
            first_author: authors.first().cloned(),
            last_author: authors.last().cloned(),
            access_date: clean_field(&access_date),
            title: self.take(Field::Title),
            publication_date: self.take(Field::PublicationDate),
            journal: self.take(Field::Journal),
            volume: self.take(Field::Volume),
            issue: self.take(Field::Issue),
            pages: self.take(Field::Pages),
            abstract_text: self.take(Field::Abstract),
            doi: self.take(Field::Doi),
            remarks: None,
            authors,
        }
    }
}
