//! Line-by-line dispatch of citation text through a rule table.

use crate::record::rules::{LineRule, first_match};
use crate::record::structure::RawRecord;

/// Walk `text` line by line, feeding each line to the first rule that
/// matches it. Lines are never joined; a value is confined to its line.
pub(crate) fn record_parse<S: AsRef<str>>(text: S, rules: &'static [LineRule]) -> RawRecord {
    let mut raw = RawRecord::new();

    for (index, line) in text.as_ref().lines().enumerate() {
        match first_match(rules, line) {
            Some(rule) => {
                for value in rule.extract(line) {
                    raw.add_value(rule.field, value);
                }
            }
            None => raw.add_ignored_line(index + 1),
        }
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::rules::{Field, RuleSet};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_ris_block() {
        let input = "TY  - JOUR\nTI  - Test Title\nAU  - Smith, John\nAU  - Doe, Jane\nER  -";
        let raw = record_parse(input, RuleSet::Standard.rules());

        assert_eq!(raw.data.get(&Field::Title).map(String::as_str), Some("Test Title"));
        assert_eq!(raw.authors, vec!["Smith, John", "Doe, Jane"]);
        assert_eq!(raw.ignored_lines, vec![1, 5]);
    }

    #[test]
    fn test_parse_mixed_dialects_accumulate_authors() {
        let input = "AU  - Smith, John\n%A Doe, Jane\n  author = {Brown, Alex and Green, Sam},";
        let raw = record_parse(input, RuleSet::Standard.rules());

        assert_eq!(
            raw.authors,
            vec!["Smith, John", "Doe, Jane", "Brown, Alex", "Green, Sam"]
        );
    }

    #[test]
    fn test_parse_windows_line_endings() {
        let input = "TI  - Windows Title\r\nVL  - 5\r\n";
        let raw = record_parse(input, RuleSet::Compatible.rules());

        assert_eq!(raw.data.get(&Field::Title).map(String::as_str), Some("Windows Title"));
        assert_eq!(raw.data.get(&Field::Volume).map(String::as_str), Some("5"));
    }

    #[test]
    fn test_parse_empty_input() {
        let raw = record_parse("", RuleSet::Standard.rules());
        assert!(raw.data.is_empty());
        assert!(raw.authors.is_empty());
        assert!(raw.ignored_lines.is_empty());
    }
}
