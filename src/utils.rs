use crate::regex::Regex;
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use std::time::SystemTime;

static DOI_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://(?:dx\.)?doi\.org/(.+)$").unwrap());

static ISSN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{3}[\dXx]\b").unwrap());

/// Characters stripped from every extracted field.
pub const NOISE_CHARS: [char; 5] = ['{', '}', ',', '[', ']'];

/// The date format used for access dates and the date-bucket folder names.
pub const ACCESS_DATE_FORMAT: &str = "%b %d %Y";

/// Removes every `{`, `}`, `,`, `[` and `]` from `text`.
///
/// The result never contains any of those characters, so applying it twice
/// gives the same string as applying it once.
///
/// ```
/// assert_eq!(orlit::clean_field("{Deep}, [learning]"), "Deep learning");
/// ```
pub fn clean_field(text: &str) -> String {
    text.chars().filter(|c| !NOISE_CHARS.contains(c)).collect()
}

/// Normalizes a raw DOI to its resolver URL.
///
/// Values already starting with `http` are returned unchanged.
pub fn normalize_doi(raw: &str) -> String {
    if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("https://doi.org/{}", raw)
    }
}

/// Strips a `doi.org` resolver prefix, returning the bare identifier.
///
/// Anything that is not a `doi.org` URL is returned as-is.
pub fn doi_id(doi: &str) -> &str {
    DOI_URL_REGEX
        .captures(doi)
        .and_then(|captures| captures.get(1))
        .map_or(doi, |m| m.as_str())
}

/// Whether `value` starts with an ISSN (`1234-5678`, `1234-567X`).
pub(crate) fn looks_like_issn(value: &str) -> bool {
    ISSN_REGEX.is_match(value.trim())
}

/// Formats a timestamp as an access date, e.g. `Mar 11 2025`.
pub fn format_access_date(time: SystemTime) -> String {
    DateTime::<Local>::from(time)
        .format(ACCESS_DATE_FORMAT)
        .to_string()
}

/// Returns the access date of a file.
///
/// Uses the creation time where the platform records one and falls back to
/// the modification time otherwise.
pub fn file_access_date(path: &Path) -> io::Result<String> {
    let metadata = fs::metadata(path)?;
    let time = metadata.created().or_else(|_| metadata.modified())?;
    Ok(format_access_date(time))
}
