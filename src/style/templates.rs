//! Per-style templates. Each returns `(in_text, bibliography)`.
//!
//! Optional segments (issue, pages, DOI) are appended only when the field
//! is non-empty, except where the style prints a fixed `vol.`/`no.`/`pp.`
//! skeleton regardless.

use crate::style::Fields;

/// Appends `prefix value suffix` when `value` is non-empty.
fn push_if(out: &mut String, prefix: &str, value: &str, suffix: &str) {
    if !value.is_empty() {
        out.push_str(prefix);
        out.push_str(value);
        out.push_str(suffix);
    }
}

pub(crate) fn apa(f: &Fields<'_>) -> (String, String) {
    let in_text = format!("({}, {})", f.first_author, f.date);
    let mut bib = format!("{} ({}). {}. {}, {}", f.authors, f.date, f.title, f.journal, f.volume);
    push_if(&mut bib, "(", f.issue, ")");
    push_if(&mut bib, ", ", f.pages, "");
    push_if(&mut bib, ". ", f.doi_link, "");
    (in_text, bib)
}

pub(crate) fn mla9(f: &Fields<'_>) -> (String, String) {
    let in_text = format!("({})", f.first_author);
    let mut bib = format!(
        "{}. \"{}.\" {}, vol. {}, no. {}, {}, pp. {}",
        f.authors, f.title, f.journal, f.volume, f.issue, f.date, f.pages
    );
    push_if(&mut bib, ", doi:", f.doi_id, "");
    bib.push('.');
    (in_text, bib)
}

pub(crate) fn chicago(f: &Fields<'_>) -> (String, String) {
    let in_text = format!("({} {})", f.first_author, f.date);
    let mut bib = format!(
        "{}. {}. \"{}.\" {} {}, no. {}: {}.",
        f.authors, f.date, f.title, f.journal, f.volume, f.issue, f.pages
    );
    push_if(&mut bib, " ", f.doi_link, "");
    (in_text, bib)
}

pub(crate) fn acs(f: &Fields<'_>) -> (String, String) {
    let in_text = format!("({}, {})", f.first_author, f.date);
    let mut bib = format!("{}. {}. {} {}, {}", f.authors, f.title, f.journal, f.date, f.volume);
    push_if(&mut bib, "(", f.issue, ")");
    push_if(&mut bib, ", ", f.pages, "");
    push_if(&mut bib, ". doi:", f.doi_id, "");
    (in_text, bib)
}

pub(crate) fn asa(f: &Fields<'_>) -> (String, String) {
    let in_text = format!("({} {})", f.first_author, f.date);
    let mut bib = format!("{}. {}. \"{}.\" {} {}", f.authors, f.date, f.title, f.journal, f.volume);
    push_if(&mut bib, "(", f.issue, ")");
    push_if(&mut bib, ": ", f.pages, "");
    push_if(&mut bib, ". doi:", f.doi_id, "");
    (in_text, bib)
}

pub(crate) fn elsevier(f: &Fields<'_>) -> (String, String) {
    let in_text = format!("({}, {})", f.first_author, f.date);
    let mut bib = format!("{}. {}. {}. {};{}", f.authors, f.title, f.journal, f.date, f.volume);
    push_if(&mut bib, "(", f.issue, ")");
    push_if(&mut bib, ":", f.pages, "");
    push_if(&mut bib, ". doi:", f.doi_id, "");
    (in_text, bib)
}

pub(crate) fn ieee(f: &Fields<'_>) -> (String, String) {
    let in_text = format!("[{}, {}]", f.first_author, f.date);
    let mut bib = format!(
        "{}, \"{},\" {}, vol. {}, no. {}, pp. {}, {}.",
        f.authors, f.title, f.journal, f.volume, f.issue, f.pages, f.date
    );
    push_if(&mut bib, " doi:", f.doi_id, "");
    (in_text, bib)
}

pub(crate) fn nature(f: &Fields<'_>) -> (String, String) {
    let mut bib = format!("{}. {}. {} {}, {} ({}).", f.authors, f.title, f.journal, f.volume, f.pages, f.date);
    push_if(&mut bib, " doi:", f.doi_id, "");
    (String::new(), bib)
}
