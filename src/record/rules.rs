//! Line rules for the four citation export dialects.
//!
//! A rule pairs a trigger (what the line must look like) with an extractor
//! (how the value is cut out of it) and the field the value lands in.
//! Rules are kept in one ordered table per [`RuleSet`]; the first rule whose
//! trigger matches a line consumes that line.

use crate::regex::Regex;
use crate::utils::looks_like_issn;
use either::{Either, Left, Right};
use std::sync::LazyLock;

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)year\s*=\s*[{"](.+?)[}"]"#).unwrap());
static ABSTRACT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)abstract\s*=\s*[{"](.+?)[}"]"#).unwrap());
static DOI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)doi\s*=\s*[{"](.+?)[}"]"#).unwrap());
static JOURNAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)journal\s*=\s*[{"](.+?)[}"]"#).unwrap());
static PAGES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)pages\s*=\s*[{"](.+?)[}"]"#).unwrap());
static QUOTED_TITLE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)title\s*=\s*"(.+?)""#).unwrap());
static AUTHOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)author\s*=\s*\{(.+?)\}").unwrap());

/// Separator between names inside a BibTeX `author` value.
const BIBTEX_AUTHOR_SEPARATOR: &str = " and ";

/// Record fields a line can populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Field {
    Title,
    Author,
    PublicationDate,
    Abstract,
    Doi,
    Journal,
    Volume,
    Issue,
    Pages,
}

/// Which rule table the parser dispatches lines through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum RuleSet {
    /// Corrected table: page ranges land in Pages, ISSNs are ignored and
    /// PubMed `IP` lines feed Issue.
    #[default]
    Standard,
    /// The historical table, kept for spreadsheets that were filled by it.
    /// ISSN/ISBN lines populate Pages.
    Compatible,
}

impl RuleSet {
    /// The ordered rule table for this set.
    pub(crate) fn rules(self) -> &'static [LineRule] {
        match self {
            RuleSet::Standard => STANDARD_RULES,
            RuleSet::Compatible => COMPATIBLE_RULES,
        }
    }
}

/// What a line has to look like for a rule to fire.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Trigger {
    /// The raw line starts with one of these tags.
    Prefix(&'static [&'static str]),
    /// The line, ignoring leading whitespace, starts with one of these
    /// BibTeX assignments.
    Assignment(&'static [&'static str]),
    /// The line contains this text anywhere.
    Contains(&'static str),
}

impl Trigger {
    fn matches(self, line: &str) -> bool {
        match self {
            Trigger::Prefix(tags) => tags.iter().any(|tag| line.starts_with(tag)),
            Trigger::Assignment(keys) => {
                let line = line.trim_start();
                keys.iter().any(|key| line.starts_with(key))
            }
            Trigger::Contains(needle) => line.contains(needle),
        }
    }
}

/// BibTeX keys whose values are captured from `{...}` or `"..."`.
#[derive(Debug, Clone, Copy)]
pub(crate) enum BibKey {
    Year,
    Abstract,
    Doi,
    Journal,
    Pages,
}

impl BibKey {
    fn regex(self) -> &'static Regex {
        match self {
            BibKey::Year => &YEAR_REGEX,
            BibKey::Abstract => &ABSTRACT_REGEX,
            BibKey::Doi => &DOI_REGEX,
            BibKey::Journal => &JOURNAL_REGEX,
            BibKey::Pages => &PAGES_REGEX,
        }
    }
}

/// How the value is cut out of a matching line.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Extract {
    /// Everything after the first `-` or `=`.
    AfterSeparator,
    /// Everything after the two-character EndNote tag (`%T`, `%A`, ...).
    AfterTag,
    /// Everything after the first `{`, or the quoted value when the line
    /// has no brace.
    AfterBrace,
    /// Everything after the first `{`, or the whole line when it has none.
    AfterBraceOrLine,
    /// The first capture of a BibTeX `key = {value}` pattern.
    Captured(BibKey),
    /// A brace-delimited BibTeX author list, one value per name.
    AuthorList,
    /// An identifier after the separator. A trailing `[doi]` marker is
    /// dropped; any other bracketed marker (`[pii]`) rejects the value.
    TaggedIdentifier,
    /// A value after the separator, rejected when it looks like an ISSN.
    NonIssn,
}

type Values = Either<std::option::IntoIter<String>, std::vec::IntoIter<String>>;

impl Extract {
    fn apply(self, line: &str) -> Values {
        match self {
            Extract::AfterSeparator => single(Some(after_separator(line))),
            Extract::AfterTag => single(line.get(2..).map(|rest| rest.trim().to_string())),
            Extract::AfterBrace => single(match line.split_once('{') {
                Some((_, rest)) => Some(rest.trim().to_string()),
                None => capture(&QUOTED_TITLE_REGEX, line),
            }),
            Extract::AfterBraceOrLine => single(Some(
                line.split_once('{').map_or(line, |(_, rest)| rest).trim().to_string(),
            )),
            Extract::Captured(key) => single(capture(key.regex(), line)),
            Extract::AuthorList => Right(
                AUTHOR_REGEX
                    .captures(line)
                    .and_then(|captures| captures.get(1))
                    .map(|names| {
                        names
                            .as_str()
                            .split(BIBTEX_AUTHOR_SEPARATOR)
                            .map(|name| name.trim().to_string())
                            .collect::<Vec<_>>()
                    })
                    .unwrap_or_default()
                    .into_iter(),
            ),
            Extract::TaggedIdentifier => {
                let value = after_separator(line);
                single(match value.strip_suffix("[doi]") {
                    Some(id) => Some(id.trim_end().to_string()),
                    None if value.ends_with(']') => None,
                    None => Some(value),
                })
            }
            Extract::NonIssn => {
                let value = after_separator(line);
                single((!looks_like_issn(&value)).then_some(value))
            }
        }
    }
}

fn single(value: Option<String>) -> Values {
    Left(value.into_iter())
}

fn after_separator(line: &str) -> String {
    line.split_once(['-', '='])
        .map_or(line, |(_, rest)| rest)
        .trim()
        .to_string()
}

fn capture(regex: &Regex, line: &str) -> Option<String> {
    regex
        .captures(line)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// One entry of a rule table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LineRule {
    pub(crate) field: Field,
    pub(crate) trigger: Trigger,
    pub(crate) extract: Extract,
}

impl LineRule {
    const fn new(field: Field, trigger: Trigger, extract: Extract) -> Self {
        Self {
            field,
            trigger,
            extract,
        }
    }

    /// Whether this rule consumes `line`.
    pub(crate) fn matches(&self, line: &str) -> bool {
        self.trigger.matches(line)
    }

    /// The values this rule extracts from a line it matched. Empty when the
    /// line matched but the inner pattern did not.
    pub(crate) fn extract(&self, line: &str) -> impl Iterator<Item = String> {
        self.extract.apply(line)
    }
}

use Extract::*;
use Field::*;
use Trigger::*;

static COMPATIBLE_RULES: &[LineRule] = &[
    LineRule::new(Title, Prefix(&["T1  -", "TI  -"]), AfterSeparator),
    LineRule::new(Title, Prefix(&["%T"]), AfterTag),
    LineRule::new(Title, Prefix(&["title ="]), AfterBraceOrLine),
    LineRule::new(Author, Prefix(&["AU  -", "FAU -", "A1  -"]), AfterSeparator),
    LineRule::new(Author, Prefix(&["%A"]), AfterTag),
    LineRule::new(Author, Assignment(&["author ="]), AuthorList),
    LineRule::new(PublicationDate, Prefix(&["DA  -", "DP  -", "Y1  -"]), AfterSeparator),
    LineRule::new(PublicationDate, Prefix(&["%D"]), AfterTag),
    LineRule::new(PublicationDate, Contains("year ="), Captured(BibKey::Year)),
    LineRule::new(Abstract, Prefix(&["AB  -", "N2  -"]), AfterSeparator),
    LineRule::new(Abstract, Contains("abstract ="), Captured(BibKey::Abstract)),
    LineRule::new(Doi, Prefix(&["DO  -", "LID -"]), AfterSeparator),
    LineRule::new(Doi, Prefix(&["%M"]), AfterTag),
    LineRule::new(Doi, Contains("doi ="), Captured(BibKey::Doi)),
    LineRule::new(Journal, Prefix(&["JO  -", "JT  -", "JOUR -"]), AfterSeparator),
    LineRule::new(Journal, Prefix(&["PT -"]), AfterSeparator),
    LineRule::new(Journal, Prefix(&["%0"]), AfterTag),
    LineRule::new(Journal, Contains("journal ="), Captured(BibKey::Journal)),
    LineRule::new(Volume, Prefix(&["VL  -", "VI -"]), AfterSeparator),
    LineRule::new(Volume, Prefix(&["volume ="]), AfterSeparator),
    LineRule::new(Volume, Prefix(&["%V"]), AfterTag),
    LineRule::new(Issue, Prefix(&["IP -", "IS  -"]), AfterSeparator),
    LineRule::new(Issue, Prefix(&["number ="]), AfterSeparator),
    LineRule::new(Issue, Prefix(&["%N"]), AfterTag),
    LineRule::new(Pages, Prefix(&["issn ="]), AfterSeparator),
    LineRule::new(Pages, Prefix(&["IS -", "SN -"]), AfterSeparator),
    LineRule::new(Pages, Prefix(&["%@ "]), AfterTag),
];

static STANDARD_RULES: &[LineRule] = &[
    LineRule::new(Title, Prefix(&["T1  -", "TI  -"]), AfterSeparator),
    LineRule::new(Title, Prefix(&["%T"]), AfterTag),
    LineRule::new(Title, Assignment(&["title ="]), AfterBrace),
    LineRule::new(Author, Prefix(&["AU  -", "FAU -", "A1  -"]), AfterSeparator),
    LineRule::new(Author, Prefix(&["%A"]), AfterTag),
    LineRule::new(Author, Assignment(&["author ="]), AuthorList),
    LineRule::new(PublicationDate, Prefix(&["DA  -", "DP  -", "Y1  -", "PY  -"]), AfterSeparator),
    LineRule::new(PublicationDate, Prefix(&["%D"]), AfterTag),
    LineRule::new(PublicationDate, Contains("year ="), Captured(BibKey::Year)),
    LineRule::new(Abstract, Prefix(&["AB  -", "N2  -"]), AfterSeparator),
    LineRule::new(Abstract, Contains("abstract ="), Captured(BibKey::Abstract)),
    LineRule::new(Doi, Prefix(&["DO  -", "LID -"]), TaggedIdentifier),
    LineRule::new(Doi, Prefix(&["%M"]), AfterTag),
    LineRule::new(Doi, Contains("doi ="), Captured(BibKey::Doi)),
    LineRule::new(Journal, Prefix(&["JO  -", "JT  -", "JOUR -"]), AfterSeparator),
    LineRule::new(Journal, Prefix(&["PT -"]), AfterSeparator),
    LineRule::new(Journal, Prefix(&["%0"]), AfterTag),
    LineRule::new(Journal, Contains("journal ="), Captured(BibKey::Journal)),
    LineRule::new(Volume, Prefix(&["VL  -", "VI  -", "VI -"]), AfterSeparator),
    LineRule::new(Volume, Assignment(&["volume ="]), AfterSeparator),
    LineRule::new(Volume, Prefix(&["%V"]), AfterTag),
    LineRule::new(Issue, Prefix(&["IP  -", "IP -"]), AfterSeparator),
    LineRule::new(Issue, Prefix(&["IS  -"]), NonIssn),
    LineRule::new(Issue, Assignment(&["number ="]), AfterSeparator),
    LineRule::new(Issue, Prefix(&["%N"]), AfterTag),
    LineRule::new(Pages, Prefix(&["SP  -", "PG  -"]), AfterSeparator),
    LineRule::new(Pages, Prefix(&["%P"]), AfterTag),
    LineRule::new(Pages, Contains("pages ="), Captured(BibKey::Pages)),
];

/// Finds the rule that consumes `line`, if any.
pub(crate) fn first_match(rules: &'static [LineRule], line: &str) -> Option<&'static LineRule> {
    rules.iter().find(|rule| rule.matches(line))
}
