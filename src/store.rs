//! Persistent state kept between runs.
//!
//! Each store is an explicit object loaded from and saved to a JSON file.
//! Loading never fails: a missing file starts an empty store, and an
//! unreadable one is renamed to `<name>.corrupt` before starting empty, so a
//! later save never overwrites data that could still be recovered.

use crate::CitationRecord;
use crate::config::is_selected;
use crate::error::{CitationError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Number of recent directories remembered per history.
pub const MAX_HISTORY: usize = 5;

pub const SOURCE_HISTORY_FILE: &str = "source_history.json";
pub const TARGET_HISTORY_FILE: &str = "target_history.json";
pub const TITLE_CACHE_FILE: &str = "titles_cache.json";
pub const RECORD_ARCHIVE_FILE: &str = "data.json";

/// Suffix appended to a store file that failed to parse.
pub const CORRUPT_SUFFIX: &str = ".corrupt";

fn load_json<T: DeserializeOwned + Default>(path: &Path) -> T {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => return T::default(),
    };
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            let backup = corrupt_path(path);
            match fs::rename(path, &backup) {
                Ok(()) => warn!(
                    path = %path.display(),
                    backup = %backup.display(),
                    error = %e,
                    "moved unreadable store aside"
                ),
                Err(rename_error) => warn!(
                    path = %path.display(),
                    error = %e,
                    rename_error = %rename_error,
                    "ignoring unreadable store"
                ),
            }
            T::default()
        }
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(CORRUPT_SUFFIX);
    PathBuf::from(name)
}

fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CitationError::io(parent, e))?;
    }
    let text = serde_json::to_string_pretty(value).map_err(|e| CitationError::Store {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, text).map_err(|e| CitationError::io(path, e))
}

/// Most-recent-first list of directories picked for one role.
#[derive(Debug, Clone)]
pub struct RecentDirectories {
    path: PathBuf,
    entries: Vec<String>,
}

impl RecentDirectories {
    /// Loads the history stored at `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut entries: Vec<String> = load_json::<Vec<Option<String>>>(&path)
            .into_iter()
            .flatten()
            .collect();
        entries.truncate(MAX_HISTORY);
        Self { path, entries }
    }

    /// Moves `dir` to the front of the history, dropping the oldest entry
    /// past [`MAX_HISTORY`]. Blank entries and the picker placeholder are
    /// ignored.
    pub fn remember(&mut self, dir: &str) -> &mut Self {
        if !is_selected(Path::new(dir)) {
            return self;
        }
        self.entries.retain(|entry| entry != dir);
        self.entries.insert(0, dir.to_string());
        self.entries.truncate(MAX_HISTORY);
        self
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Most recent entry, if any.
    pub fn latest(&self) -> Option<&str> {
        self.entries.first().map(String::as_str)
    }

    /// Writes the history back to its file.
    pub fn save(&self) -> Result<()> {
        save_json(&self.path, &self.entries)
    }
}

/// Titles of citations already filed, used to skip duplicates.
#[derive(Debug, Clone)]
pub struct TitleCache {
    path: PathBuf,
    titles: BTreeSet<String>,
}

impl TitleCache {
    /// Loads the cache. `null` entries, written for untitled records by
    /// older caches, are skipped.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let titles = load_json::<Vec<Option<String>>>(&path)
            .into_iter()
            .flatten()
            .collect();
        Self { path, titles }
    }

    pub fn contains(&self, title: &str) -> bool {
        self.titles.contains(title)
    }

    /// Adds titles to the cache.
    pub fn merge<I, S>(&mut self, titles: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.titles.extend(titles.into_iter().map(Into::into));
        self
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn save(&self) -> Result<()> {
        save_json(&self.path, &self.titles)
    }
}

/// Every record filed so far, in filing order.
#[derive(Debug, Clone)]
pub struct RecordArchive {
    path: PathBuf,
    records: Vec<CitationRecord>,
}

impl RecordArchive {
    /// Loads the archive. Anything other than a JSON array of records loads
    /// as an empty archive.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = load_json(&path);
        Self { path, records }
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = CitationRecord>) -> &mut Self {
        self.records.extend(records);
        self
    }

    pub fn records(&self) -> &[CitationRecord] {
        &self.records
    }

    pub fn save(&self) -> Result<()> {
        save_json(&self.path, &self.records)
    }
}

/// All stores a run reads and updates, located in one data directory.
#[derive(Debug, Clone)]
pub struct Stores {
    pub source_history: RecentDirectories,
    pub target_history: RecentDirectories,
    pub titles: TitleCache,
    pub archive: RecordArchive,
}

impl Stores {
    /// Loads every store from `data_dir`.
    pub fn load(data_dir: &Path) -> Self {
        Self {
            source_history: RecentDirectories::load(data_dir.join(SOURCE_HISTORY_FILE)),
            target_history: RecentDirectories::load(data_dir.join(TARGET_HISTORY_FILE)),
            titles: TitleCache::load(data_dir.join(TITLE_CACHE_FILE)),
            archive: RecordArchive::load(data_dir.join(RECORD_ARCHIVE_FILE)),
        }
    }

    /// Saves the directory histories.
    pub fn save_history(&self) -> Result<()> {
        self.source_history.save()?;
        self.target_history.save()
    }
}
