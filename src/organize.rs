//! Moving citation files and PDFs into the library folder.
//!
//! Files are bucketed into folders named after their access date
//! (`Mar 11 2025`), and each citation file travels together with its
//! companion `.txt` citation file of the same stem.

use crate::CitationFormat;
use crate::error::{CitationError, Result};
use crate::utils::file_access_date;
use itertools::Itertools;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Extension of the companion citation text files.
pub const COMPANION_EXTENSION: &str = "txt";

/// Outcome of a batch of file moves.
#[derive(Debug, Default)]
pub struct MoveReport {
    /// Destinations of files that were moved
    pub moved: Vec<PathBuf>,
    /// Entries left in place because they were not eligible
    pub skipped: Vec<PathBuf>,
    /// Files that could not be moved, with the reason
    pub failed: Vec<(PathBuf, CitationError)>,
}

impl MoveReport {
    fn record(&mut self, source: &Path, destination: PathBuf, result: io::Result<()>) {
        match result {
            Ok(()) => {
                info!(from = %source.display(), to = %destination.display(), "moved file");
                self.moved.push(destination);
            }
            Err(e) => {
                warn!(path = %source.display(), error = %e, "could not move file");
                self.failed
                    .push((source.to_path_buf(), CitationError::io(source, e)));
            }
        }
    }
}

/// Whether `path` is a regular file with a citation export extension.
pub fn is_citation_file(path: &Path) -> bool {
    CitationFormat::from_path(path).is_some() && path.is_file()
}

/// Citation files directly inside `dir`, sorted by path.
///
/// # Errors
///
/// Returns [`CitationError::Io`] if `dir` cannot be listed.
pub fn list_citation_files(dir: &Path) -> Result<Vec<PathBuf>> {
    Ok(read_entries(dir)?
        .into_iter()
        .filter(|path| is_citation_file(path))
        .sorted()
        .collect())
}

/// Moves every citation file from `source` into `target`, creating
/// `target` if needed. Folders and other files stay where they are.
///
/// # Errors
///
/// Returns [`CitationError::DirectoryNotFound`] if `source` does not exist,
/// or [`CitationError::Io`] if either directory cannot be accessed.
/// Failures on individual files are collected in the report instead.
pub fn move_citation_files(source: &Path, target: &Path) -> Result<MoveReport> {
    if !source.is_dir() {
        return Err(CitationError::DirectoryNotFound(source.to_path_buf()));
    }
    fs::create_dir_all(target).map_err(|e| CitationError::io(target, e))?;

    let mut report = MoveReport::default();
    for path in read_entries(source)? {
        if !is_citation_file(&path) {
            debug!(path = %path.display(), "skipping non-citation entry");
            report.skipped.push(path);
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        let destination = target.join(name);
        let result = move_file(&path, &destination);
        report.record(&path, destination, result);
    }
    Ok(report)
}

/// Moves PDFs into `target/<access date>/`, one date folder per file.
///
/// A PDF that cannot be read or moved is reported and the rest continue.
pub fn move_pdfs(pdfs: &[PathBuf], target: &Path) -> MoveReport {
    let mut report = MoveReport::default();
    for pdf in pdfs {
        let result = date_folder(pdf, target).and_then(|folder| {
            let name = pdf.file_name().ok_or_else(|| {
                io::Error::new(io::ErrorKind::InvalidInput, "path has no file name")
            })?;
            Ok(folder.join(name))
        });
        match result {
            Ok(destination) => {
                let moved = move_file(pdf, &destination);
                report.record(pdf, destination, moved);
            }
            Err(e) => {
                warn!(path = %pdf.display(), error = %e, "cannot access PDF");
                report.failed.push((pdf.clone(), CitationError::io(pdf, e)));
            }
        }
    }
    report
}

/// Moves each citation file in `dir`, together with its same-stem `.txt`
/// companion, into `dir/<access date of the citation file>/`.
///
/// # Errors
///
/// Returns [`CitationError::Io`] if `dir` cannot be listed.
pub fn organize_by_date(dir: &Path) -> Result<MoveReport> {
    let entries = read_entries(dir)?;
    let companions: HashMap<String, PathBuf> = entries
        .iter()
        .filter(|path| path.is_file() && has_extension(path, COMPANION_EXTENSION))
        .filter_map(|path| Some((stem_of(path)?, path.clone())))
        .collect();

    let mut report = MoveReport::default();
    for citation in entries.iter().filter(|p| is_citation_file(p)).sorted() {
        let folder = match date_folder(citation, dir) {
            Ok(folder) => folder,
            Err(e) => {
                warn!(path = %citation.display(), error = %e, "cannot date citation file");
                report
                    .failed
                    .push((citation.clone(), CitationError::io(citation, e)));
                continue;
            }
        };

        let companion = stem_of(citation).and_then(|stem| companions.get(&stem));
        for path in std::iter::once(citation).chain(companion) {
            if !path.exists() {
                continue;
            }
            if let Some(name) = path.file_name() {
                let destination = folder.join(name);
                let result = move_file(path, &destination);
                report.record(path, destination, result);
            }
        }
    }
    Ok(report)
}

/// Moves a file, falling back to copy and delete when a rename is not
/// possible (e.g. across filesystems).
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    match fs::rename(source, destination) {
        Ok(()) => Ok(()),
        Err(rename_error) => {
            if !source.is_file() {
                return Err(rename_error);
            }
            copy_and_remove(source, destination, |path| fs::remove_file(path))
        }
    }
}

/// Copies `source` to `destination`, then removes `source` with `remove`.
/// If removal fails the copy is deleted again, so the file stays in exactly
/// one place.
fn copy_and_remove(
    source: &Path,
    destination: &Path,
    remove: impl FnOnce(&Path) -> io::Result<()>,
) -> io::Result<()> {
    fs::copy(source, destination)?;
    remove(source).inspect_err(|_| {
        if let Err(e) = fs::remove_file(destination) {
            warn!(path = %destination.display(), error = %e, "could not remove partial copy");
        }
    })
}

/// Creates and returns `root/<access date of file>`.
fn date_folder(file: &Path, root: &Path) -> io::Result<PathBuf> {
    let folder = root.join(file_access_date(file)?);
    fs::create_dir_all(&folder)?;
    Ok(folder)
}

fn read_entries(dir: &Path) -> Result<Vec<PathBuf>> {
    fs::read_dir(dir)
        .and_then(|entries| {
            entries
                .map(|entry| entry.map(|e| e.path()))
                .collect::<io::Result<Vec<_>>>()
        })
        .map_err(|e| CitationError::io(dir, e))
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}

fn stem_of(path: &Path) -> Option<String> {
    path.file_stem().map(|stem| stem.to_string_lossy().into_owned())
}
