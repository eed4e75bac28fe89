//! The filing workflow for one run.
//!
//! A run moves citation exports from the source folder into the target
//! folder, parses and renders each one, writes a companion citation text
//! file, appends spreadsheet rows, and finally sorts citations and their
//! companions into date folders. A failure on one file is logged and
//! reported in the [`RunSummary`]; it never stops the rest of the batch.

use crate::config::RunConfig;
use crate::error::{CitationError, Result};
use crate::organize::{self, COMPANION_EXTENSION, MoveReport};
use crate::record::RecordParser;
use crate::spreadsheet::{FiledCitation, Spreadsheet};
use crate::store::Stores;
use crate::style::{CitationRendering, CitationStyle, render};
use crate::CitationRecord;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// What happened during a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Citation files moved from the source folder
    pub moved: usize,
    /// PDFs filed into date folders
    pub pdfs_moved: usize,
    /// Citation files parsed successfully
    pub parsed: usize,
    /// Citation files skipped because their title was already filed
    pub duplicates: Vec<PathBuf>,
    /// Rows appended to the spreadsheet
    pub appended: usize,
    /// Files moved into date folders at the end of the run
    pub organized: usize,
    /// Files that failed at some step, with the reason
    pub failures: Vec<(PathBuf, CitationError)>,
}

impl RunSummary {
    fn absorb(&mut self, report: MoveReport) -> usize {
        self.failures.extend(report.failed);
        report.moved.len()
    }
}

/// Runs the filing workflow for a [`RunConfig`].
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: RunConfig,
    parser: RecordParser,
}

impl Pipeline {
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        let parser = RecordParser::new().with_rules(config.rules());
        Self { config, parser }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Runs every step and updates `stores`.
    ///
    /// # Errors
    ///
    /// Fails before touching any file if the configuration is invalid.
    /// Afterwards only errors on shared outputs (target folder, spreadsheet,
    /// stores) abort the run; per-file errors go into the summary.
    pub fn run(&self, stores: &mut Stores) -> Result<RunSummary> {
        self.config.validate()?;
        let style = self.config.style()?;
        let source = self.config.source_dir();
        let target = self.config.target_dir();
        fs::create_dir_all(target).map_err(|e| CitationError::io(target, e))?;

        info!(
            source = %source.display(),
            target = %target.display(),
            style = %style,
            "starting run"
        );
        let mut summary = RunSummary::default();

        match organize::move_citation_files(source, target) {
            Ok(report) => summary.moved = summary.absorb(report),
            Err(CitationError::DirectoryNotFound(dir)) => {
                warn!(path = %dir.display(), "source directory does not exist");
            }
            Err(e) => return Err(e),
        }
        summary.pdfs_moved = summary.absorb(organize::move_pdfs(self.config.pdfs(), target));

        let files = organize::list_citation_files(target)?;
        let parsed = self.parse_all(&files);

        let mut seen = HashSet::new();
        let mut filed = Vec::new();
        for (path, result) in files.into_iter().zip(parsed) {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping citation file");
                    summary.failures.push((path, e));
                    continue;
                }
            };
            summary.parsed += 1;

            let duplicate = record.title.as_deref().is_some_and(|title| {
                stores.titles.contains(title) || !seen.insert(title.to_string())
            });
            if duplicate {
                info!(path = %path.display(), title = ?record.title, "skipping duplicate citation");
                summary.duplicates.push(path);
                continue;
            }

            let rendering = render(&record, style);
            let companion_file = match write_companion(&path, target, &rendering) {
                Ok(name) => Some(name),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "could not write citation text");
                    summary.failures.push((path.clone(), e));
                    None
                }
            };
            filed.push(FiledCitation {
                record,
                companion_file,
            });
        }

        let mut spreadsheet = Spreadsheet::open_or_create(self.config.spreadsheet_path())?;
        summary.appended = spreadsheet.append(&mut filed, target)?;
        if filed.is_empty() {
            info!("no new citations found; all citation files were duplicates");
        }

        stores
            .titles
            .merge(filed.iter().filter_map(|f| f.record.title.clone()));
        stores.titles.save()?;

        summary.organized = summary.absorb(organize::organize_by_date(target)?);

        stores
            .archive
            .extend(filed.into_iter().map(|f| f.record));
        stores.archive.save()?;

        stores
            .source_history
            .remember(&source.to_string_lossy());
        stores
            .target_history
            .remember(&target.to_string_lossy());
        stores.save_history()?;

        info!(
            parsed = summary.parsed,
            appended = summary.appended,
            duplicates = summary.duplicates.len(),
            failures = summary.failures.len(),
            "run complete"
        );
        Ok(summary)
    }

    /// Parses every file, in parallel when enabled. Results keep the order
    /// of `files`.
    fn parse_all(&self, files: &[PathBuf]) -> Vec<Result<CitationRecord>> {
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel() {
                use rayon::prelude::*;
                return files
                    .par_iter()
                    .map(|path| self.parser.parse_file(path))
                    .collect();
            }
        }
        files
            .iter()
            .map(|path| self.parser.parse_file(path))
            .collect()
    }
}

/// Writes `<stem>.txt` with both citation forms into `dir`, returning the
/// file name.
fn write_companion(
    citation: &Path,
    dir: &Path,
    rendering: &CitationRendering,
) -> Result<String> {
    let stem = citation
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}.{COMPANION_EXTENSION}");
    let path = dir.join(&name);
    fs::write(&path, rendering.companion_text()).map_err(|e| CitationError::io(&path, e))?;
    Ok(name)
}

/// Renders a single citation file without filing it.
///
/// # Errors
///
/// Returns [`CitationError::FileAccess`] if the file cannot be read.
pub fn render_file(
    parser: &RecordParser,
    path: &Path,
    style: CitationStyle,
) -> Result<(CitationRecord, CitationRendering)> {
    let record = parser.parse_file(path)?;
    let rendering = render(&record, style);
    Ok((record, rendering))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_access_date;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    struct Fixture {
        _root: TempDir,
        source: PathBuf,
        target: PathBuf,
        data: PathBuf,
    }

    fn fixture() -> Fixture {
        let root = TempDir::new().unwrap();
        let source = root.path().join("downloads");
        let target = root.path().join("library");
        let data = root.path().join("data");
        fs::create_dir_all(&source).unwrap();
        Fixture {
            source,
            target,
            data,
            _root: root,
        }
    }

    fn config(fx: &Fixture) -> RunConfig {
        let mut config = RunConfig::new(&fx.source, &fx.target);
        config.set_data_dir(&fx.data).set_parallel(false);
        config
    }

    #[test]
    fn test_run_files_citation() {
        let fx = fixture();
        let citation = fx.source.join("doe2020.ris");
        fs::write(
            &citation,
            "TY  - JOUR\nTI  - Filed Title\nAU  - Doe, Jane\nDA  - 2020\nER  -\n",
        )
        .unwrap();
        let date = file_access_date(&citation).unwrap();

        let config = config(&fx);
        let mut stores = Stores::load(config.data_dir());
        let summary = Pipeline::new(config).run(&mut stores).unwrap();

        assert_eq!(summary.moved, 1);
        assert_eq!(summary.parsed, 1);
        assert_eq!(summary.appended, 1);
        assert!(summary.failures.is_empty());

        let folder = fx.target.join(&date);
        assert!(folder.join("doe2020.ris").is_file());
        let companion = fs::read_to_string(folder.join("doe2020.txt")).unwrap();
        assert!(companion.contains(" (Doe Jane, 2020)\n"));
        assert!(fx.target.join("Literature Organisation.csv").is_file());

        assert!(stores.titles.contains("Filed Title"));
        assert_eq!(stores.archive.records().len(), 1);
        assert_eq!(stores.archive.records()[0].serial_number, Some(1));
        assert_eq!(
            stores.target_history.latest(),
            Some(fx.target.to_string_lossy().as_ref())
        );
    }

    #[test]
    fn test_run_skips_cached_and_repeated_titles() {
        let fx = fixture();
        fs::write(fx.source.join("a.ris"), "TI  - Same Title\n").unwrap();
        fs::write(fx.source.join("b.bib"), "  title = {Same Title},\n").unwrap();
        fs::write(fx.source.join("c.enw"), "%T Cached Title\n").unwrap();

        let config = config(&fx);
        let mut stores = Stores::load(config.data_dir());
        stores.titles.merge(["Cached Title"]);
        let summary = Pipeline::new(config).run(&mut stores).unwrap();

        assert_eq!(summary.parsed, 3);
        assert_eq!(summary.appended, 1);
        assert_eq!(summary.duplicates.len(), 2);
    }

    #[test]
    fn test_run_records_unreadable_file_and_continues() {
        let fx = fixture();
        fs::write(fx.source.join("bad.ris"), [0xff, 0xfe, 0xfd]).unwrap();
        fs::write(fx.source.join("good.ris"), "TI  - Good Title\n").unwrap();

        let config = config(&fx);
        let mut stores = Stores::load(config.data_dir());
        let summary = Pipeline::new(config).run(&mut stores).unwrap();

        assert_eq!(summary.parsed, 1);
        assert_eq!(summary.appended, 1);
        assert_eq!(summary.failures.len(), 1);
        assert!(matches!(
            summary.failures[0].1,
            CitationError::FileAccess { .. }
        ));
    }

    #[test]
    fn test_run_rejects_unknown_style_before_moving() {
        let fx = fixture();
        let citation = fx.source.join("a.ris");
        fs::write(&citation, "TI  - Title\n").unwrap();

        let mut config = config(&fx);
        config.set_style("Harvard");
        let mut stores = Stores::load(config.data_dir());
        let result = Pipeline::new(config).run(&mut stores);

        assert!(matches!(result, Err(CitationError::UnsupportedStyle(_))));
        assert!(citation.exists());
    }

    #[test]
    fn test_run_with_missing_source_still_processes_target() {
        let fx = fixture();
        fs::create_dir_all(&fx.target).unwrap();
        fs::write(fx.target.join("left.ris"), "TI  - Left Behind\n").unwrap();

        let mut config = RunConfig::new(fx.source.join("gone"), &fx.target);
        config.set_data_dir(&fx.data).set_parallel(false);
        let mut stores = Stores::load(config.data_dir());
        let summary = Pipeline::new(config).run(&mut stores).unwrap();

        assert_eq!(summary.moved, 0);
        assert_eq!(summary.appended, 1);
    }

    #[test]
    fn test_render_file() {
        let fx = fixture();
        let citation = fx.source.join("one.ris");
        fs::write(&citation, "TI  - One\nAU  - Roe, R\nDA  - 2001\n").unwrap();

        let (record, rendering) =
            render_file(&RecordParser::new(), &citation, CitationStyle::Chicago).unwrap();
        assert_eq!(record.title.as_deref(), Some("One"));
        assert_eq!(rendering.in_text, "(Roe R 2001)");
    }
}
