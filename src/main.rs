//! Command-line front end for orlit.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use itertools::Itertools;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use orlit::config::default_data_dir;
use orlit::pipeline::render_file;
use orlit::{CitationError, CitationStyle, Pipeline, RecordParser, RuleSet, RunConfig, Stores};

/// File citation exports into a dated library with a spreadsheet index
#[derive(Parser)]
#[command(name = "orlit")]
#[command(version)]
#[command(after_help = "\
Examples:
  orlit run --source ~/Downloads --target ~/Library/Papers --style \"MLA 9\"
  orlit run --target ~/Library/Papers --pdf ~/Downloads/paper.pdf
  orlit parse ~/Downloads/smith2020.ris --style IEEE
  orlit styles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Move, parse, cite and file every citation export
    Run {
        /// Folder to pick citation exports up from (default: most recent source)
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Library folder (default: most recent target)
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Citation style name (see 'styles' command)
        #[arg(long, default_value = "APA")]
        style: String,

        /// PDF to file alongside the citations; may be repeated
        #[arg(long = "pdf")]
        pdfs: Vec<PathBuf>,

        /// Field extraction rule table
        #[arg(long, value_enum, default_value_t = RuleSet::Standard)]
        rules: RuleSet,

        /// Spreadsheet file name inside the target folder
        #[arg(long)]
        spreadsheet: Option<String>,

        /// Folder for history, title cache and archive (default: ~/.orlit)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Parse files one at a time
        #[arg(long)]
        sequential: bool,
    },

    /// Parse one citation file and print the record and citations
    Parse {
        /// Citation export file
        file: PathBuf,

        /// Citation style name
        #[arg(long, default_value = "APA")]
        style: String,

        /// Field extraction rule table
        #[arg(long, value_enum, default_value_t = RuleSet::Standard)]
        rules: RuleSet,
    },

    /// List supported citation styles
    Styles,

    /// Show recently used source and target folders
    History {
        /// Folder holding the history files (default: ~/.orlit)
        #[arg(long)]
        data_dir: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "orlit=info".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "orlit failed");
            eprintln!("error: {e}");
            ExitCode::from(exit_code(&e))
        }
    }
}

fn execute(command: Commands) -> orlit::Result<()> {
    match command {
        Commands::Run {
            source,
            target,
            style,
            pdfs,
            rules,
            spreadsheet,
            data_dir,
            sequential,
        } => {
            let data_dir = data_dir.unwrap_or_else(default_data_dir);
            let mut stores = Stores::load(&data_dir);
            let source = source
                .or_else(|| stores.source_history.latest().map(PathBuf::from))
                .ok_or(CitationError::MissingDirectory("source"))?;
            let target = target
                .or_else(|| stores.target_history.latest().map(PathBuf::from))
                .ok_or(CitationError::MissingDirectory("target"))?;

            let mut config = RunConfig::new(source, target);
            config
                .set_style(style)
                .add_pdfs(pdfs)
                .set_rules(rules)
                .set_data_dir(data_dir)
                .set_parallel(!sequential);
            if let Some(name) = spreadsheet {
                config.set_spreadsheet_name(name);
            }

            let summary = Pipeline::new(config).run(&mut stores)?;
            println!(
                "Parsed {} citation files, filed {} new, skipped {} duplicates",
                summary.parsed,
                summary.appended,
                summary.duplicates.len()
            );
            for (path, e) in &summary.failures {
                println!("  failed: {}: {e}", path.display());
            }
            Ok(())
        }
        Commands::Parse { file, style, rules } => {
            let style: CitationStyle = style.parse()?;
            let parser = RecordParser::new().with_rules(rules);
            let (record, rendering) = render_file(&parser, &file, style)?;
            let json =
                serde_json::to_string_pretty(&record).map_err(CitationError::Serialize)?;
            println!("{json}");
            println!();
            print!("{}", rendering.companion_text());
            Ok(())
        }
        Commands::Styles => {
            for style in CitationStyle::ALL {
                if style.has_in_text() {
                    println!("{style}");
                } else {
                    println!("{style} (bibliography only)");
                }
            }
            Ok(())
        }
        Commands::History { data_dir } => {
            let stores = Stores::load(&data_dir.unwrap_or_else(default_data_dir));
            println!("Sources: {}", stores.source_history.entries().iter().join(", "));
            println!("Targets: {}", stores.target_history.entries().iter().join(", "));
            Ok(())
        }
    }
}

/// Process exit code for each error kind.
fn exit_code(e: &CitationError) -> u8 {
    match e {
        CitationError::FileAccess { .. } => 10,
        CitationError::UnsupportedStyle(_) => 11,
        CitationError::DirectoryNotFound(_) | CitationError::MissingDirectory(_) => 12,
        CitationError::Io { .. } => 13,
        CitationError::Spreadsheet(_) => 14,
        CitationError::Store { .. } => 15,
        CitationError::Serialize(_) => 16,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_exit_codes_per_error_kind() {
        let serialize = serde_json::from_str::<u8>("x").unwrap_err();
        let store = serde_json::from_str::<u8>("x").unwrap_err();

        assert_eq!(exit_code(&CitationError::Serialize(serialize)), 16);
        assert_eq!(
            exit_code(&CitationError::Store {
                path: PathBuf::from("titles_cache.json"),
                source: store,
            }),
            15
        );
        assert_eq!(exit_code(&CitationError::MissingDirectory("source")), 12);
    }
}
