mod config;
mod convert;
mod diagnostics;
mod discover;
mod error;
mod fetcher;
mod markup;
mod planner;
mod rebuilder;
mod resolver;
mod scanner;
mod types;
mod writer;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::fetcher::SourceFetcher;
use crate::markup::HtmlTagMarkup;
use crate::types::Relocation;

/// Environment variable overriding the `-v` log level.
const LOG_ENV: &str = "IMGPULL_LOG";

/// Command-line arguments.
#[derive(Parser)]
#[command(
    name = "imgpull",
    about = "Copy images referenced from markdown into a local directory and rewrite the references"
)]
struct Cli {
    /// Documents to convert in place; directories are searched for markdown
    #[arg(required = true)]
    files: Vec<PathBuf>,
    /// Directory receiving images, relative to the working directory [default: image]
    #[arg(long)]
    image_dir: Option<PathBuf>,
    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Install the stderr log subscriber. `IMGPULL_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| return EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    return match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            diagnostics::print_error(&e);
            ExitCode::from(2)
        },
    };
}

/// Convert every document named on the command line, one after another.
/// A failed document is reported and the run moves on.
///
/// # Errors
///
/// Returns run-level failures: unreadable config, image directory that
/// cannot be created, or a directory argument that cannot be walked.
fn run(cli: &Cli) -> Result<ExitCode, error::Error> {
    let working_dir = std::env::current_dir()?;
    let config = Config::load(&working_dir)?;
    let relocation = Relocation {
        image_dir: cli.image_dir.clone().unwrap_or_else(|| return config.image_dir.clone()),
        working_dir,
    };

    convert::prepare_image_dir(&relocation)?;
    let documents = discover::collect_documents(&cli.files, &config, &relocation.working_dir)?;
    let fetcher = SourceFetcher::new();

    let mut failed = 0_usize;
    for document in &documents {
        match convert::convert_document(document, &relocation, &fetcher, &HtmlTagMarkup) {
            Err(e) => {
                warn!(document = %document.display(), "conversion failed");
                diagnostics::print_error(&e);
                failed = failed.saturating_add(1);
            },
            Ok(report) => {
                let count = report.references();
                eprintln!("Converted {count} references in {}", document.display());
            },
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} documents failed", documents.len());
        return Ok(ExitCode::FAILURE);
    }
    return Ok(ExitCode::SUCCESS);
}
