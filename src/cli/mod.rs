//! CLI module for Refgraph

mod args;

pub use args::{Args, Command};

use crate::analysis::BuildStrategy;
use crate::config::{CliOverrides, Config, OutputFormat, DEFAULT_CONFIG_FILE};
use crate::error::{Error, Result};
use crate::extract::{ExtractFailure, PaperRecord};
use crate::output::FileSink;
use crate::pipeline::Pipeline;
use crate::structure::GrobidClient;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();
    init_tracing(is_verbose(&args));

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn is_verbose(args: &Args) -> bool {
    matches!(args.command, Command::Build { verbose: true, .. })
}

/// Log to stderr; `RUST_LOG` overrides the default level
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_config(path: Option<&Path>) -> Config {
    match path {
        Some(path) => Config::load_or_default(path),
        None => Config::load_or_default(Path::new(DEFAULT_CONFIG_FILE)),
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Build {
            input,
            output,
            config,
            format,
            pdfs,
            grobid_url,
            force,
            no_open,
            indexed,
            verbose,
        } => {
            let mut cfg = load_config(config.as_deref());

            let format = format.as_deref().map(OutputFormat::from_name).transpose()?;
            cfg.merge_cli(CliOverrides {
                input,
                output,
                format,
                grobid_url,
                force,
                no_open,
            });
            cfg.validate()?;

            if verbose {
                println!("Input: {}", cfg.input.directory.display());
                println!("Pattern: {}", cfg.input.pattern);
                println!("Output: {}", cfg.output.path.display());
                println!("Format: {:?}", cfg.output.format);
            }

            if let Some(pdf_dir) = pdfs {
                structure_pdfs(&cfg, &pdf_dir)?;
            }

            let strategy = if indexed {
                BuildStrategy::Indexed
            } else {
                BuildStrategy::Pairwise
            };

            println!("Building overlap graph...");
            let mut sink = FileSink::new(&cfg.output.path);
            let summary = Pipeline::new(cfg.clone())
                .with_strategy(strategy)
                .with_verbose(verbose)
                .run(&mut sink)?;

            println!("Graph complete: {}", summary.summary());
            print_failures(&summary.failures);

            if let Some(path) = &summary.artifact {
                println!("Graph written to: {}", path.display());
                if cfg.output.open {
                    open_in_viewer(path);
                }
            }

            Ok(())
        }

        Command::Extract {
            input,
            output,
            config,
        } => {
            let mut cfg = load_config(config.as_deref());
            cfg.merge_cli(CliOverrides {
                input: Some(input),
                ..Default::default()
            });

            let report = Pipeline::new(cfg).extract()?;
            let dump = ExtractDump {
                records: &report.records,
                failures: &report.failures,
            };
            let json = serde_json::to_string_pretty(&dump)?;

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, json)?;
                    println!(
                        "{} records written to: {}",
                        report.records.len(),
                        path.display()
                    );
                }
                None => println!("{}", json),
            }

            Ok(())
        }

        Command::Version => {
            println!("refgraph {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct ExtractDump<'a> {
    records: &'a [PaperRecord],
    failures: &'a [ExtractFailure],
}

/// Run the GROBID conversion into the configured input directory
fn structure_pdfs(cfg: &Config, pdf_dir: &Path) -> Result<()> {
    if !pdf_dir.exists() {
        return Err(Error::PathNotFound(pdf_dir.to_path_buf()));
    }

    println!("Structuring PDFs from {}...", pdf_dir.display());
    let client = GrobidClient::new(&cfg.grobid)?;
    let report = client.process_directory(pdf_dir, &cfg.input.directory)?;

    println!(
        "Structured {} PDFs ({} already done, {} failed)",
        report.converted.len(),
        report.skipped,
        report.failures.len()
    );
    for failure in report.failures.iter().take(5) {
        println!("  {}: {}", failure.pdf.display(), failure.cause);
    }

    Ok(())
}

fn print_failures(failures: &[ExtractFailure]) {
    if failures.is_empty() {
        return;
    }

    println!("\nSkipped files ({}):", failures.len());
    for failure in failures.iter().take(5) {
        println!("  {}: {}", failure.filename, failure.cause);
    }
    if failures.len() > 5 {
        println!("  ... and {} more", failures.len() - 5);
    }
}

fn open_in_viewer(path: &Path) {
    let target: PathBuf = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if let Err(e) = open::that(&target) {
        tracing::warn!(path = %target.display(), error = %e, "could not open viewer");
    }
}
