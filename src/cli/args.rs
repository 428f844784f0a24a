//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Link scholarly papers by shared references
#[derive(Parser, Debug)]
#[command(name = "refgraph")]
#[command(about = "Link scholarly papers by shared references and render an interactive graph")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the overlap graph from a directory of structured documents
    Build {
        /// Directory of TEI files (defaults to the configured input directory)
        input: Option<PathBuf>,

        /// Output artifact path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (html, json)
        #[arg(long)]
        format: Option<String>,

        /// Structure the PDFs in this directory with GROBID first
        #[arg(long)]
        pdfs: Option<PathBuf>,

        /// GROBID server URL
        #[arg(long)]
        grobid_url: Option<String>,

        /// Re-process PDFs that already have a structured file
        #[arg(long)]
        force: bool,

        /// Do not open the artifact when done
        #[arg(long)]
        no_open: bool,

        /// Count shared references through an inverted index
        #[arg(long)]
        indexed: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Parse structured documents and print the extracted records as JSON
    Extract {
        /// Directory of TEI files
        input: PathBuf,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show version information
    Version,
}
