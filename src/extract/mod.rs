// Metadata extraction from a directory of structured documents

pub mod record;
pub mod tei;

pub use record::*;
pub use tei::*;

use crate::config::InputConfig;
use crate::error::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Result of extracting one file
#[derive(Debug)]
pub enum FileOutcome {
    Parsed(PaperRecord),
    Failed { filename: String, cause: String },
}

/// A file that could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractFailure {
    pub filename: String,
    pub cause: String,
}

/// Records extracted from a directory, in listing order, plus failures.
///
/// The position of a record in `records` is its id for the rest of the run.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub records: Vec<PaperRecord>,
    pub failures: Vec<ExtractFailure>,
}

impl ExtractionReport {
    /// Fold a single file outcome into the report
    pub fn push(&mut self, outcome: FileOutcome) {
        match outcome {
            FileOutcome::Parsed(record) => self.records.push(record),
            FileOutcome::Failed { filename, cause } => {
                self.failures.push(ExtractFailure { filename, cause })
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Walks an input directory and parses every matching structured file
pub struct Extractor {
    config: InputConfig,
    pattern: glob::Pattern,
    parser: TeiParser,
    verbose: bool,
}

impl Extractor {
    /// Create a new extractor for the given input settings
    pub fn new(config: InputConfig) -> Result<Self> {
        let pattern = glob::Pattern::new(&config.pattern)?;

        Ok(Self {
            config,
            pattern,
            parser: TeiParser::new(),
            verbose: false,
        })
    }

    /// Show a progress bar while parsing
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// List structured files directly inside the input directory, sorted by name
    pub fn discover_files(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.directory;
        if !dir.is_dir() {
            return Err(Error::PathNotFound(dir.clone()));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.pattern.matches(&name) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    /// Parse a single file into a tagged outcome
    pub fn extract_file(&self, path: &Path) -> FileOutcome {
        match self.parser.parse_file(path) {
            Ok(record) => FileOutcome::Parsed(record),
            Err(e) => {
                let filename = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                let cause = match e {
                    Error::Parse { message, .. } => message,
                    other => other.to_string(),
                };
                tracing::warn!(file = %filename, error = %cause, "skipping unparseable document");
                FileOutcome::Failed { filename, cause }
            }
        }
    }

    /// Parse every discovered file; single file failures never abort the batch
    pub fn extract(&self) -> Result<ExtractionReport> {
        let files = self.discover_files()?;
        tracing::info!(
            directory = %self.config.directory.display(),
            files = files.len(),
            "extracting metadata"
        );

        let progress = if self.verbose {
            let pb = ProgressBar::new(files.len() as u64);
            let template = "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
            if let Ok(style) = ProgressStyle::default_bar().template(template) {
                pb.set_style(style.progress_chars("#>-"));
            }
            Some(pb)
        } else {
            None
        };

        let mut report = ExtractionReport::default();
        for path in &files {
            if let Some(ref pb) = progress {
                let msg = path.file_name().unwrap_or_default().to_string_lossy().to_string();
                pb.set_message(msg);
                pb.inc(1);
            }

            report.push(self.extract_file(path));
        }

        if let Some(pb) = progress {
            pb.finish_with_message("Extraction complete");
        }

        tracing::info!(
            parsed = report.records.len(),
            failed = report.failures.len(),
            "extraction finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::record::record_with_refs;
    use std::fs;
    use tempfile::TempDir;

    fn paper(title: &str, refs: &[&str]) -> String {
        let bibl: String = refs
            .iter()
            .map(|r| format!("<biblStruct><analytic><title>{}</title></analytic></biblStruct>", r))
            .collect();
        format!(
            r#"<TEI xmlns="http://www.tei-c.org/ns/1.0"><teiHeader><fileDesc><titleStmt><title>{}</title></titleStmt></fileDesc></teiHeader><text><back><listBibl>{}</listBibl></back></text></TEI>"#,
            title, bibl
        )
    }

    fn input_config(dir: &Path) -> InputConfig {
        InputConfig {
            directory: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_discover_files_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.grobid.tei.xml"), paper("B", &[])).unwrap();
        fs::write(dir.path().join("a.grobid.tei.xml"), paper("A", &[])).unwrap();
        fs::write(dir.path().join("notes.xml"), "<x/>").unwrap();
        fs::write(dir.path().join("paper.pdf"), "%PDF").unwrap();
        fs::create_dir(dir.path().join("nested.grobid.tei.xml")).unwrap();

        let extractor = Extractor::new(input_config(dir.path())).unwrap();
        let files = extractor.discover_files().unwrap();

        assert_eq!(files.len(), 2);
        assert!(files[0].ends_with("a.grobid.tei.xml"));
        assert!(files[1].ends_with("b.grobid.tei.xml"));
    }

    #[test]
    fn test_discover_missing_directory() {
        let extractor = Extractor::new(input_config(Path::new("/nonexistent/xml"))).unwrap();
        assert!(matches!(extractor.discover_files(), Err(Error::PathNotFound(_))));
    }

    #[test]
    fn test_extract_skips_broken_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("1.grobid.tei.xml"), paper("First", &["X"])).unwrap();
        fs::write(dir.path().join("2.grobid.tei.xml"), "<TEI><oops></TEI>").unwrap();
        fs::write(dir.path().join("3.grobid.tei.xml"), paper("Third", &["x"])).unwrap();

        let extractor = Extractor::new(input_config(dir.path())).unwrap();
        let report = extractor.extract().unwrap();

        let titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Third"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].filename, "2.grobid.tei.xml");
        assert!(!report.failures[0].cause.is_empty());
    }

    #[test]
    fn test_extract_file_outcome() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ok.grobid.tei.xml");
        fs::write(&path, paper("Fine", &[])).unwrap();

        let extractor = Extractor::new(input_config(dir.path())).unwrap();
        match extractor.extract_file(&path) {
            FileOutcome::Parsed(record) => assert_eq!(record.title, "Fine"),
            FileOutcome::Failed { cause, .. } => panic!("unexpected failure: {}", cause),
        }

        let missing = dir.path().join("gone.grobid.tei.xml");
        assert!(matches!(
            extractor.extract_file(&missing),
            FileOutcome::Failed { .. }
        ));
    }

    #[test]
    fn test_custom_pattern() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.tei.xml"), paper("A", &[])).unwrap();
        fs::write(dir.path().join("b.grobid.tei.xml"), paper("B", &[])).unwrap();

        let config = InputConfig {
            directory: dir.path().to_path_buf(),
            pattern: "*.tei.xml".to_string(),
        };
        let extractor = Extractor::new(config).unwrap();
        assert_eq!(extractor.discover_files().unwrap().len(), 2);
    }

    #[test]
    fn test_report_is_empty() {
        let mut report = ExtractionReport::default();
        assert!(report.is_empty());
        report.push(FileOutcome::Failed {
            filename: "x".to_string(),
            cause: "bad".to_string(),
        });
        assert!(report.is_empty());
        report.push(FileOutcome::Parsed(record_with_refs("P", &[])));
        assert!(!report.is_empty());
    }

    #[test]
    fn test_with_verbose() {
        let extractor = Extractor::new(InputConfig::default()).unwrap().with_verbose(true);
        assert!(extractor.verbose);
    }
}
