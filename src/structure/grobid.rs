// Blocking GROBID client
//
// Uploads each PDF to `processFulltextDocument` and stores the returned
// TEI next to the other structured files. Transport errors and 503
// responses are retried with exponential backoff.

use crate::config::GrobidConfig;
use crate::error::{Error, Result};
use reqwest::blocking::{multipart, Client};
use reqwest::StatusCode;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use walkdir::WalkDir;

/// Suffix of the structured file written for each PDF
pub const STRUCTURED_SUFFIX: &str = ".grobid.tei.xml";

/// Retry schedule for a single upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff: Duration,
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (0 based): backoff, 2x, 4x, ...
    pub fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// A PDF the service could not convert
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StructuringFailure {
    pub pdf: PathBuf,
    pub cause: String,
}

/// Outcome of structuring a directory of PDFs
#[derive(Debug, Default)]
pub struct StructuringReport {
    /// Structured files written during this run
    pub converted: Vec<PathBuf>,
    /// PDFs that already had a structured file
    pub skipped: usize,
    pub failures: Vec<StructuringFailure>,
}

enum AttemptError {
    Retryable(String),
    Fatal(String),
}

/// Client for a GROBID server
pub struct GrobidClient {
    base_url: String,
    http: Client,
    retry: RetryPolicy,
    consolidate_header: bool,
    force: bool,
}

impl GrobidClient {
    /// Create a client from config; the timeout applies to each request
    pub fn new(config: &GrobidConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.url.trim_end_matches('/').to_string(),
            http,
            retry: RetryPolicy {
                max_retries: config.max_retries,
                backoff: Duration::from_millis(config.retry_backoff_ms),
            },
            consolidate_header: config.consolidate_header,
            force: config.force,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    /// Whether the server answers its liveness probe
    pub fn is_alive(&self) -> bool {
        match self.http.get(self.endpoint("isalive")).send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "liveness probe failed");
                false
            }
        }
    }

    /// Convert one PDF, retrying transient failures
    pub fn process_pdf(&self, pdf: &Path) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.try_process(pdf) {
                Ok(tei) => return Ok(tei),
                Err(AttemptError::Retryable(cause)) if attempt < self.retry.max_retries => {
                    let delay = self.retry.delay(attempt);
                    tracing::warn!(
                        pdf = %pdf.display(),
                        attempt = attempt + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %cause,
                        "retrying structuring request"
                    );
                    thread::sleep(delay);
                    attempt += 1;
                }
                Err(AttemptError::Retryable(cause)) | Err(AttemptError::Fatal(cause)) => {
                    return Err(Error::structuring(format!("{}: {}", pdf.display(), cause)));
                }
            }
        }
    }

    fn try_process(&self, pdf: &Path) -> std::result::Result<String, AttemptError> {
        let form = multipart::Form::new()
            .file("input", pdf)
            .map_err(|e| AttemptError::Fatal(e.to_string()))?
            .text(
                "consolidateHeader",
                if self.consolidate_header { "1" } else { "0" },
            );

        let response = self
            .http
            .post(self.endpoint("processFulltextDocument"))
            .multipart(form)
            .send()
            .map_err(|e| AttemptError::Retryable(e.to_string()))?;

        match response.status() {
            status if status.is_success() => response
                .text()
                .map_err(|e| AttemptError::Retryable(e.to_string())),
            StatusCode::SERVICE_UNAVAILABLE => {
                Err(AttemptError::Retryable("service busy (503)".to_string()))
            }
            status => Err(AttemptError::Fatal(format!("unexpected status {}", status))),
        }
    }

    /// Structure every PDF in `pdf_dir` into `out_dir`.
    ///
    /// PDFs with an existing structured file are skipped unless forced. One
    /// failing PDF does not stop the others; an unreachable server does.
    pub fn process_directory(&self, pdf_dir: &Path, out_dir: &Path) -> Result<StructuringReport> {
        let pdfs = discover_pdfs(pdf_dir)?;
        fs::create_dir_all(out_dir)?;

        let mut report = StructuringReport::default();
        let mut pending = Vec::new();
        for pdf in pdfs {
            let Some(name) = structured_name(&pdf) else {
                continue;
            };
            let target = out_dir.join(name);
            if target.exists() && !self.force {
                report.skipped += 1;
            } else {
                pending.push((pdf, target));
            }
        }

        if pending.is_empty() {
            tracing::info!(skipped = report.skipped, "all PDFs already structured");
            return Ok(report);
        }

        if !self.is_alive() {
            return Err(Error::structuring(format!(
                "server not reachable at {}",
                self.base_url
            )));
        }

        tracing::info!(pending = pending.len(), skipped = report.skipped, "structuring PDFs");
        for (pdf, target) in pending {
            let outcome = self.process_pdf(&pdf);
            report.record(pdf, target, outcome);
        }

        Ok(report)
    }
}

impl StructuringReport {
    /// Store a converted document, or note why this PDF produced none
    fn record(&mut self, pdf: PathBuf, target: PathBuf, outcome: Result<String>) {
        let stored = outcome.and_then(|tei| fs::write(&target, tei).map_err(Error::from));
        match stored {
            Ok(()) => self.converted.push(target),
            Err(e) => {
                tracing::warn!(pdf = %pdf.display(), error = %e, "structuring failed");
                self.failures.push(StructuringFailure {
                    pdf,
                    cause: e.to_string(),
                });
            }
        }
    }
}

/// PDFs directly inside a directory, sorted by name
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(Error::PathNotFound(dir.to_path_buf()));
    }

    let mut pdfs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry?;
        let is_pdf = entry
            .path()
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if entry.file_type().is_file() && is_pdf {
            pdfs.push(entry.into_path());
        }
    }

    Ok(pdfs)
}

/// File name of the structured document for a PDF
pub fn structured_name(pdf: &Path) -> Option<String> {
    pdf.file_stem()
        .map(|stem| format!("{}{}", stem.to_string_lossy(), STRUCTURED_SUFFIX))
}
