// Artifact sinks
//
// The rendered page is handed to a sink so the pipeline never decides
// where bytes end up.

use crate::config::OutputFormat;
use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// A finished export ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub format: OutputFormat,
    pub contents: String,
}

/// Destination for a rendered artifact
pub trait ArtifactSink {
    /// Write the artifact, replacing anything written before
    fn write_artifact(&mut self, artifact: &Artifact) -> Result<()>;

    /// Filesystem location of the written artifact, if it has one
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// Writes the artifact to a file, creating parent directories
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ArtifactSink for FileSink {
    fn write_artifact(&mut self, artifact: &Artifact) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, &artifact.contents)?;
        tracing::info!(
            path = %self.path.display(),
            bytes = artifact.contents.len(),
            "artifact written"
        );
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

/// Keeps the artifact in memory
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    artifact: Option<Artifact>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn artifact(&self) -> Option<&Artifact> {
        self.artifact.as_ref()
    }

    pub fn contents(&self) -> Option<&str> {
        self.artifact.as_ref().map(|a| a.contents.as_str())
    }
}

impl ArtifactSink for BufferSink {
    fn write_artifact(&mut self, artifact: &Artifact) -> Result<()> {
        self.artifact = Some(artifact.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact(contents: &str) -> Artifact {
        Artifact {
            format: OutputFormat::Html,
            contents: contents.to_string(),
        }
    }

    #[test]
    fn test_file_sink_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out/nested/graph.html");
        let mut sink = FileSink::new(&path);

        sink.write_artifact(&artifact("<html></html>")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");
        assert_eq!(sink.location(), Some(path.as_path()));
    }

    #[test]
    fn test_file_sink_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("graph.html");
        let mut sink = FileSink::new(&path);

        sink.write_artifact(&artifact("first")).unwrap();
        sink.write_artifact(&artifact("second")).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_buffer_sink() {
        let mut sink = BufferSink::new();
        assert!(sink.contents().is_none());

        sink.write_artifact(&artifact("payload")).unwrap();
        assert_eq!(sink.contents(), Some("payload"));
        assert_eq!(sink.artifact().unwrap().format, OutputFormat::Html);
        assert!(sink.location().is_none());
    }
}
