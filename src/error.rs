use std::path::PathBuf;
use thiserror::Error;

/// Refgraph error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),

    #[error("Directory walk error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Structuring service error: {0}")]
    Structuring(String),

    #[error("No papers could be extracted from {0}")]
    NoRecords(PathBuf),
}

/// Result type alias for Refgraph operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a parse error
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Error::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a structuring service error
    pub fn structuring(msg: impl Into<String>) -> Self {
        Error::Structuring(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }

    #[test]
    fn test_path_not_found_display() {
        let err = Error::PathNotFound(PathBuf::from("/some/path"));
        assert_eq!(err.to_string(), "Path not found: /some/path");
    }

    #[test]
    fn test_parse_error_display() {
        let err = Error::parse("/corpus/a.grobid.tei.xml", "unexpected end of stream");
        assert!(err.to_string().contains("/corpus/a.grobid.tei.xml"));
        assert!(err.to_string().contains("unexpected end of stream"));
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::config_validation("label_words must be at least 1");
        assert_eq!(
            err.to_string(),
            "Config validation error: label_words must be at least 1"
        );
    }

    #[test]
    fn test_no_records_display() {
        let err = Error::NoRecords(PathBuf::from("xml"));
        assert_eq!(err.to_string(), "No papers could be extracted from xml");
    }

    #[test]
    fn test_structuring_error() {
        let err = Error::structuring("server not alive");
        assert_eq!(err.to_string(), "Structuring service error: server not alive");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Error>();
    }
}
