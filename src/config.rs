use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "refgraph.toml";

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub physics: PhysicsConfig,
    pub nodes: NodeConfig,
    pub edges: EdgeConfig,
    pub grobid: GrobidConfig,
}

/// Where structured documents are read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Directory holding one structured XML file per paper
    pub directory: PathBuf,
    /// File name pattern selecting structured files
    pub pattern: String,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub format: OutputFormat,
    /// Open the artifact in the default viewer once written
    pub open: bool,
}

/// Force-directed layout parameters handed to the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravitational_constant: f64,
    pub central_gravity: f64,
    pub spring_length: f64,
    pub avoid_overlap: f64,
    pub stabilization_iterations: u32,
    pub update_interval: u32,
    /// Disable physics once stabilization finishes
    pub freeze_after_stabilization: bool,
}

/// Node styling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub base_size: f64,
    pub degree_scale: f64,
    /// Number of title words shown as the node label
    pub label_words: usize,
    pub color: String,
    /// Renderer shape; `dot` is sized by `size`, label-bearing shapes are not
    pub shape: String,
    pub font_size: u32,
}

/// Edge styling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeConfig {
    pub color: String,
    pub opacity: f64,
}

/// Document structuring service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrobidConfig {
    pub url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub consolidate_header: bool,
    /// Re-process PDFs that already have a structured file
    pub force: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

impl OutputFormat {
    /// Parse a format name as given on the command line
    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "html" => Ok(OutputFormat::Html),
            "json" => Ok(OutputFormat::Json),
            other => Err(Error::config_validation(format!(
                "unknown output format: {}",
                other
            ))),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Extracted_XML"),
            pattern: "*.grobid.tei.xml".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("connected_papers_sidebar.html"),
            format: OutputFormat::default(),
            open: true,
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravitational_constant: -150.0,
            central_gravity: 0.005,
            spring_length: 200.0,
            avoid_overlap: 1.0,
            stabilization_iterations: 1000,
            update_interval: 25,
            freeze_after_stabilization: true,
        }
    }
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            base_size: 15.0,
            degree_scale: 3.0,
            label_words: 4,
            color: "#4d8d8c".to_string(),
            shape: "dot".to_string(),
            font_size: 40,
        }
    }
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            color: "#cbd5e0".to_string(),
            opacity: 0.4,
        }
    }
}

impl Default for GrobidConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8070".to_string(),
            timeout_secs: 180,
            max_retries: 3,
            retry_backoff_ms: 500,
            consolidate_header: true,
            force: false,
        }
    }
}

/// CLI overrides merged on top of the file config
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub grobid_url: Option<String>,
    pub force: bool,
    pub no_open: bool,
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config file");
                Self::default()
            }
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(&mut self, overrides: CliOverrides) {
        if let Some(input) = overrides.input {
            self.input.directory = input;
        }

        if let Some(out) = overrides.output {
            self.output.path = out;
        }

        if let Some(format) = overrides.format {
            self.output.format = format;
        }

        if let Some(url) = overrides.grobid_url {
            self.grobid.url = url;
        }

        if overrides.force {
            self.grobid.force = true;
        }

        if overrides.no_open {
            self.output.open = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.input.pattern.trim().is_empty() {
            return Err(Error::config_validation("input pattern must not be empty"));
        }
        glob::Pattern::new(&self.input.pattern)?;

        if self.physics.stabilization_iterations == 0 {
            return Err(Error::config_validation(
                "stabilization_iterations must be at least 1",
            ));
        }

        if self.nodes.label_words == 0 {
            return Err(Error::config_validation("label_words must be at least 1"));
        }

        if self.nodes.shape.trim().is_empty() {
            return Err(Error::config_validation("node shape must not be empty"));
        }

        if self.nodes.base_size < 0.0 || self.nodes.degree_scale < 0.0 {
            return Err(Error::config_validation(
                "node base_size and degree_scale cannot be negative",
            ));
        }

        if !(0.0..=1.0).contains(&self.edges.opacity) {
            return Err(Error::config_validation("edge opacity must be within 0..=1"));
        }

        if self.grobid.timeout_secs == 0 {
            return Err(Error::config_validation("grobid timeout_secs must be at least 1"));
        }

        if self.grobid.max_retries > 10 {
            return Err(Error::config_validation("grobid max_retries cannot exceed 10"));
        }

        Ok(())
    }
}
