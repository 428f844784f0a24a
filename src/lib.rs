//! Refgraph - link scholarly papers by shared references
//!
//! Reads GROBID TEI documents, builds a graph weighted by the number of
//! cited titles two papers have in common, and exports it as an
//! interactive HTML page or JSON.

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod structure;

// Re-export main types
pub use analysis::{build_graph, BuildStrategy, GraphStats, OverlapEdge, OverlapGraph};
pub use config::{Config, OutputFormat};
pub use error::{Error, Result};
pub use extract::{ExtractFailure, ExtractionReport, Extractor, FileOutcome, PaperRecord, TeiParser};
pub use output::{
    render_artifact, Artifact, ArtifactSink, BufferSink, FileSink, VisualSpec,
    VisualizationExporter,
};
pub use pipeline::{Pipeline, RunSummary};
pub use structure::GrobidClient;
