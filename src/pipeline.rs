// End to end run: structured files -> records -> overlap graph -> artifact

use crate::analysis::{build_graph, BuildStrategy, GraphStats};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::extract::{ExtractFailure, ExtractionReport, Extractor};
use crate::output::{render_artifact, ArtifactSink, VisualizationExporter};
use std::path::PathBuf;

/// What a completed run produced
#[derive(Debug)]
pub struct RunSummary {
    /// Papers that made it into the graph
    pub papers: usize,
    pub failures: Vec<ExtractFailure>,
    pub stats: GraphStats,
    /// Where the artifact was written, for file backed sinks
    pub artifact: Option<PathBuf>,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "{} papers, {} links, {} isolated, {} failed",
            self.papers,
            self.stats.links,
            self.stats.isolated,
            self.failures.len()
        )
    }
}

/// Orchestrates extraction, graph construction and export
pub struct Pipeline {
    config: Config,
    strategy: BuildStrategy,
    verbose: bool,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            strategy: BuildStrategy::default(),
            verbose: false,
        }
    }

    pub fn with_strategy(mut self, strategy: BuildStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Parse every structured file in the input directory
    pub fn extract(&self) -> Result<ExtractionReport> {
        Extractor::new(self.config.input.clone())?
            .with_verbose(self.verbose)
            .extract()
    }

    /// Run the whole pipeline and hand the artifact to `sink`.
    ///
    /// Stops with [`Error::NoRecords`] before building the graph when no
    /// file could be parsed; nothing is written in that case.
    pub fn run(&self, sink: &mut dyn ArtifactSink) -> Result<RunSummary> {
        let report = self.extract()?;
        if report.is_empty() {
            return Err(Error::NoRecords(self.config.input.directory.clone()));
        }

        let graph = build_graph(&report.records, self.strategy);
        let spec = VisualizationExporter::new(&self.config).export(&report.records, &graph);
        let artifact = render_artifact(&spec, self.config.output.format)?;
        sink.write_artifact(&artifact)?;

        Ok(RunSummary {
            papers: report.records.len(),
            failures: report.failures,
            stats: graph.stats(),
            artifact: sink.location().map(|p| p.to_path_buf()),
        })
    }
}
