// Analysis module for building the reference overlap graph

pub mod graph;

pub use graph::*;

use crate::extract::PaperRecord;
use serde::{Deserialize, Serialize};

/// How pair weights are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildStrategy {
    /// Intersect every pair of reference sets
    #[default]
    Pairwise,
    /// Count co-citations through an inverted title index
    Indexed,
}

/// Build the overlap graph for a finished record collection
pub fn build_graph(records: &[PaperRecord], strategy: BuildStrategy) -> OverlapGraph {
    let graph = match strategy {
        BuildStrategy::Pairwise => OverlapGraph::build(records),
        BuildStrategy::Indexed => OverlapGraph::build_indexed(records),
    };

    let stats = graph.stats();
    tracing::info!(
        strategy = ?strategy,
        papers = stats.papers,
        links = stats.links,
        isolated = stats.isolated,
        "overlap graph built"
    );

    graph
}
