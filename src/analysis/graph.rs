// Reference overlap graph between papers
//
// Nodes are record positions in the extracted collection, edges link
// papers citing at least one common title, weighted by how many titles
// they share.

use crate::extract::PaperRecord;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An undirected edge with `source < target`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OverlapEdge {
    pub source: usize,
    pub target: usize,
    /// Number of shared reference titles
    pub weight: usize,
}

/// Weighted undirected graph over record ids `0..n`
#[derive(Debug, Clone)]
pub struct OverlapGraph {
    graph: UnGraph<usize, usize>,
}

impl OverlapGraph {
    /// Graph with `n` isolated nodes
    fn with_nodes(n: usize) -> Self {
        let mut graph = UnGraph::with_capacity(n, 0);
        for id in 0..n {
            graph.add_node(id);
        }
        Self { graph }
    }

    /// Compare every unordered pair of records directly.
    ///
    /// Quadratic in the number of records.
    pub fn build(records: &[PaperRecord]) -> Self {
        let mut overlap = Self::with_nodes(records.len());

        for i in 0..records.len() {
            for j in (i + 1)..records.len() {
                let shared = records[i].shared_references(&records[j]);
                if shared > 0 {
                    overlap.link(i, j, shared);
                }
            }
        }

        overlap
    }

    /// Accumulate pair counts through an inverted index of reference titles.
    ///
    /// Yields the same edges and weights as [`OverlapGraph::build`], but only
    /// touches pairs that actually co-cite something.
    pub fn build_indexed(records: &[PaperRecord]) -> Self {
        let mut postings: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
        for (id, record) in records.iter().enumerate() {
            for title in &record.reference_titles {
                postings.entry(title.as_str()).or_default().push(id);
            }
        }

        // Posting lists are ascending and duplicate free: ids are pushed in
        // order and each record's titles form a set.
        let mut counts: BTreeMap<(usize, usize), usize> = BTreeMap::new();
        for ids in postings.values() {
            for (a, &i) in ids.iter().enumerate() {
                for &j in &ids[a + 1..] {
                    *counts.entry((i, j)).or_default() += 1;
                }
            }
        }

        let mut overlap = Self::with_nodes(records.len());
        for ((i, j), weight) in counts {
            overlap.link(i, j, weight);
        }
        overlap
    }

    fn link(&mut self, i: usize, j: usize, weight: usize) {
        self.graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), weight);
    }

    /// Number of papers
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of links
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Ids of every node, in collection order
    pub fn node_ids(&self) -> Vec<usize> {
        self.graph.node_weights().copied().collect()
    }

    /// Number of links incident to a paper; 0 for unknown ids
    pub fn degree(&self, id: usize) -> usize {
        if id >= self.node_count() {
            return 0;
        }
        self.graph.edges(NodeIndex::new(id)).count()
    }

    /// Shared reference count between two papers, if they are linked
    pub fn weight(&self, a: usize, b: usize) -> Option<usize> {
        if a >= self.node_count() || b >= self.node_count() {
            return None;
        }
        self.graph
            .find_edge(NodeIndex::new(a), NodeIndex::new(b))
            .and_then(|e| self.graph.edge_weight(e))
            .copied()
    }

    /// Linked papers, ascending
    pub fn neighbors(&self, id: usize) -> Vec<usize> {
        if id >= self.node_count() {
            return Vec::new();
        }
        let mut ids: Vec<usize> = self
            .graph
            .neighbors(NodeIndex::new(id))
            .map(|n| n.index())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// All edges normalized to `source < target`, sorted
    pub fn edges(&self) -> Vec<OverlapEdge> {
        let mut edges: Vec<OverlapEdge> = self
            .graph
            .edge_references()
            .map(|e| {
                let (a, b) = (e.source().index(), e.target().index());
                OverlapEdge {
                    source: a.min(b),
                    target: a.max(b),
                    weight: *e.weight(),
                }
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Summary numbers for reporting
    pub fn stats(&self) -> GraphStats {
        let isolated = (0..self.node_count())
            .filter(|&id| self.degree(id) == 0)
            .count();
        let max_weight = self.graph.edge_weights().copied().max().unwrap_or(0);

        GraphStats {
            papers: self.node_count(),
            links: self.edge_count(),
            isolated,
            max_weight,
        }
    }
}

/// Statistics about the overlap graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub papers: usize,
    pub links: usize,
    pub isolated: usize,
    pub max_weight: usize,
}
