// Render-facing projection of records and the overlap graph
//
// Produces the node/edge datasets and layout options consumed by the
// vis-network renderer embedded in the HTML page.

use crate::analysis::OverlapGraph;
use crate::config::{Config, EdgeConfig, NodeConfig, PhysicsConfig};
use crate::extract::PaperRecord;
use serde::Serialize;

/// Metadata shown in the detail panel when a node is hovered
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeMetadata {
    pub title: String,
    pub authors: String,
    pub year: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
}

/// A paper as drawn by the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    pub id: usize,
    pub label: String,
    pub size: f64,
    pub color: String,
    pub metadata: NodeMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeColor {
    pub color: String,
    pub opacity: f64,
}

/// A shared-reference link as drawn by the renderer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEdge {
    pub from: usize,
    pub to: usize,
    /// Stroke width hint, the number of shared references
    pub value: usize,
    pub color: EdgeColor,
}

/// Entry of the static paper list panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaperListEntry {
    pub id: usize,
    pub title: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForceAtlasOptions {
    pub gravitational_constant: f64,
    pub central_gravity: f64,
    pub spring_length: f64,
    pub avoid_overlap: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StabilizationOptions {
    pub enabled: bool,
    pub iterations: u32,
    pub update_interval: u32,
    pub only_dynamic_edges: bool,
    pub fit: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicsOptions {
    #[serde(rename = "forceAtlas2Based")]
    pub force_atlas: ForceAtlasOptions,
    pub solver: String,
    pub stabilization: StabilizationOptions,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InteractionOptions {
    pub hover: bool,
    pub drag_nodes: bool,
    pub hide_edges_on_drag: bool,
    pub hide_nodes_on_drag: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontOptions {
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeOptions {
    pub shape: String,
    pub font: FontOptions,
}

/// Layout and interaction options in the renderer's own option schema
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NetworkOptions {
    pub physics: PhysicsOptions,
    pub interaction: InteractionOptions,
    pub nodes: NodeOptions,
}

impl NetworkOptions {
    pub fn from_config(physics: &PhysicsConfig, nodes: &NodeConfig) -> Self {
        Self {
            physics: PhysicsOptions {
                force_atlas: ForceAtlasOptions {
                    gravitational_constant: physics.gravitational_constant,
                    central_gravity: physics.central_gravity,
                    spring_length: physics.spring_length,
                    avoid_overlap: physics.avoid_overlap,
                },
                solver: "forceAtlas2Based".to_string(),
                stabilization: StabilizationOptions {
                    enabled: true,
                    iterations: physics.stabilization_iterations,
                    update_interval: physics.update_interval,
                    only_dynamic_edges: false,
                    fit: true,
                },
            },
            interaction: InteractionOptions {
                hover: true,
                drag_nodes: true,
                hide_edges_on_drag: false,
                hide_nodes_on_drag: false,
            },
            nodes: NodeOptions {
                shape: nodes.shape.clone(),
                font: FontOptions {
                    size: nodes.font_size,
                },
            },
        }
    }
}

/// Everything the renderer needs to draw the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualSpec {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    pub options: NetworkOptions,
    pub papers: Vec<PaperListEntry>,
    /// Turn physics off once stabilization completes
    pub freeze_after_stabilization: bool,
}

/// Maps records and their overlap graph onto a [`VisualSpec`]
pub struct VisualizationExporter {
    nodes: NodeConfig,
    edges: EdgeConfig,
    physics: PhysicsConfig,
}

impl VisualizationExporter {
    pub fn new(config: &Config) -> Self {
        Self {
            nodes: config.nodes.clone(),
            edges: config.edges.clone(),
            physics: config.physics.clone(),
        }
    }

    /// Node size grows linearly with the number of links
    pub fn node_size(&self, degree: usize) -> f64 {
        self.nodes.base_size + self.nodes.degree_scale * degree as f64
    }

    pub fn export(&self, records: &[PaperRecord], graph: &OverlapGraph) -> VisualSpec {
        let nodes = records
            .iter()
            .enumerate()
            .map(|(id, record)| VisualNode {
                id,
                label: record.short_title(self.nodes.label_words),
                size: self.node_size(graph.degree(id)),
                color: self.nodes.color.clone(),
                metadata: NodeMetadata {
                    title: record.title.clone(),
                    authors: record.full_authors.clone(),
                    year: record.year.clone(),
                    abstract_text: record.abstract_text.clone(),
                },
            })
            .collect();

        let edges = graph
            .edges()
            .into_iter()
            .map(|edge| VisualEdge {
                from: edge.source,
                to: edge.target,
                value: edge.weight,
                color: EdgeColor {
                    color: self.edges.color.clone(),
                    opacity: self.edges.opacity,
                },
            })
            .collect();

        let papers = records
            .iter()
            .enumerate()
            .map(|(id, record)| PaperListEntry {
                id,
                title: record.title.clone(),
                year: record.year.clone(),
            })
            .collect();

        VisualSpec {
            nodes,
            edges,
            options: NetworkOptions::from_config(&self.physics, &self.nodes),
            papers,
            freeze_after_stabilization: self.physics.freeze_after_stabilization,
        }
    }
}
