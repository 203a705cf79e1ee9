//! Strand graph construction
//!
//! Every segment `s` contributes two vertices, `s` and its reverse
//! complement, joined by a virtual edge. Every link contributes two edges,
//! one per strand (see [`crate::orientation::resolve`]).

use crate::error::{ConvertError, GfaError, Result};
use crate::gfa::RecordSource;
use crate::orientation::{resolve, StrandEdge};
use crate::strand::StrandId;
use hashbrown::{HashMap, HashSet};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Where an edge of the strand graph came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeKind {
    /// Link as written in the file
    Link,
    /// The same link read on the opposite strand
    ComplementLink,
    /// Pairs a segment's forward strand with its complement
    Virtual,
}

impl EdgeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EdgeKind::Link => "link",
            EdgeKind::ComplementLink => "complement",
            EdgeKind::Virtual => "virtual",
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Directed graph over strand vertices
///
/// Vertices and edges keep their insertion order, which exporters use as
/// positional indices.
#[derive(Debug, Clone, Default)]
pub struct StrandGraph {
    graph: DiGraph<StrandId, EdgeKind>,
    index: HashMap<StrandId, NodeIndex>,
}

impl StrandGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self::default()
    }

    fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(vertices, edges),
            index: HashMap::with_capacity(vertices),
        }
    }

    fn add_vertex(&mut self, id: StrandId) -> NodeIndex {
        let node = self.graph.add_node(id.clone());
        self.index.insert(id, node);
        node
    }

    fn add_edge(&mut self, edge: &StrandEdge, kind: EdgeKind) {
        // Endpoints are registered before any edge is added.
        let from = self.index[&edge.from];
        let to = self.index[&edge.to];
        self.graph.add_edge(from, to, kind);
    }

    /// Underlying petgraph graph
    pub fn graph(&self) -> &DiGraph<StrandId, EdgeKind> {
        &self.graph
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &StrandId> {
        self.graph.node_weights()
    }

    /// Edges in insertion order
    pub fn edges(&self) -> impl Iterator<Item = (&StrandId, &StrandId, EdgeKind)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()], *e.weight()))
    }

    pub fn edges_of_kind(
        &self,
        kind: EdgeKind,
    ) -> impl Iterator<Item = (&StrandId, &StrandId)> {
        self.edges()
            .filter(move |(_, _, k)| *k == kind)
            .map(|(from, to, _)| (from, to))
    }

    pub fn node_index(&self, id: &StrandId) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn contains_vertex(&self, id: &StrandId) -> bool {
        self.index.contains_key(id)
    }

    pub fn contains_edge(&self, from: &StrandId, to: &StrandId) -> bool {
        match (self.node_index(from), self.node_index(to)) {
            (Some(a), Some(b)) => self.graph.contains_edge(a, b),
            _ => false,
        }
    }
}

/// Build the strand graph for every segment and link of `source`.
///
/// Fails without returning a partial graph if any link has an unknown
/// orientation or names a segment that `source` does not list.
pub fn build<S: RecordSource + ?Sized>(source: &S) -> Result<StrandGraph> {
    let mut vertices = Vec::new();
    let mut virtual_edges = Vec::new();

    for segment in source.segments() {
        let forward = StrandId::forward(segment.sid.as_str());
        let complement = forward.complement();
        virtual_edges.push(StrandEdge::new(forward.clone(), complement.clone()));
        vertices.push(forward);
        vertices.push(complement);
    }
    debug!(segments = virtual_edges.len(), "Loaded segments");

    let known: HashSet<&str> = source.segments().map(|s| s.sid.as_str()).collect();

    let mut link_edges = Vec::new();
    for link in source.links() {
        for name in [&link.from_name, &link.to_name] {
            if !known.contains(name.as_str()) {
                return Err(ConvertError::Parse(GfaError::UndefinedSegment {
                    line: link.line,
                    name: name.clone(),
                }));
            }
        }

        let (forward, complement) = resolve(link)?;
        link_edges.push((forward, EdgeKind::Link));
        link_edges.push((complement, EdgeKind::ComplementLink));
    }
    debug!(edges = link_edges.len(), "Loaded edges");

    warn_on_key_collisions(&vertices);

    let mut graph =
        StrandGraph::with_capacity(vertices.len(), link_edges.len() + virtual_edges.len());
    for vertex in vertices {
        graph.add_vertex(vertex);
    }
    for (edge, kind) in &link_edges {
        graph.add_edge(edge, *kind);
    }
    for edge in &virtual_edges {
        graph.add_edge(edge, EdgeKind::Virtual);
    }

    debug!(
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Created graph"
    );
    Ok(graph)
}

/// Segments named `A` and `_A` export under the same flat key.
fn warn_on_key_collisions(vertices: &[StrandId]) {
    let mut seen: HashMap<String, &StrandId> = HashMap::with_capacity(vertices.len());
    for vertex in vertices {
        if let Some(previous) = seen.insert(vertex.key(), vertex) {
            warn!(
                key = %vertex.key(),
                first = ?previous,
                second = ?vertex,
                "Two strand vertices share one export key"
            );
        }
    }
}
