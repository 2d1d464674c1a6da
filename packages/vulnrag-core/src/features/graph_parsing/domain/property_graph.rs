//! In-memory property graph
//!
//! Directed multigraph backed by petgraph. Vertices are addressed by their
//! document id through a side index; edges may reference ids never declared
//! as vertices, in which case an implicit placeholder vertex is created.

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use super::histogram::{GraphStats, LabelHistogram};
use super::property_value::{PropertyValue, VertexId};
use crate::shared::constants::graph::FLAT_UNKNOWN_RATIO;
use crate::shared::constants::labels::UNKNOWN;

/// Graph vertex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vertex {
    pub id: VertexId,
    pub label: String,
    /// Raw properties, envelopes preserved
    pub properties: BTreeMap<String, PropertyValue>,
    /// Materialized from an edge endpoint rather than declared
    pub implicit: bool,
}

impl Vertex {
    pub fn new(id: impl Into<VertexId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            properties: BTreeMap::new(),
            implicit: false,
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Unwrapped property value
    pub fn property(&self, key: &str) -> Option<PropertyValue> {
        self.properties.get(key).map(PropertyValue::unwrap_envelopes)
    }

    /// Unwrapped property rendered as text; empty strings count as absent
    pub fn property_text(&self, key: &str) -> Option<String> {
        self.property(key)
            .and_then(|v| v.as_text())
            .filter(|s| !s.is_empty())
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.label == label
    }
}

/// Graph edge
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub label: String,
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Edge {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            properties: BTreeMap::new(),
        }
    }
}

/// Property graph keyed by vertex id
#[derive(Debug, Clone, Default)]
pub struct PropertyGraph {
    graph: DiGraph<Vertex, Edge>,
    index: HashMap<VertexId, NodeIndex>,
}

impl PropertyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(vertices, edges),
            index: HashMap::with_capacity(vertices),
        }
    }

    /// Insert a declared vertex.
    ///
    /// The first declaration of an id wins. A declaration arriving after an
    /// implicit placeholder for the same id replaces the placeholder.
    pub fn insert_vertex(&mut self, vertex: Vertex) -> NodeIndex {
        if let Some(&idx) = self.index.get(&vertex.id) {
            if self.graph[idx].implicit && !vertex.implicit {
                self.graph[idx] = vertex;
            }
            return idx;
        }
        let id = vertex.id.clone();
        let idx = self.graph.add_node(vertex);
        self.index.insert(id, idx);
        idx
    }

    /// Index of `id`, creating an implicit vertex labeled `label_hint`
    /// (or `UNKNOWN`) if the id is not present yet.
    pub fn ensure_vertex(&mut self, id: &VertexId, label_hint: Option<&str>) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let label = label_hint.filter(|l| !l.is_empty()).unwrap_or(UNKNOWN);
        let mut vertex = Vertex::new(id.clone(), label);
        vertex.implicit = true;
        self.insert_vertex(vertex)
    }

    pub fn add_edge(&mut self, source: NodeIndex, target: NodeIndex, edge: Edge) {
        self.graph.add_edge(source, target, edge);
    }

    /// Connect two ids, materializing missing endpoints
    pub fn connect(
        &mut self,
        source: &VertexId,
        target: &VertexId,
        edge: Edge,
        source_hint: Option<&str>,
        target_hint: Option<&str>,
    ) {
        let s = self.ensure_vertex(source, source_hint);
        let t = self.ensure_vertex(target, target_hint);
        self.add_edge(s, t, edge);
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn vertex(&self, id: &VertexId) -> Option<&Vertex> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// Vertices in insertion order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.graph.node_weights()
    }

    pub fn vertices_with_label<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a Vertex> {
        self.vertices().filter(move |v| v.label == label)
    }

    /// Edges in insertion order with their endpoints
    pub fn edges(&self) -> impl Iterator<Item = (&Vertex, &Vertex, &Edge)> {
        self.graph
            .edge_references()
            .map(|e| (&self.graph[e.source()], &self.graph[e.target()], e.weight()))
    }

    /// One count per vertex (explicit label preferred over edge hints)
    pub fn vertex_histogram(&self) -> LabelHistogram {
        self.vertices().map(|v| v.label.as_str()).collect()
    }

    pub fn edge_histogram(&self) -> LabelHistogram {
        self.graph
            .edge_weights()
            .map(|e| e.label.as_str())
            .collect()
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats::new(self.vertex_count(), self.edge_count())
    }

    /// Share of vertices labeled `UNKNOWN` (0 for an empty graph)
    pub fn unknown_ratio(&self) -> f64 {
        let total = self.vertex_count();
        if total == 0 {
            return 0.0;
        }
        let unknown = self.vertices_with_label(UNKNOWN).count();
        unknown as f64 / total as f64
    }

    /// More than 80% of vertices are `UNKNOWN` (exactly 80% is not flat)
    pub fn is_flat(&self) -> bool {
        self.unknown_ratio() > FLAT_UNKNOWN_RATIO
    }

    /// Underlying petgraph structure
    pub fn as_petgraph(&self) -> &DiGraph<Vertex, Edge> {
        &self.graph
    }
}
