//! GraphParser - entry point for graph documents
//!
//! `parse` never returns an error: malformed input yields `false` and the
//! cause is logged. Callers that need the error use [`GraphParser::load`].

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::features::graph_parsing::domain::{
    GraphStats, LabelHistogram, LabelValidation, PropertyGraph, PropertyValue, ValidationReport,
    Vertex,
};
use crate::features::graph_parsing::error::GraphParseError;
use crate::features::graph_parsing::infrastructure::{decode_document, read_document};
use crate::shared::constants::labels::{EXPECTED_EDGE_LABELS, EXPECTED_VERTEX_LABELS, UNKNOWN};
use crate::shared::constants::properties::CODE;

/// Where a graph document comes from
#[derive(Debug, Clone)]
pub enum GraphSource {
    /// Path to a serialized document
    Path(PathBuf),
    /// Already-decoded JSON
    Document(Value),
}

impl From<&Path> for GraphSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for GraphSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<Value> for GraphSource {
    fn from(doc: Value) -> Self {
        Self::Document(doc)
    }
}

/// Everything `check-cpg` reports about one document
#[derive(Debug, Clone, Serialize)]
pub struct GraphSummary {
    pub basic_stats: GraphStats,
    pub vertex_types: LabelHistogram,
    pub edge_types: LabelHistogram,
    pub is_flat: bool,
    pub validation: ValidationReport,
}

/// Parses graph documents and answers statistics queries about the last
/// successfully parsed one.
#[derive(Debug, Default)]
pub struct GraphParser {
    graph: Option<PropertyGraph>,
    source_code: Option<String>,
}

impl GraphParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a document into a graph, surfacing the failure cause
    pub fn load(source: impl Into<GraphSource>) -> Result<PropertyGraph, GraphParseError> {
        match source.into() {
            GraphSource::Path(path) => {
                let doc = read_document(&path)?;
                decode_document(&doc)
            }
            GraphSource::Document(doc) => decode_document(&doc),
        }
    }

    /// Parse a document. Returns `false` on malformed input; a previous
    /// result is discarded either way.
    pub fn parse(&mut self, source: impl Into<GraphSource>) -> bool {
        let source = source.into();
        let origin = match &source {
            GraphSource::Path(path) => path.display().to_string(),
            GraphSource::Document(_) => "<document>".to_string(),
        };

        match Self::load(source) {
            Ok(graph) => {
                debug!(
                    source = %origin,
                    vertices = graph.vertex_count(),
                    edges = graph.edge_count(),
                    "parsed graph document"
                );
                self.source_code = embedded_source(&graph);
                self.graph = Some(graph);
                true
            }
            Err(e) => {
                warn!(source = %origin, error = %e, "failed to parse graph document");
                self.graph = None;
                self.source_code = None;
                false
            }
        }
    }

    pub fn is_parsed(&self) -> bool {
        self.graph.is_some()
    }

    pub fn graph(&self) -> Option<&PropertyGraph> {
        self.graph.as_ref()
    }

    pub fn into_graph(self) -> Option<PropertyGraph> {
        self.graph
    }

    /// Source snippet carried by the document, if any: the `CODE` of the
    /// first declared `UNKNOWN` vertex with non-blank string code.
    pub fn source_code(&self) -> Option<&str> {
        self.source_code.as_deref()
    }

    /// Vertex label counts (empty before a successful parse)
    pub fn vertex_type_histogram(&self) -> LabelHistogram {
        self.graph
            .as_ref()
            .map(PropertyGraph::vertex_histogram)
            .unwrap_or_default()
    }

    /// Edge label counts (empty before a successful parse)
    pub fn edge_type_histogram(&self) -> LabelHistogram {
        self.graph
            .as_ref()
            .map(PropertyGraph::edge_histogram)
            .unwrap_or_default()
    }

    pub fn basic_stats(&self) -> GraphStats {
        self.graph
            .as_ref()
            .map(PropertyGraph::stats)
            .unwrap_or_default()
    }

    pub fn is_flat(&self) -> bool {
        self.graph.as_ref().is_some_and(PropertyGraph::is_flat)
    }

    /// Compare found labels against expected label sets
    pub fn validate_against_expected(
        &self,
        expected_vertex_labels: &[&str],
        expected_edge_labels: &[&str],
    ) -> ValidationReport {
        ValidationReport {
            vertices: LabelValidation::compare(&self.vertex_type_histogram(), expected_vertex_labels),
            edges: LabelValidation::compare(&self.edge_type_histogram(), expected_edge_labels),
        }
    }

    /// Validation against the Joern CPG schema labels
    pub fn validate_default(&self) -> ValidationReport {
        self.validate_against_expected(EXPECTED_VERTEX_LABELS, EXPECTED_EDGE_LABELS)
    }

    /// Every property of `vertex`, unwrapped
    pub fn extract_properties(vertex: &Vertex) -> BTreeMap<String, PropertyValue> {
        vertex
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.unwrap_envelopes()))
            .collect()
    }

    /// Stats, histograms, flatness and default validation; `None` before a
    /// successful parse.
    pub fn summary(&self) -> Option<GraphSummary> {
        self.graph.as_ref()?;
        Some(GraphSummary {
            basic_stats: self.basic_stats(),
            vertex_types: self.vertex_type_histogram(),
            edge_types: self.edge_type_histogram(),
            is_flat: self.is_flat(),
            validation: self.validate_default(),
        })
    }
}

fn embedded_source(graph: &PropertyGraph) -> Option<String> {
    graph
        .vertices_with_label(UNKNOWN)
        .filter(|v| !v.implicit)
        .find_map(|v| {
            v.property(CODE)
                .and_then(|code| code.as_str().map(str::to_string))
                .filter(|code| !code.trim().is_empty())
        })
}
