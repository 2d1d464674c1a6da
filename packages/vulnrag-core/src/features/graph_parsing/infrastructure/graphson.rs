//! GraphSON decoding
//!
//! Accepts the TinkerPop `tinker:graph` envelope produced by `joern-export
//! --format=graphson`:
//!
//! ```json
//! {"@type": "tinker:graph",
//!  "@value": {"vertices": [...], "edges": [...]}}
//! ```
//!
//! Vertices and edges may be flat objects or wrapped in `{"@value": {...}}`.
//! Elements without a usable id are skipped; a wrong top-level shape fails the
//! whole document.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, trace};

use crate::features::graph_parsing::domain::{Edge, PropertyGraph, PropertyValue, Vertex, VertexId};
use crate::features::graph_parsing::error::GraphParseError;
use crate::shared::constants::labels::UNKNOWN;

const GRAPH_TYPE: &str = "tinker:graph";

/// Read and decode a JSON document from disk
pub fn read_document(path: &Path) -> Result<Value, GraphParseError> {
    let content = std::fs::read_to_string(path).map_err(|source| GraphParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}

/// Build a property graph from a decoded document
pub fn decode_document(doc: &Value) -> Result<PropertyGraph, GraphParseError> {
    let (vertices, edges) = graph_collections(doc)?;

    let mut graph = PropertyGraph::with_capacity(vertices.len(), edges.len());
    let mut skipped_vertices = 0usize;
    let mut skipped_edges = 0usize;

    for raw in vertices {
        match decode_vertex(raw) {
            Some(vertex) => {
                graph.insert_vertex(vertex);
            }
            None => skipped_vertices += 1,
        }
    }

    for raw in edges {
        let body = peel_element(raw);
        let endpoints = (
            body.get("outV").and_then(VertexId::from_json),
            body.get("inV").and_then(VertexId::from_json),
        );
        let (Some(out_v), Some(in_v)) = endpoints else {
            skipped_edges += 1;
            continue;
        };

        let edge = Edge {
            label: label_of(body),
            properties: decode_properties(body.get("properties")),
        };
        trace!(out_v = %out_v, in_v = %in_v, label = %edge.label, "edge");
        graph.connect(
            &out_v,
            &in_v,
            edge,
            body.get("outVLabel").and_then(Value::as_str),
            body.get("inVLabel").and_then(Value::as_str),
        );
    }

    if skipped_vertices > 0 || skipped_edges > 0 {
        debug!(
            skipped_vertices,
            skipped_edges, "graph elements without usable ids were skipped"
        );
    }

    Ok(graph)
}

/// Validate the top-level envelope and return the vertex and edge arrays
fn graph_collections(doc: &Value) -> Result<(&[Value], &[Value]), GraphParseError> {
    let root = doc
        .as_object()
        .ok_or_else(|| GraphParseError::invalid_shape("document is not a JSON object"))?;

    match root.get("@type").and_then(Value::as_str) {
        Some(GRAPH_TYPE) => {}
        Some(other) => {
            return Err(GraphParseError::invalid_shape(format!(
                "expected @type \"{GRAPH_TYPE}\", found \"{other}\""
            )))
        }
        None => return Err(GraphParseError::invalid_shape("missing @type")),
    }

    let body = root
        .get("@value")
        .and_then(Value::as_object)
        .ok_or_else(|| GraphParseError::invalid_shape("missing @value object"))?;

    Ok((
        collection(body, "vertices")?,
        collection(body, "edges")?,
    ))
}

fn collection<'a>(body: &'a Map<String, Value>, key: &str) -> Result<&'a [Value], GraphParseError> {
    match body.get(key) {
        None => Err(GraphParseError::invalid_shape(format!("missing @value.{key}"))),
        Some(Value::Null) => Ok(Default::default()),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(_) => Err(GraphParseError::invalid_shape(format!(
            "@value.{key} is not an array"
        ))),
    }
}

/// `{"@value": {...}}` → `{...}`; flat elements are returned as-is
fn peel_element(raw: &Value) -> &Value {
    match raw.get("@value") {
        Some(inner) if inner.is_object() => inner,
        _ => raw,
    }
}

fn label_of(body: &Value) -> String {
    body.get("label")
        .and_then(Value::as_str)
        .filter(|l| !l.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}

fn decode_vertex(raw: &Value) -> Option<Vertex> {
    let body = peel_element(raw);
    let id = body.get("id").and_then(VertexId::from_json)?;
    Some(Vertex {
        id,
        label: label_of(body),
        properties: decode_properties(body.get("properties")),
        implicit: false,
    })
}

fn decode_properties(raw: Option<&Value>) -> BTreeMap<String, PropertyValue> {
    match raw {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(k, v)| (k.clone(), PropertyValue::from_json(v)))
            .collect(),
        _ => BTreeMap::new(),
    }
}
