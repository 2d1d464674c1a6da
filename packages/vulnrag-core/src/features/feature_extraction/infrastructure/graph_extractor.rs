//! Graph-driven feature extraction
//!
//! Structural metrics come from the vertex and edge label histograms:
//!
//! | metric                | formula                                  |
//! |-----------------------|------------------------------------------|
//! | cyclomatic_complexity | max(1, CFG − BLOCK + METHOD)             |
//! | nesting_depth         | min(10, BLOCK / max(1, METHOD))          |
//! | essential_complexity  | CONTROL_STRUCTURE + CFG / 10             |
//!
//! Divisions are integer divisions. Semantic features come from the `NAME`
//! property of CALL, IDENTIFIER and FIELD_IDENTIFIER vertices.

use tracing::debug;

use crate::features::feature_extraction::domain::{
    ExtractedFeatures, NameObservations, StrategyKind, StructuralFeatures,
};
use crate::features::graph_parsing::PropertyGraph;
use crate::shared::constants::features::MAX_NESTING_ESTIMATE;
use crate::shared::constants::labels::{
    BLOCK, CALL, CFG, CONTROL_STRUCTURE, FIELD_IDENTIFIER, IDENTIFIER, METHOD,
};
use crate::shared::constants::properties::NAME;

/// Extracts features from a parsed code property graph
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphFeatureExtractor;

impl GraphFeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, graph: &PropertyGraph) -> ExtractedFeatures {
        let vertex_types = graph.vertex_histogram();
        let edge_types = graph.edge_histogram();

        let control = vertex_types.get(CONTROL_STRUCTURE);
        let blocks = vertex_types.get(BLOCK);
        let methods = vertex_types.get(METHOD);
        let calls = vertex_types.get(CALL);
        let cfg_edges = edge_types.get(CFG);

        let cyclomatic = (cfg_edges as i64 - blocks as i64 + methods as i64).max(1) as usize;
        let nesting = (blocks / methods.max(1)).min(MAX_NESTING_ESTIMATE as usize);
        let essential = control + cfg_edges / 10;

        let observations = observe_names(graph);

        let structural = StructuralFeatures {
            node_count: graph.vertex_count(),
            edge_count: graph.edge_count(),
            cyclomatic_complexity: cyclomatic,
            nesting_depth: nesting,
            essential_complexity: essential,
            control_structure_count: control,
            block_count: blocks,
            method_count: methods,
            call_entropy: observations.call_entropy(),
            ..Default::default()
        }
        .with_ratios(calls);

        let semantic = observations.summarize();
        let is_flat = graph.is_flat();

        debug!(
            nodes = structural.node_count,
            edges = structural.edge_count,
            calls = semantic.total_calls,
            is_flat,
            "extracted graph features"
        );

        ExtractedFeatures::new(structural, semantic, StrategyKind::Graph, is_flat)
    }
}

/// Names of call, identifier and field vertices in graph order
fn observe_names(graph: &PropertyGraph) -> NameObservations {
    let mut observations = NameObservations::new();
    for vertex in graph.vertices() {
        let label = vertex.label.as_str();
        if !matches!(label, CALL | IDENTIFIER | FIELD_IDENTIFIER) {
            continue;
        }
        let Some(name) = vertex.property_text(NAME) else {
            continue;
        };
        match label {
            CALL => observations.push_call(name),
            IDENTIFIER => observations.push_identifier(name),
            _ => observations.push_field_identifier(name),
        }
    }
    observations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::graph_parsing::{Edge, PropertyValue, Vertex, VertexId};
    use crate::shared::constants::labels::UNKNOWN;
    use serde_json::json;

    fn named(id: i64, label: &str, name: &str) -> Vertex {
        Vertex::new(id, label).with_property(NAME, PropertyValue::from_json(&json!({"@value": [name]})))
    }

    fn graph_with(vertices: Vec<Vertex>, edges: &[(i64, i64, &str)]) -> PropertyGraph {
        let mut g = PropertyGraph::new();
        for v in vertices {
            g.insert_vertex(v);
        }
        for (s, t, label) in edges {
            g.connect(&VertexId::Int(*s), &VertexId::Int(*t), Edge::new(*label), None, None);
        }
        g
    }

    #[test]
    fn test_complexity_formulas() {
        let mut vertices = vec![Vertex::new(1, METHOD)];
        vertices.extend((2..5).map(|i| Vertex::new(i, BLOCK)));
        vertices.push(Vertex::new(5, CONTROL_STRUCTURE));
        let cfg: Vec<(i64, i64, &str)> = (0..12).map(|_| (1, 5, CFG)).collect();
        let g = graph_with(vertices, &cfg);

        let f = GraphFeatureExtractor::new().extract(&g).structural;
        // 12 − 3 + 1
        assert_eq!(f.cyclomatic_complexity, 10);
        assert_eq!(f.nesting_depth, 3);
        // 1 + 12/10
        assert_eq!(f.essential_complexity, 2);
        assert_eq!(f.control_structure_count, 1);
        assert_eq!(f.control_ratio, 0.2);
    }

    #[test]
    fn test_cyclomatic_floor_and_nesting_cap() {
        let mut vertices = vec![Vertex::new(0, METHOD)];
        vertices.extend((1..=15).map(|i| Vertex::new(i, BLOCK)));
        let g = graph_with(vertices, &[]);
        let f = GraphFeatureExtractor::new().extract(&g).structural;
        assert_eq!(f.cyclomatic_complexity, 1);
        assert_eq!(f.nesting_depth, 10);
    }

    #[test]
    fn test_semantic_from_names() {
        let g = graph_with(
            vec![
                named(1, CALL, "strcpy"),
                named(2, CALL, "foo"),
                named(3, IDENTIFIER, "buf"),
                named(4, FIELD_IDENTIFIER, "len"),
                Vertex::new(5, CALL),
            ],
            &[(1, 3, "AST")],
        );
        let f = GraphFeatureExtractor::new().extract(&g);
        assert_eq!(f.semantic.top_calls, vec!["strcpy", "foo"]);
        assert_eq!(f.semantic.top_identifiers, vec!["buf"]);
        assert_eq!(f.semantic.top_field_identifiers, vec!["len"]);
        assert_eq!(f.structural.call_entropy, 1.0);
        // three CALL vertices, one without a name
        assert_eq!(f.structural.calls_per_node, 3.0 / 5.0);
        assert_eq!(f.metadata.strategy, StrategyKind::Graph);
        assert_eq!(f.metadata.quality_score, 1.0);
    }

    #[test]
    fn test_flat_graph_flagged() {
        let vertices = (0..10).map(|i| Vertex::new(i, UNKNOWN)).collect();
        let f = GraphFeatureExtractor::new().extract(&graph_with(vertices, &[]));
        assert!(f.metadata.is_flat);
        assert_eq!(f.metadata.quality_score, 0.6);
    }
}
