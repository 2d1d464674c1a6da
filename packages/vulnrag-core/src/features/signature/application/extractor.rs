//! SignatureExtractor - one graph in, one signature row out

use std::path::Path;
use tracing::debug;

use crate::features::graph_parsing::{GraphParseError, GraphParser, PropertyGraph, Vertex};
use crate::features::signature::domain::{
    contains_any, is_dangerous, CweCategory, Signature, ALLOC_CALLS, FREE_CALLS,
};
use crate::shared::constants::labels::{AST, CDG, CFG, CONTROL_STRUCTURE, METHOD, REACHING_DEF};
use crate::shared::constants::properties::{CONTROL_STRUCTURE_TYPE, FULL_NAME, NAME};

/// Computes structural signatures of code property graphs
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureExtractor;

impl SignatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Signature of a graph; `None` for a graph without vertices.
    ///
    /// `instance_id` is left empty, see [`Self::extract_file`].
    pub fn extract(&self, graph: &PropertyGraph) -> Option<Signature> {
        let n = graph.vertex_count();
        if n == 0 {
            return None;
        }
        let e = graph.edge_count();

        let mut sig = Signature {
            num_nodes: n,
            num_edges: e,
            density: e as f64 / (n * (n - 1)).max(1) as f64,
            avg_degree: 2.0 * e as f64 / n as f64,
            is_flat_cpg: graph.is_flat(),
            ..Default::default()
        };

        for vertex in graph.vertices() {
            match vertex.label.as_str() {
                CONTROL_STRUCTURE => count_control(&mut sig, vertex),
                METHOD => count_method(&mut sig, vertex),
                _ => {}
            }
        }
        sig.cyclomatic_complexity = sig.loop_count + sig.conditional_count + 1;

        let edge_types = graph.edge_histogram();
        sig.reaching_def_edges = edge_types.get(REACHING_DEF);
        sig.cfg_edges = edge_types.get(CFG);
        sig.cdg_edges = edge_types.get(CDG);
        sig.ast_edges = edge_types.get(AST);

        Some(sig)
    }

    /// Load a graph file and extract its signature, using the file stem as
    /// `instance_id`.
    pub fn extract_file(&self, path: &Path) -> Result<Option<Signature>, GraphParseError> {
        let graph = GraphParser::load(path)?;
        let signature = self.extract(&graph).map(|mut sig| {
            sig.instance_id = instance_id(path);
            sig
        });
        if signature.is_none() {
            debug!(path = %path.display(), "empty graph, no signature");
        }
        Ok(signature)
    }
}

/// File stem of a graph path
pub fn instance_id(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn count_control(sig: &mut Signature, vertex: &Vertex) {
    let kind = vertex
        .property_text(CONTROL_STRUCTURE_TYPE)
        .unwrap_or_default()
        .to_uppercase();
    match kind.as_str() {
        "FOR" | "WHILE" | "DO" => sig.loop_count += 1,
        "IF" | "SWITCH" => sig.conditional_count += 1,
        _ => {}
    }
}

fn count_method(sig: &mut Signature, vertex: &Vertex) {
    let name = vertex
        .property_text(NAME)
        .or_else(|| vertex.property_text(FULL_NAME))
        .unwrap_or_default()
        .to_lowercase();
    if name.is_empty() {
        return;
    }

    for category in CweCategory::ALL {
        if category.matches(&name) {
            *sig.category_count_mut(category) += 1;
        }
    }
    if contains_any(&name, ALLOC_CALLS) {
        sig.malloc_calls += 1;
        sig.memory_ops += 1;
    }
    if contains_any(&name, FREE_CALLS) {
        sig.free_calls += 1;
        sig.memory_ops += 1;
    }
    if is_dangerous(&name) {
        sig.total_dangerous_calls += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::graph_parsing::{Edge, PropertyValue};
    use pretty_assertions::assert_eq;

    fn method(id: i64, name: &str) -> Vertex {
        Vertex::new(id, METHOD).with_property(NAME, PropertyValue::from(name))
    }

    fn control(id: i64, kind: &str) -> Vertex {
        Vertex::new(id, CONTROL_STRUCTURE)
            .with_property(CONTROL_STRUCTURE_TYPE, PropertyValue::from(kind))
    }

    #[test]
    fn test_empty_graph_has_no_signature() {
        assert!(SignatureExtractor::new().extract(&PropertyGraph::new()).is_none());
    }

    #[test]
    fn test_counts() {
        let mut graph = PropertyGraph::new();
        let a = graph.insert_vertex(method(1, "kfree"));
        let b = graph.insert_vertex(method(2, "kmalloc"));
        let c = graph.insert_vertex(control(3, "while"));
        let d = graph.insert_vertex(control(4, "IF"));
        graph.add_edge(a, b, Edge::new(CFG));
        graph.add_edge(b, c, Edge::new(AST));
        graph.add_edge(c, d, Edge::new(REACHING_DEF));

        let sig = SignatureExtractor::new().extract(&graph).unwrap();
        assert_eq!(sig.num_nodes, 4);
        assert_eq!(sig.num_edges, 3);
        assert!((sig.density - 3.0 / 12.0).abs() < 1e-12);
        assert!((sig.avg_degree - 1.5).abs() < 1e-12);
        assert_eq!(sig.loop_count, 1);
        assert_eq!(sig.conditional_count, 1);
        assert_eq!(sig.cyclomatic_complexity, 3);
        assert_eq!(sig.use_after_free_calls, 1);
        assert_eq!(sig.info_disclosure_calls, 1);
        assert_eq!(sig.resource_leak_calls, 1);
        assert_eq!(sig.null_deref_calls, 1);
        assert_eq!(sig.malloc_calls, 1);
        assert_eq!(sig.free_calls, 1);
        assert_eq!(sig.memory_ops, 2);
        assert_eq!(sig.total_dangerous_calls, 2);
        assert_eq!((sig.cfg_edges, sig.ast_edges, sig.reaching_def_edges, sig.cdg_edges), (1, 1, 1, 0));
        assert!(!sig.is_flat_cpg);
    }

    #[test]
    fn test_full_name_fallback() {
        let mut graph = PropertyGraph::new();
        graph.insert_vertex(
            Vertex::new(1, METHOD).with_property(FULL_NAME, PropertyValue::from("mutex_lock")),
        );
        let sig = SignatureExtractor::new().extract(&graph).unwrap();
        assert_eq!(sig.race_condition_calls, 1);
        // single vertex: n·(n−1) = 0
        assert_eq!(sig.density, 0.0);
    }

    #[test]
    fn test_instance_id_is_file_stem() {
        assert_eq!(instance_id(Path::new("/tmp/CVE-2021-1_vuln.json")), "CVE-2021-1_vuln");
    }
}
