//! Feature extraction through graph, syntax-tree and lexical strategies

mod common;

use common::*;
use pretty_assertions::assert_eq;
use serde_json::Value;
use std::time::Duration;
use vulnrag_core::features::feature_extraction::{
    CpgGenerationError, CpgGenerator, DangerTier, FeatureExtractionStrategy,
    HybridFeatureExtractor, LexicalStrategy, StrategyKind, SyntaxTreeStrategy,
};
use vulnrag_core::features::graph_parsing::GraphParser;
use vulnrag_core::shared::constants::features::STRUCTURAL_DIMENSIONS;

struct DocumentGenerator(Value);

impl CpgGenerator for DocumentGenerator {
    fn generate(&self, _code: &str, _timeout: Duration) -> Result<Value, CpgGenerationError> {
        Ok(self.0.clone())
    }
}

struct MissingToolGenerator;

impl CpgGenerator for MissingToolGenerator {
    fn generate(&self, _code: &str, _timeout: Duration) -> Result<Value, CpgGenerationError> {
        Err(CpgGenerationError::Spawn {
            command: "joern-parse".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not installed"),
        })
    }
}

#[test]
fn test_scenario_b_lexical() {
    let features = LexicalStrategy::new().extract(NESTED_STRCPY).unwrap();
    assert_eq!(features.metadata.strategy, StrategyKind::Lexical);
    assert_eq!(features.structural.control_structure_count, 1);
    assert_eq!(features.structural.nesting_depth, 2);
    assert_eq!(features.semantic.dangerous_calls.len(), 1);
    assert_eq!(features.semantic.dangerous_calls[0].name, "strcpy");
    assert_eq!(features.semantic.dangerous_calls[0].tier, DangerTier::Unbounded);
}

#[test]
fn test_scenario_b_syntax_tree_agrees() {
    let strategy = SyntaxTreeStrategy::new().unwrap();
    let features = strategy.extract(NESTED_STRCPY).unwrap();
    assert_eq!(features.metadata.strategy, StrategyKind::SyntaxTree);
    assert_eq!(features.structural.control_structure_count, 1);
    assert_eq!(features.structural.nesting_depth, 2);
    assert_eq!(features.semantic.dangerous_calls[0].tier, DangerTier::Unbounded);
}

#[test]
fn test_graph_features_from_document() {
    let graph = GraphParser::load(fixture_method_graph()).unwrap();
    let extractor = HybridFeatureExtractor::new();
    let features = extractor.extract_graph(&graph);

    assert_eq!(features.metadata.strategy, StrategyKind::Graph);
    assert_eq!(features.structural.node_count, 5);
    assert_eq!(features.structural.method_count, 1);
    assert!(features.semantic.top_calls.iter().any(|c| c == "memcpy"));
    assert!(features.metadata.quality_score > 0.9);
    assert_eq!(features.structural.to_vector().len(), STRUCTURAL_DIMENSIONS);
}

#[test]
fn test_query_prefers_generated_graph() {
    let extractor = HybridFeatureExtractor::new();
    let generator = DocumentGenerator(fixture_method_graph());
    let features = extractor.extract_query(NESTED_STRCPY, Some(&generator));
    assert_eq!(features.metadata.strategy, StrategyKind::Graph);
}

#[test]
fn test_query_falls_back_when_generator_fails() {
    let extractor = lexical_extractor();
    let features = extractor.extract_query(NESTED_STRCPY, Some(&MissingToolGenerator));
    assert_eq!(features.metadata.strategy, StrategyKind::Lexical);
    assert_eq!(features.structural.nesting_depth, 2);
}

#[test]
fn test_flat_generated_graph_is_flagged() {
    let extractor = HybridFeatureExtractor::new();
    let generator = DocumentGenerator(fixture_flat_graph());
    let features = extractor.extract_query("int main(void) { return 0; }", Some(&generator));
    assert_eq!(features.metadata.strategy, StrategyKind::Graph);
    assert!(features.metadata.is_flat);
}

#[test]
fn test_empty_text_has_structure_only() {
    let features = lexical_extractor().extract_text("");
    assert_eq!(features.structural.node_count, 1);
    assert!(features.semantic.is_empty());
    assert_close(features.metadata.quality_score, 0.6);
}
