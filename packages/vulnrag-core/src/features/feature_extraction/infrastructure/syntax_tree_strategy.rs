//! Syntax-tree feature extraction (tree-sitter C)
//!
//! Counts come from the concrete syntax tree instead of a CPG:
//! - nodes / edges: named nodes and their named parent→child links
//! - control structures: if/for/while/do/switch statements and `case` labels
//! - blocks: compound statements; methods: function definitions
//! - nesting: deepest compound statement
//! - calls: target names of call expressions

use std::collections::HashSet;
use tree_sitter::{Language, Node, Parser};

use crate::features::feature_extraction::domain::{
    ExtractedFeatures, NameObservations, StrategyKind, StructuralFeatures,
};
use crate::features::feature_extraction::error::FeatureExtractionError;
use crate::features::feature_extraction::ports::FeatureExtractionStrategy;
use crate::shared::utils::tree_sitter::{
    call_target_name, count_ancestors, extract_node_text, walk_with_depth,
};

const COMPOUND_STATEMENT: &str = "compound_statement";

/// tree-sitter based text strategy
#[derive(Clone)]
pub struct SyntaxTreeStrategy {
    language: Language,
}

impl std::fmt::Debug for SyntaxTreeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTreeStrategy").finish_non_exhaustive()
    }
}

impl SyntaxTreeStrategy {
    /// Load the C grammar; fails when the grammar is incompatible with the
    /// linked tree-sitter runtime.
    pub fn new() -> Result<Self, FeatureExtractionError> {
        let language = tree_sitter_c::language();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| FeatureExtractionError::GrammarUnavailable(e.to_string()))?;
        Ok(Self { language })
    }

    fn parser(&self) -> Result<Parser, FeatureExtractionError> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| FeatureExtractionError::GrammarUnavailable(e.to_string()))?;
        Ok(parser)
    }
}

impl FeatureExtractionStrategy for SyntaxTreeStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::SyntaxTree
    }

    fn extract(&self, code: &str) -> Result<ExtractedFeatures, FeatureExtractionError> {
        let mut parser = self.parser()?;
        let tree = parser
            .parse(code, None)
            .ok_or_else(|| FeatureExtractionError::ParseFailed("parser returned no tree".into()))?;

        let mut counts = TreeCounts::default();
        let mut observations = NameObservations::new();
        // ids of name nodes already recorded as call targets
        let mut call_names: HashSet<usize> = HashSet::new();

        walk_with_depth(tree.root_node(), |node, _| {
            if !node.is_named() {
                return;
            }
            counts.nodes += 1;
            counts.edges += node.named_child_count();

            match node.kind() {
                "if_statement" | "for_statement" | "while_statement" | "do_statement"
                | "switch_statement" => counts.control += 1,
                "case_statement" if is_case_label(&node) => counts.control += 1,
                COMPOUND_STATEMENT => {
                    counts.blocks += 1;
                    let depth = 1 + count_ancestors(node, |kind| kind == COMPOUND_STATEMENT);
                    counts.nesting = counts.nesting.max(depth);
                }
                "function_definition" => counts.methods += 1,
                "call_expression" => {
                    if let Some((id, name)) = call_target(&node, code) {
                        call_names.insert(id);
                        observations.push_call(name);
                    }
                }
                "identifier" => {
                    if !call_names.contains(&node.id()) && !is_definition_name(&node) {
                        observations.push_identifier(extract_node_text(&node, code));
                    }
                }
                "field_identifier" => {
                    if !call_names.contains(&node.id()) {
                        observations.push_field_identifier(extract_node_text(&node, code));
                    }
                }
                _ => {}
            }
        });

        let control = counts.control;
        let structural = StructuralFeatures {
            node_count: counts.nodes,
            edge_count: counts.edges,
            cyclomatic_complexity: 1 + control,
            nesting_depth: counts.nesting,
            essential_complexity: control + (2 * control) / 10,
            control_structure_count: control,
            block_count: counts.blocks,
            method_count: counts.methods,
            call_entropy: observations.call_entropy(),
            ..Default::default()
        }
        .with_ratios(observations.call_count());

        Ok(ExtractedFeatures::new(
            structural,
            observations.summarize(),
            StrategyKind::SyntaxTree,
            false,
        ))
    }
}

#[derive(Debug, Default)]
struct TreeCounts {
    nodes: usize,
    edges: usize,
    control: usize,
    blocks: usize,
    methods: usize,
    nesting: usize,
}

/// `case X:` but not `default:`
fn is_case_label(node: &Node) -> bool {
    node.child(0).is_some_and(|first| first.kind() == "case")
}

/// Name node id and text of a call expression's target
fn call_target<'a>(call: &Node, code: &'a str) -> Option<(usize, &'a str)> {
    let name = call_target_name(call, code)?;
    let function = call.child_by_field_name("function")?;
    let name_node = match function.kind() {
        "field_expression" => function.child_by_field_name("field")?,
        _ => function,
    };
    Some((name_node.id(), name))
}

/// The declared name of a function definition or prototype
fn is_definition_name(node: &Node) -> bool {
    node.parent().is_some_and(|parent| {
        parent.kind() == "function_declarator"
            && parent
                .child_by_field_name("declarator")
                .is_some_and(|d| d.id() == node.id())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::feature_extraction::domain::DangerTier;
    use pretty_assertions::assert_eq;

    fn extract(code: &str) -> ExtractedFeatures {
        SyntaxTreeStrategy::new().unwrap().extract(code).unwrap()
    }

    #[test]
    fn test_nested_if_with_strcpy() {
        let f = extract("void f(){ if(x){ strcpy(a,b); } }");
        assert_eq!(f.structural.control_structure_count, 1);
        assert_eq!(f.structural.nesting_depth, 2);
        assert_eq!(f.structural.block_count, 2);
        assert_eq!(f.structural.method_count, 1);
        assert_eq!(f.semantic.top_calls, vec!["strcpy"]);
        assert_eq!(f.semantic.dangerous_calls[0].tier, DangerTier::Unbounded);
        assert_eq!(f.metadata.strategy, StrategyKind::SyntaxTree);
    }

    #[test]
    fn test_identifiers_exclude_call_and_definition_names() {
        let f = extract("int g(int n) { return h(n) + n; }");
        assert_eq!(f.semantic.top_calls, vec!["h"]);
        assert_eq!(f.semantic.top_identifiers, vec!["n"]);
    }

    #[test]
    fn test_member_call_and_fields() {
        let f = extract("void f(struct s *p) { p->len = 0; p->ops->release(p); }");
        assert_eq!(f.semantic.top_calls, vec!["release"]);
        assert_eq!(f.semantic.top_field_identifiers, vec!["len", "ops"]);
    }

    #[test]
    fn test_switch_cases() {
        let f = extract("void f(int x) { switch (x) { case 1: break; case 2: break; default: break; } }");
        // switch + two case labels
        assert_eq!(f.structural.control_structure_count, 3);
        assert_eq!(f.structural.cyclomatic_complexity, 4);
    }

    #[test]
    fn test_tree_counts_consistent() {
        let f = extract("int main(void) { int a = 1; while (a) { a--; } return a; }");
        // every named node except the root has exactly one named parent
        assert_eq!(f.structural.edge_count + 1, f.structural.node_count);
        assert!(f.structural.graph_density > 0.0);
    }

    #[test]
    fn test_unparsable_text_still_extracts() {
        let f = extract("this is not C {{{");
        assert!(f.structural.node_count > 0);
    }
}
