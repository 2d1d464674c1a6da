//! Tree-sitter Utility Functions

use tree_sitter::Node;

// ═══════════════════════════════════════════════════════════════════════════
// Node Traversal Utilities
// ═══════════════════════════════════════════════════════════════════════════

/// Visit every node in pre-order together with its depth (root = 0).
///
/// Iterative so that deeply nested sources cannot overflow the stack.
pub fn walk_with_depth<'a, F>(root: Node<'a>, mut visit: F)
where
    F: FnMut(Node<'a>, usize),
{
    let mut stack = vec![(root, 0usize)];
    while let Some((current, depth)) = stack.pop() {
        visit(current, depth);
        for i in (0..current.child_count()).rev() {
            if let Some(child) = current.child(i) {
                stack.push((child, depth + 1));
            }
        }
    }
}

/// Number of ancestors of `node` whose kind satisfies `pred`
pub fn count_ancestors<F>(node: Node<'_>, pred: F) -> usize
where
    F: Fn(&str) -> bool,
{
    let mut count = 0;
    let mut current = node.parent();
    while let Some(parent) = current {
        if pred(parent.kind()) {
            count += 1;
        }
        current = parent.parent();
    }
    count
}

// ═══════════════════════════════════════════════════════════════════════════
// Text Extraction
// ═══════════════════════════════════════════════════════════════════════════

/// Extract text from a node's byte range
///
/// Returns an empty string when the range is outside `source` or splits a
/// UTF-8 sequence.
#[inline]
pub fn extract_node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    source.get(node.start_byte()..node.end_byte()).unwrap_or("")
}

/// Name of the function being called by a `call_expression`.
///
/// `foo(x)` yields `foo`, `obj->op(x)` and `obj.op(x)` yield `op`. Calls
/// through arbitrary expressions (`(*fp)(x)`) have no name.
pub fn call_target_name<'a>(call: &Node, source: &'a str) -> Option<&'a str> {
    let function = call.child_by_field_name("function")?;
    match function.kind() {
        "identifier" => Some(extract_node_text(&function, source)),
        "field_expression" => function
            .child_by_field_name("field")
            .map(|field| extract_node_text(&field, source)),
        _ => None,
    }
    .filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tree_sitter::Parser;

    fn parse(source: &str) -> tree_sitter::Tree {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_c::language()).unwrap();
        parser.parse(source, None).unwrap()
    }

    #[test]
    fn test_walk_visits_all_nodes() {
        let source = "int f(void) { return g(1); }";
        let tree = parse(source);
        let mut kinds = Vec::new();
        let mut max_depth = 0;
        walk_with_depth(tree.root_node(), |node, depth| {
            kinds.push(node.kind().to_string());
            max_depth = max_depth.max(depth);
        });
        assert_eq!(kinds[0], "translation_unit");
        assert!(kinds.iter().any(|k| k == "call_expression"));
        assert!(max_depth > 3);
    }

    #[test]
    fn test_call_target_name() {
        let source = "void f(void) { strcpy(a, b); dev->ops(x); }";
        let tree = parse(source);
        let mut names = Vec::new();
        walk_with_depth(tree.root_node(), |node, _| {
            if node.kind() == "call_expression" {
                if let Some(name) = call_target_name(&node, source) {
                    names.push(name.to_string());
                }
            }
        });
        assert_eq!(names, vec!["strcpy", "ops"]);
    }
}
