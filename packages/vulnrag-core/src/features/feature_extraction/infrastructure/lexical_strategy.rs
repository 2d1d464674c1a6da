//! Lexical (regex) feature extraction
//!
//! Works on any text, including fragments no parser accepts. Comments,
//! string/char literals and preprocessor lines are blanked before scanning.
//!
//! | metric                | estimate                         |
//! |-----------------------|----------------------------------|
//! | node_count            | max(lines, 1)                    |
//! | edge_count            | nodes + 2·control                |
//! | cyclomatic_complexity | 1 + control                      |
//! | essential_complexity  | control + (2·control) / 10       |
//! | nesting_depth         | maximum `{` depth                |
//! | block_count           | number of `{`                    |
//! | method_count          | function-definition headers      |

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::features::feature_extraction::domain::{
    ExtractedFeatures, NameObservations, StrategyKind, StructuralFeatures,
};
use crate::features::feature_extraction::error::FeatureExtractionError;
use crate::features::feature_extraction::ports::FeatureExtractionStrategy;

/// C keywords; never calls or identifiers
pub const C_KEYWORDS: &[&str] = &[
    "auto", "break", "case", "char", "const", "continue", "default", "do", "double", "else", "enum",
    "extern", "float", "for", "goto", "if", "inline", "int", "long", "register", "restrict",
    "return", "short", "signed", "sizeof", "static", "struct", "switch", "typedef", "union",
    "unsigned", "void", "volatile", "while", "_Alignas", "_Alignof", "_Bool", "_Complex",
    "_Generic", "_Noreturn", "_Static_assert", "_Thread_local",
];

static NON_CODE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?ms)/\*.*?\*/|//[^\n]*|"(?:\\.|[^"\\\n])*"|'(?:\\.|[^'\\\n])*'|^[ \t]*#[^\n]*"#,
    )
    .expect("valid non-code regex")
});

static CONTROL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:if|for|while|switch|case)\b").expect("valid control regex"));

/// `->name` / `.name` member access, plain names, and a trailing `(` for calls
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:(?P<member>->|\.)\s*)?\b(?P<name>[A-Za-z_]\w*)\b(?P<call>\s*\()?")
        .expect("valid token regex")
});

/// `type-words name(params) {` at the start of a line
static METHOD_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?:[A-Za-z_]\w*[ \t\*]+)+\*?(?P<name>[A-Za-z_]\w*)\s*\([^;{}()]*(?:\([^;{}()]*\)[^;{}()]*)*\)\s*\{",
    )
    .expect("valid method header regex")
});

static KEYWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| C_KEYWORDS.iter().copied().collect());

/// Regex-based text strategy; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalStrategy;

impl LexicalStrategy {
    pub fn new() -> Self {
        Self
    }

    /// Infallible extraction
    pub fn extract_text(&self, code: &str) -> ExtractedFeatures {
        let stripped = strip_non_code(code);

        let control = CONTROL.find_iter(&stripped).count();
        let (nesting, blocks) = brace_profile(&stripped);
        let definitions = method_definitions(&stripped);

        let observations = observe_tokens(&stripped, &definitions);

        let node_count = code.lines().count().max(1);
        let structural = StructuralFeatures {
            node_count,
            edge_count: node_count + 2 * control,
            cyclomatic_complexity: 1 + control,
            nesting_depth: nesting,
            essential_complexity: control + (2 * control) / 10,
            control_structure_count: control,
            block_count: blocks,
            method_count: definitions.len(),
            call_entropy: observations.call_entropy(),
            ..Default::default()
        }
        .with_ratios(observations.call_count());

        ExtractedFeatures::new(structural, observations.summarize(), StrategyKind::Lexical, false)
    }
}

impl FeatureExtractionStrategy for LexicalStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Lexical
    }

    fn extract(&self, code: &str) -> Result<ExtractedFeatures, FeatureExtractionError> {
        Ok(self.extract_text(code))
    }
}

/// Blank comments, literals and preprocessor lines (offsets are not kept)
fn strip_non_code(code: &str) -> String {
    NON_CODE.replace_all(code, " ").into_owned()
}

/// (maximum brace depth, number of opening braces)
fn brace_profile(code: &str) -> (usize, usize) {
    let mut depth = 0usize;
    let mut max_depth = 0usize;
    let mut opened = 0usize;
    for c in code.chars() {
        match c {
            '{' => {
                depth += 1;
                opened += 1;
                max_depth = max_depth.max(depth);
            }
            '}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    (max_depth, opened)
}

/// Start offsets of function names in top-level definition headers
fn method_definitions(code: &str) -> HashSet<usize> {
    let mut depth = BraceDepth::default();
    METHOD_HEADER
        .captures_iter(code)
        .filter_map(|caps| {
            let name = caps.name("name")?;
            if KEYWORDS.contains(name.as_str()) {
                return None;
            }
            (depth.at(code, name.start()) == 0).then_some(name.start())
        })
        .collect()
}

/// Running brace depth for non-decreasing offsets; each byte is scanned once.
#[derive(Debug, Default)]
struct BraceDepth {
    scanned: usize,
    depth: usize,
}

impl BraceDepth {
    /// Depth at byte `offset`. Offsets before the last one answered return
    /// the depth already reached.
    fn at(&mut self, code: &str, offset: usize) -> usize {
        let end = offset.min(code.len());
        if end > self.scanned {
            for &b in &code.as_bytes()[self.scanned..end] {
                match b {
                    b'{' => self.depth += 1,
                    b'}' => self.depth = self.depth.saturating_sub(1),
                    _ => {}
                }
            }
            self.scanned = end;
        }
        self.depth
    }
}

fn observe_tokens(code: &str, definitions: &HashSet<usize>) -> NameObservations {
    let mut observations = NameObservations::new();
    for caps in TOKEN.captures_iter(code) {
        let Some(name) = caps.name("name") else {
            continue;
        };
        if KEYWORDS.contains(name.as_str()) || definitions.contains(&name.start()) {
            continue;
        }
        let is_member = caps.name("member").is_some();
        let is_call = caps.name("call").is_some();
        match (is_call, is_member) {
            (true, _) => observations.push_call(name.as_str()),
            (false, true) => observations.push_field_identifier(name.as_str()),
            (false, false) => observations.push_identifier(name.as_str()),
        }
    }
    observations
}
