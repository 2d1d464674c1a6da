//! Feature extraction strategies
//!
//! - `graph_extractor`: code property graph → features
//! - `syntax_tree_strategy`: tree-sitter C → features
//! - `lexical_strategy`: regex scan → features (always available)

pub mod graph_extractor;
pub mod lexical_strategy;
pub mod syntax_tree_strategy;

pub use graph_extractor::GraphFeatureExtractor;
pub use lexical_strategy::LexicalStrategy;
pub use syntax_tree_strategy::SyntaxTreeStrategy;
