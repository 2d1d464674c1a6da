//! Graph Parsing
//!
//! Turns serialized code property graphs (GraphSON `tinker:graph`) into an
//! in-memory [`PropertyGraph`] and answers histogram, statistics and schema
//! validation queries about it.
//!
//! # Hexagonal Architecture
//!
//! ```text
//! application/ (GraphParser - entry point)
//!           ↓
//! infrastructure/ (GraphSON decoding)
//!           ↓
//! domain/ (PropertyGraph, PropertyValue, histograms)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use vulnrag_core::features::graph_parsing::GraphParser;
//!
//! let mut parser = GraphParser::new();
//! if parser.parse(Path::new("cpg.json")) {
//!     println!("{:?}", parser.vertex_type_histogram());
//! }
//! ```

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-export application layer (primary interface)
pub use application::{
    check_dir, check_file, write_report_file, CheckStatus, CpgCheck, GraphParser, GraphSource,
    GraphSummary, SanityReport,
};

// Re-export domain types
pub use domain::{
    Edge, GraphStats, LabelHistogram, LabelValidation, PropertyGraph, PropertyValue, Scalar,
    ValidationReport, Vertex, VertexId,
};

pub use error::GraphParseError;
