//! Graph Parsing Domain Models
//!
//! ```text
//! domain/
//! ├── property_value.rs  # PropertyValue, Scalar, VertexId
//! ├── property_graph.rs  # Vertex, Edge, PropertyGraph
//! └── histogram.rs       # LabelHistogram, GraphStats, validation
//! ```

pub mod histogram;
pub mod property_graph;
pub mod property_value;

// Re-exports for convenience
pub use histogram::{GraphStats, LabelHistogram, LabelValidation, ValidationReport};
pub use property_graph::{Edge, PropertyGraph, Vertex};
pub use property_value::{PropertyValue, Scalar, VertexId};
