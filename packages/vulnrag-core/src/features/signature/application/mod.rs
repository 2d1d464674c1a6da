//! Signature application layer

pub mod batch;
pub mod extractor;

pub use batch::{collect_graph_files, BatchResult, BatchSummary, SignatureBatch};
pub use extractor::{instance_id, SignatureExtractor};
