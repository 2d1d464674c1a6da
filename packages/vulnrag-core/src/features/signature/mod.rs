//! Structural Signatures
//!
//! Per-graph summary rows for offline corpus analysis: graph metrics, loop
//! and conditional counts, CWE-indexed dangerous method counts and edge
//! type counts. Batches run in parallel and are written as CSV.
//!
//! ```text
//! application/ (SignatureExtractor, SignatureBatch)
//!           ↓
//! infrastructure/ (CSV writer)
//!           ↓
//! domain/ (Signature, CweCategory call sets)
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{
    collect_graph_files, instance_id, BatchResult, BatchSummary, SignatureBatch,
    SignatureExtractor,
};
pub use domain::{CweCategory, Signature, SIGNATURE_COLUMNS};
pub use infrastructure::{write_csv, write_csv_file};
