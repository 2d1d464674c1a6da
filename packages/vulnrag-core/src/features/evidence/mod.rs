//! Evidence
//!
//! Turns ranked VULN and PATCH matches into records that argue for or
//! against a vulnerability verdict, plus a differential summary of the two
//! best matches. Pure: no I/O, no logging.
//!
//! ```text
//! application/ (EvidenceComposer)
//!           ↓
//! domain/ (EvidenceFor, EvidenceAgainst, DifferentialAnalysis)
//! ```

pub mod application;
pub mod domain;

pub use application::{EvidenceBundle, EvidenceComposer};
pub use domain::{
    ConfidenceLevel, DifferentialAnalysis, EvidenceAgainst, EvidenceFor, Recommendation,
    SecurityDifference,
};
