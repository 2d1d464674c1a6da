//! Evidence domain: per-match records and the differential summary

pub mod differential;
pub mod records;

pub use differential::{ConfidenceLevel, DifferentialAnalysis, Recommendation, SecurityDifference};
pub use records::{EvidenceAgainst, EvidenceFor};
