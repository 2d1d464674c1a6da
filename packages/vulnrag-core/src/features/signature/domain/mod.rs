//! Signature domain: column schema and CWE call sets

pub mod cwe;
pub mod signature;

pub use cwe::{contains_any, is_dangerous, CweCategory, ALLOC_CALLS, FREE_CALLS};
pub use signature::{Signature, SIGNATURE_COLUMNS};
