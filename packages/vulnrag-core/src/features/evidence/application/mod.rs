pub mod composer;

pub use composer::{EvidenceBundle, EvidenceComposer};
