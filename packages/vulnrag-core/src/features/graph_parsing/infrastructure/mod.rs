//! Graph document decoding

pub mod graphson;

pub use graphson::{decode_document, read_document};
