//! Lexical Similarity (TF-IDF)
//!
//! # Architecture Overview
//!
//! ```text
//! combined feature text
//!     ↓
//! IdentifierTokenizer + LowerCaser (tantivy TextAnalyzer)
//!     ↓
//! TfidfVectorizer (vocabulary + smoothed idf, L2 rows)
//!     ↓
//! SparseVector cosine
//! ```
//!
//! The vectorizer is fitted once per index at build time and persisted with
//! the index artifacts; queries are transformed with the frozen vocabulary.

pub mod tfidf;
pub mod tokenizer;

pub use tfidf::{SparseVector, TfidfVectorizer};
pub use tokenizer::{build_identifier_analyzer, tokenize, IdentifierTokenizer};
