//! Feature modules - Each feature follows Hexagonal Architecture
//!
//! Each feature contains:
//! - domain/     - Pure business logic (no external dependencies)
//! - ports/      - Interface definitions (traits)
//! - application/ - Use cases
//! - infrastructure/ - External dependency implementations
//!
//! Data flows top to bottom:
//!
//! ```text
//! graph_parsing ─▶ feature_extraction ─▶ retrieval ─▶ evidence
//!       └────────▶ signature (offline corpus rows)
//! lexical (tokenizer + TF-IDF) ─▶ retrieval
//! ```

pub mod graph_parsing;

pub mod feature_extraction;

// Offline corpus signatures (CSV)
pub mod signature;

pub mod lexical;

pub mod retrieval;

pub mod evidence;
