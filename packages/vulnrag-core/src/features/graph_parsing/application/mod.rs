//! Graph parsing application layer

pub mod parser;
pub mod sanity;

pub use parser::{GraphParser, GraphSource, GraphSummary};
pub use sanity::{check_dir, check_file, write_report_file, CheckStatus, CpgCheck, SanityReport};
