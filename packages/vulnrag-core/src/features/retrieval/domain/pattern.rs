//! Index pattern types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two parallel indexes an entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatternType {
    /// Code before the fix
    Vuln,
    /// Code after the fix
    Patch,
}

impl PatternType {
    pub const ALL: [PatternType; 2] = [PatternType::Vuln, PatternType::Patch];

    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Vuln => "VULN",
            PatternType::Patch => "PATCH",
        }
    }

    /// Artifact file prefix
    pub fn prefix(&self) -> &'static str {
        match self {
            PatternType::Vuln => "vuln",
            PatternType::Patch => "patch",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
