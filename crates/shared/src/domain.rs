use std::fmt;

use serde::{Deserialize, Serialize};

/// Ledger-assigned election identifier. The ledger encodes its numeric ids as
/// JSON strings, so the client keeps them opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElectionId(pub String);

impl ElectionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub id: ElectionId,
    pub name: String,
    #[serde(default)]
    pub multiple: bool,
}

/// One option of an election with its remotely counted support.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub name: String,
    pub supported: u64,
}

impl Candidate {
    pub fn new(name: impl Into<String>, supported: u64) -> Self {
        Self {
            name: name.into(),
            supported,
        }
    }
}
