use serde::{Deserialize, Serialize};

use crate::domain::ElectionId;

/// Default window used by the recent-elections listing.
pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// The ledger's recent-elections view takes no arguments and always returns
/// its fixed window, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastElectionsRequest {}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountElectionsRequest {
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidatesRequest {
    pub election_id: ElectionId,
}

/// Arguments of both `vote` and `revoke`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    pub election_id: ElectionId,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateElectionRequest {
    pub candidates: Vec<String>,
    pub multiple: bool,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Vote,
    Revoke,
}

impl MutationKind {
    /// Gateway method name of the mutation.
    pub fn method(self) -> &'static str {
        match self {
            Self::Vote => "vote",
            Self::Revoke => "revoke",
        }
    }
}
