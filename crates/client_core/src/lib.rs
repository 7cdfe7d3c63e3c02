//! Client side of the ledger-backed election service: per-election selection
//! state, vote/revoke submission with authoritative re-fetch, election
//! creation and the recent-elections list.

pub mod board;
pub mod create;
pub mod error;
pub mod list;
pub mod selection;
pub mod service;
pub mod sync;
pub mod transport;

pub use board::ElectionBoard;
pub use create::{ElectionCreateController, ElectionDraft};
pub use error::{ElectionError, RemoteCallError, ValidationError};
pub use list::{ElectionListController, ListScope, ListStatus};
pub use selection::SelectionTracker;
pub use service::{MissingElectionService, RemoteElectionService};
pub use sync::{
    CandidateRow, ElectionSnapshot, ElectionSyncController, SyncEvent, SyncPhase, SyncState,
};
pub use transport::HttpElectionService;

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;
