//! Per-election candidate loading, vote/revoke submission and reconciliation
//! with the authoritative tally.

use std::{fmt, sync::Arc};

use shared::{
    domain::{Candidate, Election, ElectionId},
    protocol::{MutationKind, VoteRequest},
};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, info, warn};

use crate::{
    error::{ElectionError, RemoteCallError, ValidationError},
    selection::SelectionTracker,
    service::RemoteElectionService,
};

const SYNC_EVENT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Loading,
    Ready,
    Submitting,
    Failed,
}

impl SyncPhase {
    fn is_in_flight(self) -> bool {
        matches!(self, Self::Loading | Self::Submitting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Loading,
    /// `error` holds the failure of the last mutation, if it failed.
    Ready {
        candidates: Vec<Candidate>,
        error: Option<RemoteCallError>,
    },
    Submitting {
        candidates: Vec<Candidate>,
        mutation: MutationKind,
    },
    Failed(RemoteCallError),
}

impl SyncState {
    pub fn phase(&self) -> SyncPhase {
        match self {
            Self::Idle => SyncPhase::Idle,
            Self::Loading => SyncPhase::Loading,
            Self::Ready { .. } => SyncPhase::Ready,
            Self::Submitting { .. } => SyncPhase::Submitting,
            Self::Failed(_) => SyncPhase::Failed,
        }
    }

    pub fn candidates(&self) -> Option<&[Candidate]> {
        match self {
            Self::Ready { candidates, .. } | Self::Submitting { candidates, .. } => {
                Some(candidates)
            }
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&RemoteCallError> {
        match self {
            Self::Ready { error, .. } => error.as_ref(),
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncEvent {
    pub election_id: ElectionId,
    pub state: SyncState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub name: String,
    pub supported: u64,
    pub checked: bool,
}

impl CandidateRow {
    /// Stable render key; candidate names are unique within an election.
    pub fn key(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElectionSnapshot {
    pub election: Election,
    pub state: SyncState,
    pub selection: Vec<String>,
    pub rows: Vec<CandidateRow>,
    pub defunct: bool,
}

struct SyncInner {
    state: SyncState,
    selection: SelectionTracker,
    /// Bumped whenever a remote call is issued or the view is torn down.
    /// A response is only applied if the generation it was issued under is
    /// still current.
    generation: u64,
    defunct: bool,
}

pub struct ElectionSyncController {
    election: Election,
    service: Arc<dyn RemoteElectionService>,
    inner: Mutex<SyncInner>,
    events: broadcast::Sender<SyncEvent>,
}

impl fmt::Debug for ElectionSyncController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElectionSyncController")
            .field("election", &self.election)
            .finish_non_exhaustive()
    }
}

impl ElectionSyncController {
    pub fn new(election: Election, service: Arc<dyn RemoteElectionService>) -> Arc<Self> {
        let (events, _) = broadcast::channel(SYNC_EVENT_CAPACITY);
        Arc::new(Self {
            election,
            service,
            inner: Mutex::new(SyncInner {
                state: SyncState::Idle,
                selection: SelectionTracker::new(),
                generation: 0,
                defunct: false,
            }),
            events,
        })
    }

    pub fn election(&self) -> &Election {
        &self.election
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<SyncEvent> {
        self.events.subscribe()
    }

    /// Initial candidate load. Only valid once, from `Idle`.
    pub async fn mount(&self) -> Result<(), ElectionError> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            if !inner.defunct && inner.state.phase() != SyncPhase::Idle {
                return Err(ElectionError::AlreadyMounted);
            }
            self.begin_call(&mut inner, SyncState::Loading)?
        };
        info!(election_id = %self.election.id, "loading candidates");
        self.fetch_candidates(ticket, false).await
    }

    /// Re-fetches candidates and drops the current selection.
    pub async fn reload(&self) -> Result<(), ElectionError> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            let ticket = self.begin_call(&mut inner, SyncState::Loading)?;
            inner.selection.clear();
            ticket
        };
        info!(election_id = %self.election.id, "reloading candidates");
        self.fetch_candidates(ticket, false).await
    }

    pub async fn submit_vote(&self) -> Result<(), ElectionError> {
        self.submit(MutationKind::Vote).await
    }

    pub async fn submit_revoke(&self) -> Result<(), ElectionError> {
        self.submit(MutationKind::Revoke).await
    }

    pub async fn set_option(&self, name: &str, checked: bool) {
        let mut inner = self.inner.lock().await;
        if inner.defunct {
            debug!(election_id = %self.election.id, option = name, "ignoring selection on torn down view");
            return;
        }
        inner
            .selection
            .set_option(name, checked, self.election.multiple);
    }

    pub async fn selection(&self) -> Vec<String> {
        self.inner.lock().await.selection.current().to_vec()
    }

    pub async fn state(&self) -> SyncState {
        self.inner.lock().await.state.clone()
    }

    pub async fn snapshot(&self) -> ElectionSnapshot {
        let inner = self.inner.lock().await;
        let rows = inner
            .state
            .candidates()
            .unwrap_or_default()
            .iter()
            .map(|candidate| CandidateRow {
                name: candidate.name.clone(),
                supported: candidate.supported,
                checked: inner.selection.contains(&candidate.name),
            })
            .collect();
        ElectionSnapshot {
            election: self.election.clone(),
            state: inner.state.clone(),
            selection: inner.selection.current().to_vec(),
            rows,
            defunct: inner.defunct,
        }
    }

    /// Marks the view as gone. Any response still outstanding is discarded
    /// when it arrives.
    pub async fn teardown(&self) {
        let mut inner = self.inner.lock().await;
        if inner.defunct {
            return;
        }
        inner.defunct = true;
        inner.generation += 1;
        inner.selection.clear();
        debug!(
            election_id = %self.election.id,
            phase = ?inner.state.phase(),
            "election view torn down"
        );
    }

    pub async fn is_defunct(&self) -> bool {
        self.inner.lock().await.defunct
    }

    async fn submit(&self, mutation: MutationKind) -> Result<(), ElectionError> {
        let (ticket, request) = {
            let mut inner = self.inner.lock().await;
            if inner.defunct {
                return Err(ElectionError::Defunct);
            }
            let candidates = match &inner.state {
                SyncState::Ready { candidates, .. } => candidates.clone(),
                other => {
                    debug!(
                        election_id = %self.election.id,
                        mutation = ?mutation,
                        phase = ?other.phase(),
                        "rejecting mutation outside ready state"
                    );
                    let phase = other.phase();
                    return Err(if phase.is_in_flight() {
                        ElectionError::Busy(phase)
                    } else {
                        ElectionError::NotReady(phase)
                    });
                }
            };
            if inner.selection.is_empty() {
                debug!(election_id = %self.election.id, mutation = ?mutation, "nothing selected");
                return Err(ValidationError::EmptySelection.into());
            }
            let request = VoteRequest {
                election_id: self.election.id.clone(),
                options: inner.selection.current().to_vec(),
            };
            let ticket = self.advance(
                &mut inner,
                SyncState::Submitting {
                    candidates,
                    mutation,
                },
            );
            (ticket, request)
        };

        info!(
            election_id = %self.election.id,
            mutation = ?mutation,
            options = ?request.options,
            "submitting mutation"
        );
        let result = match mutation {
            MutationKind::Vote => self.service.vote(&request).await,
            MutationKind::Revoke => self.service.revoke(&request).await,
        };

        let ticket = {
            let mut inner = self.inner.lock().await;
            self.ensure_current(&inner, ticket)?;
            if let Err(err) = result {
                let err = RemoteCallError::from(err);
                warn!(
                    election_id = %self.election.id,
                    mutation = ?mutation,
                    error = %err,
                    "mutation failed; selection kept"
                );
                let candidates = inner
                    .state
                    .candidates()
                    .map(<[Candidate]>::to_vec)
                    .unwrap_or_default();
                self.advance(
                    &mut inner,
                    SyncState::Ready {
                        candidates,
                        error: Some(err.clone()),
                    },
                );
                return Err(err.into());
            }
            self.advance(&mut inner, SyncState::Loading)
        };

        self.fetch_candidates(ticket, true).await
    }

    async fn fetch_candidates(
        &self,
        ticket: u64,
        clear_on_success: bool,
    ) -> Result<(), ElectionError> {
        let result = self.service.candidates(&self.election.id).await;

        let mut inner = self.inner.lock().await;
        self.ensure_current(&inner, ticket)?;
        match result {
            Ok(candidates) => {
                if clear_on_success {
                    inner.selection.clear();
                }
                info!(
                    election_id = %self.election.id,
                    candidates = candidates.len(),
                    "candidates loaded"
                );
                self.advance(
                    &mut inner,
                    SyncState::Ready {
                        candidates,
                        error: None,
                    },
                );
                Ok(())
            }
            Err(err) => {
                let err = RemoteCallError::from(err);
                warn!(election_id = %self.election.id, error = %err, "candidate load failed");
                self.advance(&mut inner, SyncState::Failed(err.clone()));
                Err(err.into())
            }
        }
    }

    /// Single-flight gate: refuses to start a call while another one is
    /// outstanding or after teardown.
    fn begin_call(&self, inner: &mut SyncInner, next: SyncState) -> Result<u64, ElectionError> {
        if inner.defunct {
            return Err(ElectionError::Defunct);
        }
        let phase = inner.state.phase();
        if phase.is_in_flight() {
            debug!(election_id = %self.election.id, phase = ?phase, "call rejected, busy");
            return Err(ElectionError::Busy(phase));
        }
        Ok(self.advance(inner, next))
    }

    fn advance(&self, inner: &mut SyncInner, next: SyncState) -> u64 {
        inner.generation += 1;
        inner.state = next;
        let _ = self.events.send(SyncEvent {
            election_id: self.election.id.clone(),
            state: inner.state.clone(),
        });
        inner.generation
    }

    fn ensure_current(&self, inner: &SyncInner, ticket: u64) -> Result<(), ElectionError> {
        if inner.defunct || inner.generation != ticket {
            debug!(
                election_id = %self.election.id,
                ticket,
                generation = inner.generation,
                "discarding stale response"
            );
            return Err(ElectionError::Defunct);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/sync_tests.rs"]
mod tests;
