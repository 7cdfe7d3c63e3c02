use std::sync::Arc;

use shared::{domain::ElectionId, protocol::CreateElectionRequest};
use tracing::{info, warn};

use crate::{
    error::{ElectionError, RemoteCallError, ValidationError},
    service::RemoteElectionService,
};

/// Raw form input for a new election. Kept by the caller so a failed
/// submission can be retried without retyping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElectionDraft {
    pub name: String,
    /// One candidate per line.
    pub candidates_text: String,
    pub multiple: bool,
}

impl ElectionDraft {
    pub fn new(name: impl Into<String>, candidates_text: impl Into<String>, multiple: bool) -> Self {
        Self {
            name: name.into(),
            candidates_text: candidates_text.into(),
            multiple,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Trims every line and drops the blank ones.
pub fn parse_candidate_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validates input and builds the request without touching the service.
pub fn build_create_request(
    name: &str,
    raw_candidates: &str,
    multiple: bool,
) -> Result<CreateElectionRequest, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    let candidates = parse_candidate_lines(raw_candidates);
    if candidates.is_empty() {
        return Err(ValidationError::NoCandidates);
    }
    Ok(CreateElectionRequest {
        candidates,
        multiple,
        name: name.to_string(),
    })
}

pub struct ElectionCreateController {
    service: Arc<dyn RemoteElectionService>,
}

impl ElectionCreateController {
    pub fn new(service: Arc<dyn RemoteElectionService>) -> Self {
        Self { service }
    }

    /// Returns the new election's id. The caller owns the election list and
    /// is expected to refresh it on success.
    pub async fn create(
        &self,
        name: &str,
        raw_candidates: &str,
        multiple: bool,
    ) -> Result<ElectionId, ElectionError> {
        let request = build_create_request(name, raw_candidates, multiple)?;
        info!(
            name = %request.name,
            candidates = request.candidates.len(),
            multiple,
            "creating election"
        );
        match self.service.create_election(&request).await {
            Ok(election_id) => {
                info!(election_id = %election_id, "election created");
                Ok(election_id)
            }
            Err(err) => {
                let err = RemoteCallError::from(err);
                warn!(name = %request.name, error = %err, "election creation failed");
                Err(err.into())
            }
        }
    }

    pub async fn submit(&self, draft: &ElectionDraft) -> Result<ElectionId, ElectionError> {
        self.create(&draft.name, &draft.candidates_text, draft.multiple)
            .await
    }
}

#[cfg(test)]
#[path = "tests/create_tests.rs"]
mod tests;
