use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Candidate, Election, ElectionId},
    protocol::{CreateElectionRequest, VoteRequest},
};

/// Capabilities of the ledger program that owns elections, candidates and
/// tallies. Every call suspends until exactly one result arrives.
#[async_trait]
pub trait RemoteElectionService: Send + Sync {
    /// Newest first, at most `limit` entries.
    async fn recent_elections(&self, limit: usize) -> Result<Vec<Election>>;
    /// Elections created by `account`, in creation order.
    async fn account_elections(&self, account: &str) -> Result<Vec<Election>>;
    async fn candidates(&self, election_id: &ElectionId) -> Result<Vec<Candidate>>;
    async fn vote(&self, request: &VoteRequest) -> Result<()>;
    async fn revoke(&self, request: &VoteRequest) -> Result<()>;
    async fn create_election(&self, request: &CreateElectionRequest) -> Result<ElectionId>;
}

pub struct MissingElectionService;

#[async_trait]
impl RemoteElectionService for MissingElectionService {
    async fn recent_elections(&self, _limit: usize) -> Result<Vec<Election>> {
        Err(anyhow!("election service is unavailable"))
    }

    async fn account_elections(&self, account: &str) -> Result<Vec<Election>> {
        Err(anyhow!("election service is unavailable for account {account}"))
    }

    async fn candidates(&self, election_id: &ElectionId) -> Result<Vec<Candidate>> {
        Err(anyhow!("election service is unavailable for election {election_id}"))
    }

    async fn vote(&self, request: &VoteRequest) -> Result<()> {
        Err(anyhow!(
            "election service is unavailable for election {}",
            request.election_id
        ))
    }

    async fn revoke(&self, request: &VoteRequest) -> Result<()> {
        Err(anyhow!(
            "election service is unavailable for election {}",
            request.election_id
        ))
    }

    async fn create_election(&self, _request: &CreateElectionRequest) -> Result<ElectionId> {
        Err(anyhow!("election service is unavailable"))
    }
}
