//! Scripted election service shared by the controller tests.

use std::{collections::HashMap, collections::VecDeque, sync::Arc};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::{
    domain::{Candidate, Election, ElectionId},
    protocol::{CreateElectionRequest, VoteRequest},
};
use tokio::sync::{Mutex, Notify};

use crate::service::RemoteElectionService;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ServiceCall {
    Recent(usize),
    Account(String),
    Candidates(ElectionId),
    Vote(VoteRequest),
    Revoke(VoteRequest),
    Create(CreateElectionRequest),
}

impl ServiceCall {
    pub(crate) fn method(&self) -> &'static str {
        match self {
            Self::Recent(_) => "recent",
            Self::Account(_) => "account",
            Self::Candidates(_) => "candidates",
            Self::Vote(_) => "vote",
            Self::Revoke(_) => "revoke",
            Self::Create(_) => "create",
        }
    }
}

/// Holds a call open until the test releases it.
#[derive(Default)]
pub(crate) struct Gate {
    entered: Notify,
    release: Notify,
}

impl Gate {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    pub(crate) fn release(&self) {
        self.release.notify_one();
    }

    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
pub(crate) struct FakeElectionService {
    elections: Mutex<VecDeque<Result<Vec<Election>, String>>>,
    candidates: Mutex<VecDeque<Result<Vec<Candidate>, String>>>,
    mutations: Mutex<VecDeque<Result<(), String>>>,
    created: Mutex<VecDeque<Result<ElectionId, String>>>,
    gates: HashMap<&'static str, Arc<Gate>>,
    calls: Mutex<Vec<ServiceCall>>,
}

impl FakeElectionService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_gate(mut self, method: &'static str, gate: Arc<Gate>) -> Self {
        self.gates.insert(method, gate);
        self
    }

    pub(crate) fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub(crate) async fn push_elections(&self, result: Result<Vec<Election>, &str>) {
        self.elections
            .lock()
            .await
            .push_back(result.map_err(str::to_string));
    }

    pub(crate) async fn push_candidates(&self, result: Result<Vec<Candidate>, &str>) {
        self.candidates
            .lock()
            .await
            .push_back(result.map_err(str::to_string));
    }

    pub(crate) async fn push_mutation(&self, result: Result<(), &str>) {
        self.mutations
            .lock()
            .await
            .push_back(result.map_err(str::to_string));
    }

    pub(crate) async fn push_created(&self, result: Result<ElectionId, &str>) {
        self.created
            .lock()
            .await
            .push_back(result.map_err(str::to_string));
    }

    pub(crate) async fn calls(&self) -> Vec<ServiceCall> {
        self.calls.lock().await.clone()
    }

    pub(crate) async fn count(&self, method: &str) -> usize {
        self.calls
            .lock()
            .await
            .iter()
            .filter(|call| call.method() == method)
            .count()
    }

    async fn record(&self, call: ServiceCall) {
        let gate = self.gates.get(call.method()).cloned();
        self.calls.lock().await.push(call);
        if let Some(gate) = gate {
            gate.pass().await;
        }
    }
}

fn scripted<T>(next: Option<Result<T, String>>, method: &str) -> Result<T> {
    match next {
        Some(Ok(value)) => Ok(value),
        Some(Err(message)) => Err(anyhow!(message)),
        None => Err(anyhow!("no scripted response for {method}")),
    }
}

#[async_trait]
impl RemoteElectionService for FakeElectionService {
    async fn recent_elections(&self, limit: usize) -> Result<Vec<Election>> {
        self.record(ServiceCall::Recent(limit)).await;
        scripted(self.elections.lock().await.pop_front(), "recent_elections")
    }

    async fn account_elections(&self, account: &str) -> Result<Vec<Election>> {
        self.record(ServiceCall::Account(account.to_string())).await;
        scripted(self.elections.lock().await.pop_front(), "account_elections")
    }

    async fn candidates(&self, election_id: &ElectionId) -> Result<Vec<Candidate>> {
        self.record(ServiceCall::Candidates(election_id.clone()))
            .await;
        scripted(self.candidates.lock().await.pop_front(), "candidates")
    }

    async fn vote(&self, request: &VoteRequest) -> Result<()> {
        self.record(ServiceCall::Vote(request.clone())).await;
        let next = self.mutations.lock().await.pop_front();
        scripted(next.or(Some(Ok(()))), "vote")
    }

    async fn revoke(&self, request: &VoteRequest) -> Result<()> {
        self.record(ServiceCall::Revoke(request.clone())).await;
        let next = self.mutations.lock().await.pop_front();
        scripted(next.or(Some(Ok(()))), "revoke")
    }

    async fn create_election(&self, request: &CreateElectionRequest) -> Result<ElectionId> {
        self.record(ServiceCall::Create(request.clone())).await;
        let next = self.created.lock().await.pop_front();
        scripted(next.or(Some(Ok(ElectionId::new("0")))), "create_election")
    }
}

pub(crate) fn election(id: &str, name: &str, multiple: bool) -> Election {
    Election {
        id: ElectionId::new(id),
        name: name.to_string(),
        multiple,
    }
}

pub(crate) fn tally(entries: &[(&str, u64)]) -> Vec<Candidate> {
    entries
        .iter()
        .map(|(name, supported)| Candidate::new(*name, *supported))
        .collect()
}

pub(crate) fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}
