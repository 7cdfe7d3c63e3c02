//! JSON-over-HTTP access to the election program through an RPC gateway.
//! Each call is `POST {service_url}/{method}` with the arguments as body.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use shared::{
    domain::{Candidate, Election, ElectionId},
    error::{ApiError, ApiException},
    protocol::{
        AccountElectionsRequest, CandidatesRequest, CreateElectionRequest, MutationKind,
        LastElectionsRequest, VoteRequest,
    },
};
use tracing::debug;
use url::Url;

use crate::service::RemoteElectionService;

const RECENT_ELECTIONS_METHOD: &str = "get_last5elections";
const ACCOUNT_ELECTIONS_METHOD: &str = "get_elections";
const CANDIDATES_METHOD: &str = "get_candidates";
const CREATE_ELECTION_METHOD: &str = "create_election";

pub struct HttpElectionService {
    http: Client,
    base_url: Url,
}

impl HttpElectionService {
    pub fn new(service_url: &str) -> Result<Self> {
        Self::with_client(service_url, Client::new())
    }

    pub fn with_timeout(service_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build election service http client")?;
        Self::with_client(service_url, http)
    }

    fn with_client(service_url: &str, http: Client) -> Result<Self> {
        Ok(Self {
            http,
            base_url: normalize_service_url(service_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn send<A: Serialize + ?Sized>(&self, method: &str, args: &A) -> Result<Response> {
        let url = self
            .base_url
            .join(method)
            .with_context(|| format!("invalid election service method '{method}'"))?;
        debug!(method, url = %url, "election service call");
        let response = self
            .http
            .post(url)
            .json(args)
            .send()
            .await
            .with_context(|| format!("{method} request failed"))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        if let Ok(api_error) = serde_json::from_str::<ApiError>(&body) {
            return Err(ApiException::from(api_error).into());
        }
        let body = body.trim();
        if body.is_empty() {
            return Err(anyhow!("{method} failed with status {status}"));
        }
        Err(anyhow!("{method} failed with status {status}: {body}"))
    }

    async fn call<A, R>(&self, method: &str, args: &A) -> Result<R>
    where
        A: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send(method, args)
            .await?
            .json()
            .await
            .with_context(|| format!("malformed {method} response"))
    }

    async fn mutate(&self, mutation: MutationKind, request: &VoteRequest) -> Result<()> {
        self.send(mutation.method(), request).await?;
        Ok(())
    }
}

/// Accepts http(s) URLs only and makes sure relative method joins land
/// under the configured path.
pub fn normalize_service_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let mut url =
        Url::parse(raw).with_context(|| format!("invalid election service url '{raw}'"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "unsupported election service url scheme '{}'",
            url.scheme()
        );
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

#[async_trait]
impl RemoteElectionService for HttpElectionService {
    async fn recent_elections(&self, limit: usize) -> Result<Vec<Election>> {
        let mut elections: Vec<Election> = self
            .call(RECENT_ELECTIONS_METHOD, &LastElectionsRequest {})
            .await?;
        elections.truncate(limit);
        Ok(elections)
    }

    async fn account_elections(&self, account: &str) -> Result<Vec<Election>> {
        self.call(
            ACCOUNT_ELECTIONS_METHOD,
            &AccountElectionsRequest {
                user_id: account.to_string(),
            },
        )
        .await
    }

    async fn candidates(&self, election_id: &ElectionId) -> Result<Vec<Candidate>> {
        self.call(
            CANDIDATES_METHOD,
            &CandidatesRequest {
                election_id: election_id.clone(),
            },
        )
        .await
    }

    async fn vote(&self, request: &VoteRequest) -> Result<()> {
        self.mutate(MutationKind::Vote, request).await
    }

    async fn revoke(&self, request: &VoteRequest) -> Result<()> {
        self.mutate(MutationKind::Revoke, request).await
    }

    async fn create_election(&self, request: &CreateElectionRequest) -> Result<ElectionId> {
        self.call(CREATE_ELECTION_METHOD, request).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
