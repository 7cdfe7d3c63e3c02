use std::{mem, sync::Arc};

use futures::future::join_all;
use shared::{
    domain::{Election, ElectionId},
    protocol::DEFAULT_RECENT_LIMIT,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    error::{ElectionError, RemoteCallError},
    service::RemoteElectionService,
    sync::ElectionSyncController,
};

/// Which elections the list shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    Recent { limit: usize },
    Account(String),
}

impl Default for ListScope {
    fn default() -> Self {
        Self::Recent {
            limit: DEFAULT_RECENT_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed. Entries from an earlier successful fetch stay
    /// available.
    Failed(RemoteCallError),
}

struct ListInner {
    status: ListStatus,
    entries: Vec<Arc<ElectionSyncController>>,
    generation: u64,
    mounted: bool,
}

pub struct ElectionListController {
    service: Arc<dyn RemoteElectionService>,
    scope: ListScope,
    inner: Mutex<ListInner>,
}

impl ElectionListController {
    pub fn new(service: Arc<dyn RemoteElectionService>, scope: ListScope) -> Arc<Self> {
        Arc::new(Self {
            service,
            scope,
            inner: Mutex::new(ListInner {
                status: ListStatus::Idle,
                entries: Vec::new(),
                generation: 0,
                mounted: false,
            }),
        })
    }

    pub fn scope(&self) -> &ListScope {
        &self.scope
    }

    /// Initial fetch. There is no polling; later fetches go through
    /// [`Self::refresh`].
    pub async fn mount(&self) -> Result<Vec<Arc<ElectionSyncController>>, ElectionError> {
        {
            let mut inner = self.inner.lock().await;
            if inner.mounted {
                return Err(ElectionError::AlreadyMounted);
            }
            inner.mounted = true;
        }
        self.refresh().await
    }

    /// Re-fetches the list and replaces every per-election controller with a
    /// fresh one in `Idle`. Previous controllers are torn down.
    pub async fn refresh(&self) -> Result<Vec<Arc<ElectionSyncController>>, ElectionError> {
        let ticket = {
            let mut inner = self.inner.lock().await;
            inner.mounted = true;
            inner.generation += 1;
            inner.status = ListStatus::Loading;
            inner.generation
        };
        info!(scope = ?self.scope, "fetching elections");

        let result = self.fetch().await;

        let mut inner = self.inner.lock().await;
        if inner.generation != ticket {
            debug!(
                ticket,
                generation = inner.generation,
                "discarding superseded election list"
            );
            return Err(ElectionError::Superseded);
        }

        match result {
            Ok(elections) => {
                let previous = mem::take(&mut inner.entries);
                for controller in &previous {
                    controller.teardown().await;
                }
                inner.entries = elections
                    .into_iter()
                    .map(|election| ElectionSyncController::new(election, self.service.clone()))
                    .collect();
                inner.status = ListStatus::Loaded;
                info!(
                    elections = inner.entries.len(),
                    replaced = previous.len(),
                    "election list loaded"
                );
                Ok(inner.entries.clone())
            }
            Err(err) => {
                let err = RemoteCallError::from(err);
                warn!(scope = ?self.scope, error = %err, "election list fetch failed");
                inner.status = ListStatus::Failed(err.clone());
                Err(err.into())
            }
        }
    }

    /// Mounts every listed election concurrently. Elections are independent,
    /// so one failure does not affect the others.
    pub async fn mount_all(&self) -> Vec<(ElectionId, Result<(), ElectionError>)> {
        let entries = self.elections().await;
        let results = join_all(entries.iter().map(|controller| controller.mount())).await;
        entries
            .iter()
            .map(|controller| controller.election().id.clone())
            .zip(results)
            .collect()
    }

    pub async fn elections(&self) -> Vec<Arc<ElectionSyncController>> {
        self.inner.lock().await.entries.clone()
    }

    pub async fn find(&self, election_id: &ElectionId) -> Option<Arc<ElectionSyncController>> {
        self.inner
            .lock()
            .await
            .entries
            .iter()
            .find(|controller| &controller.election().id == election_id)
            .cloned()
    }

    pub async fn status(&self) -> ListStatus {
        self.inner.lock().await.status.clone()
    }

    async fn fetch(&self) -> anyhow::Result<Vec<Election>> {
        match &self.scope {
            ListScope::Recent { limit } => {
                let mut elections = self.service.recent_elections(*limit).await?;
                elections.truncate(*limit);
                Ok(elections)
            }
            ListScope::Account(account) => self.service.account_elections(account).await,
        }
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
