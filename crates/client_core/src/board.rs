//! The election page: a create form above the list of recent elections.

use std::sync::Arc;

use shared::domain::ElectionId;
use tracing::{debug, warn};

use crate::{
    create::{ElectionCreateController, ElectionDraft},
    error::ElectionError,
    list::{ElectionListController, ListScope},
    service::RemoteElectionService,
    sync::{ElectionSnapshot, ElectionSyncController},
};

pub struct ElectionBoard {
    list: Arc<ElectionListController>,
    creator: ElectionCreateController,
}

impl ElectionBoard {
    pub fn new(service: Arc<dyn RemoteElectionService>, scope: ListScope) -> Self {
        Self {
            list: ElectionListController::new(service.clone(), scope),
            creator: ElectionCreateController::new(service),
        }
    }

    pub fn list(&self) -> &Arc<ElectionListController> {
        &self.list
    }

    /// Loads the list once, then every listed election's candidates.
    pub async fn open(&self) -> Result<Vec<Arc<ElectionSyncController>>, ElectionError> {
        let entries = self.list.mount().await?;
        self.mount_entries().await;
        Ok(entries)
    }

    pub async fn refresh(&self) -> Result<Vec<Arc<ElectionSyncController>>, ElectionError> {
        let entries = self.list.refresh().await?;
        self.mount_entries().await;
        Ok(entries)
    }

    /// Submits the draft. On success the draft is cleared and the list is
    /// re-fetched; on failure the draft is left as typed.
    pub async fn create(&self, draft: &mut ElectionDraft) -> Result<ElectionId, ElectionError> {
        let election_id = self.creator.submit(draft).await?;
        draft.clear();
        if let Err(err) = self.refresh().await {
            warn!(election_id = %election_id, error = %err, "list refresh after create failed");
        }
        Ok(election_id)
    }

    pub async fn snapshots(&self) -> Vec<ElectionSnapshot> {
        let mut snapshots = Vec::new();
        for controller in self.list.elections().await {
            snapshots.push(controller.snapshot().await);
        }
        snapshots
    }

    async fn mount_entries(&self) {
        for (election_id, result) in self.list.mount_all().await {
            if let Err(err) = result {
                debug!(election_id = %election_id, error = %err, "election did not load");
            }
        }
    }
}

#[cfg(test)]
#[path = "tests/board_tests.rs"]
mod tests;
