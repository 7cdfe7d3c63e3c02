use thiserror::Error;

use crate::sync::SyncPhase;

/// Input rejected locally, before any remote call is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("election name must not be empty")]
    EmptyName,
    #[error("election needs at least one candidate")]
    NoCandidates,
    #[error("no candidate selected")]
    EmptySelection,
}

/// Any failure reported by the election service. Transport and policy
/// failures are deliberately not told apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct RemoteCallError {
    message: String,
}

impl RemoteCallError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<anyhow::Error> for RemoteCallError {
    fn from(value: anyhow::Error) -> Self {
        Self::new(format!("{value:#}"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElectionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("election service call failed: {0}")]
    Remote(#[from] RemoteCallError),
    #[error("another election service call is in flight (phase {0:?})")]
    Busy(SyncPhase),
    #[error("candidates are not loaded (phase {0:?})")]
    NotReady(SyncPhase),
    #[error("election view was torn down")]
    Defunct,
    #[error("result superseded by a newer refresh")]
    Superseded,
    #[error("election view is already mounted")]
    AlreadyMounted,
}

impl ElectionError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote(_))
    }

    /// Rejections that left every piece of state untouched.
    pub fn is_noop(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::Busy(_) | Self::NotReady(_) | Self::AlreadyMounted
        )
    }
}
