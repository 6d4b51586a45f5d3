//! Handle to a round running in the background.

use shared_types::ConsensusDecision;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::{ConsensusError, ConsensusResult};

/// A spawned consensus round that can be cancelled.
///
/// Cancelling stops vote collection; the round still produces, logs and
/// returns a decision.
pub struct RoundHandle {
    cancel: watch::Sender<bool>,
    task: JoinHandle<ConsensusResult<ConsensusDecision>>,
}

impl RoundHandle {
    pub(crate) fn new(
        cancel: watch::Sender<bool>,
        task: JoinHandle<ConsensusResult<ConsensusDecision>>,
    ) -> Self {
        Self { cancel, task }
    }

    /// Ask the round to stop collecting votes. Idempotent.
    pub fn cancel(&self) {
        self.cancel.send_replace(true);
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the round's decision.
    pub async fn decision(self) -> ConsensusResult<ConsensusDecision> {
        self.task
            .await
            .map_err(|e| ConsensusError::RoundAborted(e.to_string()))?
    }
}
