//! Driving ports (Inbound API)

use async_trait::async_trait;
use shared_types::{AnchorProposal, ConsensusDecision};
use tokio::sync::watch;

use crate::domain::{ConsensusResult, RoundParams};

/// Consensus API
///
/// Primary interface for submitting proposals.
#[async_trait]
pub trait ConsensusApi: Send + Sync {
    /// Run one consensus round to completion.
    ///
    /// Returns only after the decision is in the audit log. `Err` means the
    /// parameters were invalid or infrastructure failed; every round-level
    /// outcome is a `ConsensusDecision`.
    async fn propose(
        &self,
        proposal: AnchorProposal,
        params: RoundParams,
    ) -> ConsensusResult<ConsensusDecision>;

    /// Like [`ConsensusApi::propose`], but stops collecting votes once `cancel`
    /// turns `true`. The round is then decided on the votes already in.
    async fn propose_cancellable(
        &self,
        proposal: AnchorProposal,
        params: RoundParams,
        cancel: watch::Receiver<bool>,
    ) -> ConsensusResult<ConsensusDecision>;
}
