use crate::domain::{AuditEntry, AuditResult};
use shared_types::{AnchorId, ConsensusDecision, Vote};

/// Primary API for the Audit Log subsystem.
pub trait AuditLogApi: Send + Sync {
    /// Append a decision and the votes behind it.
    fn record_round(
        &self,
        decision: ConsensusDecision,
        votes: Vec<Vote>,
    ) -> AuditResult<AuditEntry>;

    /// Append a decision that collected no votes.
    fn record(&self, decision: ConsensusDecision) -> AuditResult<AuditEntry> {
        self.record_round(decision, Vec::new())
    }

    /// Every decision for `anchor_id`, in recording order.
    fn query(&self, anchor_id: &AnchorId) -> Vec<ConsensusDecision>;
}
