//! Boundary Enforcer Service

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use shared_types::{AnchorId, AnchorProposal, SystemTimeSource, TimeSource};
use tracing::warn;

use crate::domain::{BoundaryCheck, BoundaryResult, BoundaryViolation};
use crate::ports::SealedAnchorReader;

/// Violations kept in memory before the oldest are evicted.
pub const DEFAULT_LEDGER_CAPACITY: usize = 10_000;

/// Recent rejected attempts, oldest first, capped at `capacity`.
///
/// The durable record of every violation is the audit log entry of the round
/// that rejected it; this ledger is a bounded in-memory view.
struct Ledger {
    entries: VecDeque<BoundaryViolation>,
    capacity: usize,
    evicted: u64,
}

impl Ledger {
    fn push(&mut self, violation: BoundaryViolation) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.evicted += 1;
        }
        self.entries.push_back(violation);
    }
}

pub struct BoundaryEnforcer<R: SealedAnchorReader> {
    reader: Arc<R>,
    ledger: RwLock<Ledger>,
    time_source: Arc<dyn TimeSource>,
}

impl<R: SealedAnchorReader> BoundaryEnforcer<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            reader,
            ledger: RwLock::new(Ledger {
                entries: VecDeque::new(),
                capacity: DEFAULT_LEDGER_CAPACITY,
                evicted: 0,
            }),
            time_source: Arc::new(SystemTimeSource),
        }
    }

    /// Cap the in-memory ledger at `capacity` entries (at least one).
    pub fn with_ledger_capacity(self, capacity: usize) -> Self {
        self.ledger.write().capacity = capacity.max(1);
        self
    }

    /// Set custom time source (for testing)
    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Check a proposal against committed state. Read-only.
    pub fn check(&self, proposal: &AnchorProposal) -> BoundaryResult<BoundaryCheck> {
        let by_anchor_id = self.reader.find_by_anchor_id(&proposal.anchor_id)?;
        let by_payload = match by_anchor_id {
            Some(_) => None,
            None => self.reader.find_by_payload_hash(&proposal.payload_hash)?,
        };
        Ok(BoundaryCheck::classify(proposal, by_anchor_id, by_payload))
    }

    /// Append a rejected attempt to the violation ledger.
    ///
    /// Does nothing for a clear check.
    pub fn record_violation(
        &self,
        proposal: &AnchorProposal,
        check: &BoundaryCheck,
    ) -> Option<BoundaryViolation> {
        let BoundaryCheck::Conflict { kind, existing } = check else {
            return None;
        };

        let violation = BoundaryViolation {
            anchor_id: proposal.anchor_id.clone(),
            owner_reference: proposal.owner_reference.clone(),
            kind: *kind,
            existing_anchor_id: existing.anchor_id.clone(),
            detected_at: self.time_source.now_millis(),
        };
        warn!(
            anchor_id = %violation.anchor_id,
            owner = %violation.owner_reference,
            existing = %violation.existing_anchor_id,
            kind = ?violation.kind,
            "boundary violation"
        );
        self.ledger.write().push(violation.clone());
        Some(violation)
    }

    /// Retained violations, oldest first.
    pub fn violations(&self) -> Vec<BoundaryViolation> {
        self.ledger.read().entries.iter().cloned().collect()
    }

    /// How many violations were dropped to stay within capacity.
    pub fn evicted(&self) -> u64 {
        self.ledger.read().evicted
    }

    /// Retained violations recorded against one anchor id.
    pub fn violations_for(&self, anchor_id: &AnchorId) -> Vec<BoundaryViolation> {
        self.ledger
            .read()
            .entries
            .iter()
            .filter(|v| &v.anchor_id == anchor_id)
            .cloned()
            .collect()
    }
}
