//! Audit Log service.

use crate::domain::{verify_entries, AuditEntry, AuditResult};
use crate::ports::{AuditLogApi, AuditStore};
use parking_lot::Mutex;
use shared_types::{AnchorId, ConsensusDecision, SystemTimeSource, TimeSource, Vote};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info};

/// Buffered entries per subscriber before the slowest one starts lagging.
const SUBSCRIBER_CAPACITY: usize = 256;

struct LogState<S> {
    store: S,
    entries: Vec<AuditEntry>,
}

/// Hash-linked audit log over an `AuditStore`.
pub struct AuditLog<S: AuditStore> {
    state: Mutex<LogState<S>>,
    events: broadcast::Sender<AuditEntry>,
    time_source: Arc<dyn TimeSource>,
}

impl<S: AuditStore> AuditLog<S> {
    /// Load and verify whatever `store` already holds.
    pub fn open(store: S) -> AuditResult<Self> {
        let entries = store.load_all()?;
        verify_entries(&entries)?;
        info!("[ac-05] Audit log opened with {} entries", entries.len());

        let (events, _) = broadcast::channel(SUBSCRIBER_CAPACITY);
        Ok(Self {
            state: Mutex::new(LogState { store, entries }),
            events,
            time_source: Arc::new(SystemTimeSource),
        })
    }

    pub fn with_time_source(mut self, time_source: Arc<dyn TimeSource>) -> Self {
        self.time_source = time_source;
        self
    }

    /// Receive every entry recorded from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AuditEntry> {
        self.events.subscribe()
    }

    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.state.lock().entries.clone()
    }

    /// Full entries (decision and votes) for one anchor.
    pub fn entries_for(&self, anchor_id: &AnchorId) -> Vec<AuditEntry> {
        self.state
            .lock()
            .entries
            .iter()
            .filter(|e| &e.decision.anchor_id == anchor_id)
            .cloned()
            .collect()
    }

    /// Re-verify every hash and link.
    pub fn verify(&self) -> AuditResult<()> {
        verify_entries(&self.state.lock().entries)
    }
}

impl<S: AuditStore> AuditLogApi for AuditLog<S> {
    fn record_round(
        &self,
        decision: ConsensusDecision,
        votes: Vec<Vote>,
    ) -> AuditResult<AuditEntry> {
        let mut state = self.state.lock();
        let entry = AuditEntry::next(
            state.entries.last(),
            decision,
            votes,
            self.time_source.now_millis(),
        )?;

        if let Err(e) = state.store.append(&entry) {
            error!(
                "[ac-05] Failed to record decision for {}: {}",
                entry.decision.anchor_id, e
            );
            return Err(e.into());
        }
        state.entries.push(entry.clone());
        drop(state);

        debug!(
            "[ac-05] Recorded entry {} ({} for {})",
            entry.sequence,
            entry.decision.outcome.as_str(),
            entry.decision.anchor_id
        );
        // No subscribers is not an error.
        let _ = self.events.send(entry.clone());
        Ok(entry)
    }

    fn query(&self, anchor_id: &AnchorId) -> Vec<ConsensusDecision> {
        self.entries_for(anchor_id)
            .into_iter()
            .map(|e| e.decision)
            .collect()
    }
}
