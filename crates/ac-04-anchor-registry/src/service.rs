//! Anchor Registry service.

use crate::domain::keys::{anchor_key, chain_key, payload_key, CHAIN_PREFIX, HEAD_KEY};
use crate::domain::{ChainHead, RegistryError, RegistryResult};
use crate::ports::{AnchorRegistryApi, BatchOperation, KeyValueStore};
use ac_02_temporal_sealer::{verify_chain, verify_seal};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::Serialize;
use shared_crypto::to_hex;
use shared_types::{AnchorId, AnchorStatus, Hash, SealedAnchor, StorageError};
use tracing::{debug, info, warn};

/// Registry of sealed anchors over a key-value store.
///
/// All commit checks and the batch write happen under one write lock.
pub struct AnchorRegistry<S: KeyValueStore> {
    store: RwLock<S>,
}

impl<S: KeyValueStore> AnchorRegistry<S> {
    /// Open a registry over `store`, which may already hold a chain.
    pub fn open(store: S) -> RegistryResult<Self> {
        let registry = Self {
            store: RwLock::new(store),
        };
        match registry.head()? {
            Some(head) => info!(
                "[ac-04] Registry opened at sequence {} (head {})",
                head.sequence, head.anchor_id
            ),
            None => info!("[ac-04] Registry opened empty"),
        }
        Ok(registry)
    }

    /// Give back the underlying store.
    pub fn into_store(self) -> S {
        self.store.into_inner()
    }

    /// Number of committed anchors.
    pub fn len(&self) -> RegistryResult<u64> {
        Ok(self.head()?.map(|h| h.chain_len()).unwrap_or(0))
    }

    pub fn is_empty(&self) -> RegistryResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Every committed record in chain order, exactly as stored.
    pub fn chain(&self) -> RegistryResult<Vec<SealedAnchor>> {
        let store = self.store.read();
        let mut chain = Vec::new();
        for (key, value) in store.prefix_scan(CHAIN_PREFIX)? {
            let anchor_id = AnchorId::new(String::from_utf8(value).map_err(|e| {
                StorageError::DataCorruption {
                    key: to_hex(&key),
                    reason: e.to_string(),
                }
            })?);
            let sealed = load_raw(&*store, &anchor_id)?
                .ok_or_else(|| RegistryError::NotFound(anchor_id.clone()))?;
            chain.push(sealed);
        }
        Ok(chain)
    }

    /// Re-verify every seal hash, link and timestamp from genesis to head.
    pub fn verify_integrity(&self) -> RegistryResult<()> {
        let chain = self.chain()?;
        verify_chain(&chain).map_err(|e| {
            warn!("[ac-04] Chain integrity failure: {}", e);
            RegistryError::from(e)
        })?;
        debug!("[ac-04] Chain of {} anchors verified", chain.len());
        Ok(())
    }

    fn check_commit(&self, store: &S, anchor: &SealedAnchor) -> RegistryResult<Option<ChainHead>> {
        if store.exists(&anchor_key(&anchor.anchor_id))? {
            return Err(RegistryError::DuplicateAnchor(anchor.anchor_id.clone()));
        }

        if let Some(existing) = load_by_payload(store, &anchor.payload_hash)? {
            if existing.owner_reference != anchor.owner_reference {
                return Err(RegistryError::PayloadCollision {
                    anchor_id: anchor.anchor_id.clone(),
                    existing: existing.anchor_id,
                });
            }
        }

        let head: Option<ChainHead> = decode_opt(store, HEAD_KEY)?;
        if anchor.previous_seal_hash != head.as_ref().map(|h| h.seal_hash) {
            return Err(RegistryError::ChainLinkMismatch(anchor.anchor_id.clone()));
        }

        if anchor.status != AnchorStatus::Validated || !verify_seal(anchor) {
            return Err(RegistryError::InvalidSeal(anchor.anchor_id.clone()));
        }

        if let Some(head) = &head {
            if anchor.sealed_at <= head.sealed_at {
                return Err(RegistryError::TimestampRegression(anchor.anchor_id.clone()));
            }
        }

        Ok(head)
    }
}

impl<S: KeyValueStore> AnchorRegistryApi for AnchorRegistry<S> {
    fn commit(&self, anchor: SealedAnchor) -> RegistryResult<ChainHead> {
        let mut store = self.store.write();
        let previous = self.check_commit(&*store, &anchor)?;

        let next = ChainHead {
            sequence: previous.map(|h| h.sequence + 1).unwrap_or(0),
            anchor_id: anchor.anchor_id.clone(),
            seal_hash: anchor.seal_hash,
            sealed_at: anchor.sealed_at,
        };

        let payload = payload_key(&anchor.payload_hash);
        let mut batch = vec![
            BatchOperation::put(anchor_key(&anchor.anchor_id), encode(&anchor)?),
            BatchOperation::put(
                chain_key(next.sequence),
                anchor.anchor_id.as_str().as_bytes().to_vec(),
            ),
            BatchOperation::put(HEAD_KEY.to_vec(), encode(&next)?),
        ];
        if !store.exists(&payload)? {
            batch.push(BatchOperation::put(
                payload,
                anchor.anchor_id.as_str().as_bytes().to_vec(),
            ));
        }

        store.atomic_batch_write(batch)?;

        info!(
            "[ac-04] Committed {} at sequence {} (seal {})",
            next.anchor_id,
            next.sequence,
            to_hex(&next.seal_hash)
        );
        Ok(next)
    }

    fn get(&self, anchor_id: &AnchorId) -> RegistryResult<Option<SealedAnchor>> {
        let store = self.store.read();
        Ok(load_raw(&*store, anchor_id)?.map(with_checked_status))
    }

    fn find_by_payload_hash(&self, payload_hash: &Hash) -> RegistryResult<Option<SealedAnchor>> {
        let store = self.store.read();
        Ok(load_by_payload(&*store, payload_hash)?.map(with_checked_status))
    }

    fn latest_seal_hash(&self) -> RegistryResult<Option<Hash>> {
        Ok(self.head()?.map(|h| h.seal_hash))
    }

    fn head(&self) -> RegistryResult<Option<ChainHead>> {
        let store = self.store.read();
        decode_opt(&*store, HEAD_KEY)
    }
}

/// Mark a record whose seal no longer re-verifies.
fn with_checked_status(mut sealed: SealedAnchor) -> SealedAnchor {
    if !verify_seal(&sealed) {
        warn!(
            "[ac-04] Seal for {} failed re-verification; reporting as violated",
            sealed.anchor_id
        );
        sealed.status = AnchorStatus::Violated;
    }
    sealed
}

fn load_raw<S: KeyValueStore>(
    store: &S,
    anchor_id: &AnchorId,
) -> RegistryResult<Option<SealedAnchor>> {
    decode_opt(store, &anchor_key(anchor_id))
}

fn load_by_payload<S: KeyValueStore>(
    store: &S,
    payload_hash: &Hash,
) -> RegistryResult<Option<SealedAnchor>> {
    let key = payload_key(payload_hash);
    let Some(raw_id) = store.get(&key)? else {
        return Ok(None);
    };
    let anchor_id = String::from_utf8(raw_id).map_err(|e| StorageError::DataCorruption {
        key: to_hex(&key),
        reason: e.to_string(),
    })?;
    load_raw(store, &AnchorId::new(anchor_id))
}

fn encode<T: Serialize>(value: &T) -> RegistryResult<Vec<u8>> {
    bincode::serialize(value).map_err(|e| StorageError::Serialization(e.to_string()).into())
}

fn decode_opt<S: KeyValueStore, T: DeserializeOwned>(
    store: &S,
    key: &[u8],
) -> RegistryResult<Option<T>> {
    match store.get(key)? {
        Some(bytes) => bincode::deserialize(&bytes).map(Some).map_err(|e| {
            StorageError::DataCorruption {
                key: String::from_utf8_lossy(key).into_owned(),
                reason: e.to_string(),
            }
            .into()
        }),
        None => Ok(None),
    }
}
