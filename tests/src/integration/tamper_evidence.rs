//! # Tamper Evidence
//!
//! Sealed anchors and audit entries are re-verifiable. Editing stored bytes
//! behind the services' backs must be detected on the next read or reopen.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ac_02_temporal_sealer::{compute_seal_hash, verify_chain, SealError};
    use ac_04_anchor_registry::{
        AnchorRegistry, AnchorRegistryApi, FileBackedKVStore, InMemoryKVStore, KeyValueStore,
        RegistryError,
    };
    use ac_05_audit_log::{AuditError, AuditLog, JsonLinesAuditStore};
    use ac_06_consensus::ConsensusApi;
    use shared_types::{AnchorStatus, SealedAnchor};

    use crate::fixtures::{default_params, proposal, scripts, Network, NetworkBuilder, Script};

    async fn seal_three<K, A>(net: &Network<K, A>)
    where
        K: KeyValueStore + 'static,
        A: ac_05_audit_log::AuditStore + 'static,
    {
        for (i, anchor) in ["A", "B", "C"].iter().enumerate() {
            let decision = net
                .consensus
                .propose(proposal(anchor, "alice", i as u8 + 1), default_params())
                .await
                .unwrap();
            assert!(decision.is_accepted());
        }
    }

    /// Drop the services and take the store back out of the registry.
    fn into_store<K: KeyValueStore, A: ac_05_audit_log::AuditStore>(net: Network<K, A>) -> K {
        let Network { consensus, registry, .. } = net;
        drop(consensus);
        match Arc::try_unwrap(registry) {
            Ok(registry) => registry.into_store(),
            Err(_) => panic!("registry still shared"),
        }
    }

    #[tokio::test]
    async fn test_recomputed_seals_match_stored_values() {
        let net = NetworkBuilder::new(scripts(&[(21, Script::Accept)])).build();
        seal_three(&net).await;

        let chain = net.registry.chain().unwrap();
        for sealed in &chain {
            let recomputed = compute_seal_hash(
                &sealed.payload_hash,
                sealed.previous_seal_hash.as_ref(),
                sealed.sealed_at,
            );
            assert_eq!(recomputed, sealed.seal_hash);
        }
        verify_chain(&chain).unwrap();
        assert_eq!(chain[1].previous_seal_hash, Some(chain[0].seal_hash));
        assert_eq!(chain[2].previous_seal_hash, Some(chain[1].seal_hash));
    }

    #[tokio::test]
    async fn test_edited_payload_is_reported_violated() {
        let net = NetworkBuilder::new(scripts(&[(21, Script::Accept)])).build();
        seal_three(&net).await;
        let mut store: InMemoryKVStore = into_store(net);

        let key = b"anchor/B";
        let mut record: SealedAnchor = bincode::deserialize(&store.get(key).unwrap().unwrap()).unwrap();
        record.payload_hash = [0xEE; 32];
        store.put(key, &bincode::serialize(&record).unwrap()).unwrap();

        let registry = AnchorRegistry::open(store).unwrap();
        let read = registry.get(&"B".into()).unwrap().unwrap();
        assert_eq!(read.status, AnchorStatus::Violated);
        assert!(registry.get(&"A".into()).unwrap().unwrap().is_validated());

        match registry.verify_integrity() {
            Err(RegistryError::Integrity(SealError::HashMismatch { position, anchor_id })) => {
                assert_eq!(position, 1);
                assert_eq!(anchor_id.as_str(), "B");
            }
            other => panic!("expected a hash mismatch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_violated_anchor_still_blocks_reregistration() {
        let net = NetworkBuilder::new(scripts(&[(21, Script::Accept)])).build();
        seal_three(&net).await;
        let mut store: InMemoryKVStore = into_store(net);

        let key = b"anchor/A";
        let mut record: SealedAnchor = bincode::deserialize(&store.get(key).unwrap().unwrap()).unwrap();
        record.sealed_at += 1;
        store.put(key, &bincode::serialize(&record).unwrap()).unwrap();

        let net = NetworkBuilder::new(scripts(&[(21, Script::Accept)]))
            .build_with(store, ac_05_audit_log::InMemoryAuditStore::new());
        let decision = net
            .consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        assert!(decision.is_boundary_violation());
    }

    #[tokio::test]
    async fn test_file_registry_survives_reopen_and_verifies() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("registry.bin");

        let net = NetworkBuilder::new(scripts(&[(21, Script::Accept)])).build_with(
            FileBackedKVStore::open(&path).unwrap(),
            ac_05_audit_log::InMemoryAuditStore::new(),
        );
        seal_three(&net).await;
        drop(into_store(net));

        let registry = AnchorRegistry::open(FileBackedKVStore::open(&path).unwrap()).unwrap();
        assert_eq!(registry.len().unwrap(), 3);
        registry.verify_integrity().unwrap();
        assert_eq!(registry.head().unwrap().unwrap().anchor_id.as_str(), "C");
    }

    #[tokio::test]
    async fn test_rewritten_audit_line_fails_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        {
            let net = NetworkBuilder::new(scripts(&[(8, Script::Accept), (13, Script::Reject)]))
                .build_with(
                    InMemoryKVStore::new(),
                    JsonLinesAuditStore::open(&path).unwrap(),
                );
            for anchor in ["A", "B"] {
                net.consensus
                    .propose(proposal(anchor, "alice", 1), default_params())
                    .await
                    .unwrap();
            }
        }

        // Clean reopen first.
        assert_eq!(
            AuditLog::open(JsonLinesAuditStore::open(&path).unwrap())
                .unwrap()
                .len(),
            2
        );

        // Flip the first decision to accepted.
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines: Vec<String> = text.lines().map(str::to_string).collect();
        let mut first: serde_json::Value = serde_json::from_str(&lines[0]).unwrap();
        first["decision"]["outcome"] = serde_json::Value::from("accepted");
        lines[0] = first.to_string();
        std::fs::write(&path, lines.join("\n") + "\n").unwrap();

        let result = AuditLog::open(JsonLinesAuditStore::open(&path).unwrap());
        assert!(matches!(result, Err(AuditError::HashMismatch { sequence: 0 })));
    }
}
