//! # Concurrency
//!
//! Races between rounds on a multi-threaded runtime: one commit per anchor,
//! a single linear chain across anchors, and cancellation mid-round.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::time::Duration;

    use ac_02_temporal_sealer::verify_chain;
    use ac_04_anchor_registry::AnchorRegistryApi;
    use ac_06_consensus::ConsensusApi;
    use shared_types::{DecisionOutcome, DecisionReason};
    use tokio::task::JoinSet;

    use crate::fixtures::{default_params, network, proposal, scripts, Script};

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_rounds_commit_exactly_once() {
        let net = network(scripts(&[(21, Script::Slow(Duration::from_millis(20)))]));

        let mut rounds = JoinSet::new();
        for _ in 0..8 {
            let consensus = Arc::clone(&net.consensus);
            rounds.spawn(async move {
                consensus
                    .propose(proposal("A", "alice", 1), default_params())
                    .await
            });
        }

        let mut accepted = 0;
        let mut others = Vec::new();
        while let Some(joined) = rounds.join_next().await {
            let decision = joined.unwrap().unwrap();
            if decision.outcome == DecisionOutcome::Accepted {
                accepted += 1;
            } else {
                others.push(decision);
            }
        }

        assert_eq!(accepted, 1);
        assert_eq!(others.len(), 7);
        // Losers either lost the commit race or arrived after the seal.
        for decision in &others {
            assert_eq!(decision.outcome, DecisionOutcome::Rejected);
            assert!(
                decision.reason == Some(DecisionReason::DuplicateAnchor)
                    || decision.is_boundary_violation(),
                "unexpected reason {:?}",
                decision.reason
            );
        }
        assert_eq!(net.registry.len().unwrap(), 1);
        assert_eq!(net.audit.entries_for(&"A".into()).len(), 8);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_parallel_anchors_form_one_linear_chain() {
        let net = network(scripts(&[(21, Script::Slow(Duration::from_millis(5)))]));

        let mut rounds = JoinSet::new();
        for i in 0..24u8 {
            let consensus = Arc::clone(&net.consensus);
            rounds.spawn(async move {
                consensus
                    .propose(
                        proposal(&format!("anchor-{i}"), "alice", i + 1),
                        default_params(),
                    )
                    .await
            });
        }
        while let Some(joined) = rounds.join_next().await {
            assert!(joined.unwrap().unwrap().is_accepted());
        }

        let chain = net.registry.chain().unwrap();
        assert_eq!(chain.len(), 24);
        verify_chain(&chain).unwrap();

        let ids: HashSet<_> = chain.iter().map(|s| s.anchor_id.clone()).collect();
        assert_eq!(ids.len(), 24);
        assert_eq!(
            net.registry.latest_seal_hash().unwrap(),
            chain.last().map(|s| s.seal_hash)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_same_payload_from_two_owners_seals_once() {
        let net = network(scripts(&[(21, Script::Slow(Duration::from_millis(20)))]));

        let (a, b) = tokio::join!(
            net.consensus.propose(proposal("A", "alice", 7), default_params()),
            net.consensus.propose(proposal("B", "bob", 7), default_params()),
        );
        let (a, b) = (a.unwrap(), b.unwrap());

        assert_eq!(
            [a.is_accepted(), b.is_accepted()]
                .iter()
                .filter(|x| **x)
                .count(),
            1
        );
        let loser = if a.is_accepted() { &b } else { &a };
        assert!(
            loser.reason == Some(DecisionReason::PayloadCollision) || loser.is_boundary_violation()
        );
        assert_eq!(net.registry.len().unwrap(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_votes_already_in() {
        let net = network(scripts(&[
            (6, Script::Accept),
            (15, Script::Slow(Duration::from_secs(3))),
        ]));

        let handle = net
            .consensus
            .spawn_round(proposal("A", "alice", 1), default_params());
        tokio::time::sleep(Duration::from_millis(50)).await;
        handle.cancel();
        let decision = handle.decision().await.unwrap();

        assert_eq!(decision.outcome, DecisionOutcome::InsufficientQuorum);
        assert_eq!(decision.reason, Some(DecisionReason::Cancelled));
        assert_eq!(decision.responded_count, 6);

        let entry = &net.audit.entries_for(&"A".into())[0];
        assert_eq!(entry.decision, decision);
        assert_eq!(entry.votes.iter().filter(|v| v.is_responsive()).count(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_finish_is_harmless() {
        let net = network(scripts(&[(21, Script::Accept)]));

        let handle = net
            .consensus
            .spawn_round(proposal("A", "alice", 1), default_params());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(handle.is_finished());
        handle.cancel();

        assert!(handle.decision().await.unwrap().is_accepted());
    }
}
