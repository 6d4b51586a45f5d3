//! # Consensus Flows
//!
//! Whole rounds through pool, boundary enforcer, sealer, registry and audit
//! log, checking the decision arithmetic and the log-then-respond contract.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use ac_04_anchor_registry::AnchorRegistryApi;
    use ac_05_audit_log::AuditLogApi;
    use ac_06_consensus::{ConsensusApi, ConsensusConfig, ConsensusMode, RepeatedFailureDetector};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use shared_types::{
        Assessment, ConflictKind, DecisionOutcome, DecisionReason, Vote,
    };

    use crate::fixtures::{
        default_params, network, proposal, scripts, NetworkBuilder, Script,
    };

    // =========================================================================
    // WORKED EXAMPLES
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_fifteen_of_eighteen_responding_is_accepted() {
        let net = network(scripts(&[
            (15, Script::Accept),
            (3, Script::Reject),
            (3, Script::Silent),
        ]));

        let decision = net
            .consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        assert_eq!(decision.outcome, DecisionOutcome::Accepted);
        assert_eq!(decision.responded_count, 18);
        assert!((decision.ratio_achieved - 0.8333).abs() < 1e-3);
        assert!(net.registry.get(&"A".into()).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_eight_of_fifteen_responding_is_rejected() {
        let net = network(scripts(&[
            (8, Script::Accept),
            (7, Script::Reject),
            (6, Script::Abstain),
        ]));

        let decision = net
            .consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        assert_eq!(decision.outcome, DecisionOutcome::Rejected);
        assert_eq!(decision.reason, Some(DecisionReason::BelowThreshold));
        assert_eq!(decision.responded_count, 15);
        assert!((decision.ratio_achieved - 0.5333).abs() < 1e-3);
        assert!(net.registry.get(&"A".into()).unwrap().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_five_responses_is_insufficient_quorum_even_if_unanimous() {
        let net = network(scripts(&[(5, Script::Accept), (16, Script::Silent)]));

        let decision = net
            .consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        assert_eq!(decision.outcome, DecisionOutcome::InsufficientQuorum);
        assert_eq!(decision.reason, Some(DecisionReason::TooFewResponses));
        assert_eq!(decision.responded_count, 5);
        assert!(net.registry.is_empty().unwrap());
    }

    // =========================================================================
    // ROUND LIFECYCLE
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_round_never_outlives_its_deadline() {
        let net = network(scripts(&[(12, Script::Accept), (9, Script::Silent)]));
        let started = tokio::time::Instant::now();

        net.consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        assert!(started.elapsed() <= Duration::from_millis(5_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_insufficient_quorum_resubmission_can_succeed() {
        let net = network(scripts(&[
            (12, Script::Slow(Duration::from_millis(800))),
            (9, Script::Reject),
        ]));
        let short = ac_06_consensus::RoundParams::new(0.5, 11, 500);

        let first = net
            .consensus
            .propose(proposal("A", "alice", 1), short)
            .await
            .unwrap();
        assert_eq!(first.outcome, DecisionOutcome::InsufficientQuorum);
        assert_eq!(first.responded_count, 9);

        let second = net
            .consensus
            .propose(proposal("A", "alice", 1), ac_06_consensus::RoundParams::new(0.5, 11, 5_000))
            .await
            .unwrap();
        assert_eq!(second.outcome, DecisionOutcome::Accepted);

        let history = net.audit.query(&"A".into());
        assert_eq!(history, vec![first, second]);
    }

    #[tokio::test]
    async fn test_validated_anchor_never_gets_a_second_round() {
        let net = network(scripts(&[(21, Script::Accept)]));
        net.consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        for attempt in 0..3u8 {
            let decision = net
                .consensus
                .propose(proposal("A", "mallory", 100 + attempt), default_params())
                .await
                .unwrap();
            assert_eq!(
                decision.reason,
                Some(DecisionReason::BoundaryViolation {
                    kind: ConflictKind::AnchorAlreadySealed
                })
            );
            assert_eq!(decision.responded_count, 0);
        }

        assert_eq!(net.consensus.boundary().violations().len(), 3);
        assert_eq!(net.registry.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_every_outcome_is_logged_before_return() {
        let net = network(scripts(&[(21, Script::Accept)]));
        let mut feed = net.audit.subscribe();

        let accepted = net
            .consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();
        // The entry is already there when propose returns.
        let entry = feed.try_recv().unwrap();
        assert_eq!(entry.decision, accepted);

        let violation = net
            .consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();
        assert_eq!(feed.try_recv().unwrap().decision, violation);

        net.audit.verify().unwrap();
    }

    #[tokio::test]
    async fn test_audit_keeps_vote_confidences() {
        let net = network(scripts(&[(14, Script::Accept), (7, Script::Reject)]));

        net.consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        let entry = &net.audit.entries_for(&"A".into())[0];
        assert_eq!(entry.votes.len(), 21);
        assert!(entry.votes.iter().all(|v: &Vote| v.confidence == 0.8));
        assert_eq!(
            entry
                .votes
                .iter()
                .filter(|v| v.assessment == Assessment::Reject)
                .count(),
            7
        );
    }

    // =========================================================================
    // MODES, GROUPS AND MISBEHAVIOR
    // =========================================================================

    #[tokio::test]
    async fn test_weighted_mode_follows_trust() {
        // Seven heavy validators reject, fourteen light ones accept.
        let mut weights = vec![1.0; 14];
        weights.extend(vec![4.0; 7]);
        let net = NetworkBuilder::new(scripts(&[(14, Script::Accept), (7, Script::Reject)]))
            .weights(weights)
            .config(ConsensusConfig {
                mode: ConsensusMode::Weighted,
                ..ConsensusConfig::default()
            })
            .build();

        let decision = net
            .consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        assert_eq!(decision.outcome, DecisionOutcome::Rejected);
        assert!((decision.ratio_achieved - 14.0 / 42.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_single_group_cannot_carry_a_round() {
        let net = NetworkBuilder::new(scripts(&[(21, Script::Accept)]))
            .groups(1)
            .config(ConsensusConfig {
                min_distinct_groups: 3,
                ..ConsensusConfig::default()
            })
            .build();

        let decision = net
            .consensus
            .propose(proposal("A", "alice", 1), default_params())
            .await
            .unwrap();

        assert_eq!(decision.outcome, DecisionOutcome::InsufficientQuorum);
        assert_eq!(
            decision.reason,
            Some(DecisionReason::TooFewIndependenceGroups)
        );
    }

    #[tokio::test]
    async fn test_forging_validators_are_suspended_after_repeat_offences() {
        let net = NetworkBuilder::new(scripts(&[(19, Script::Accept), (2, Script::BadKey)]))
            .detector(Arc::new(RepeatedFailureDetector::new(2)))
            .build();

        for (i, anchor) in ["A", "B"].iter().enumerate() {
            let decision = net
                .consensus
                .propose(proposal(anchor, "alice", i as u8 + 1), default_params())
                .await
                .unwrap();
            assert_eq!(decision.responded_count, 19);
            assert_eq!(decision.total_validators, 21);
        }
        assert_eq!(net.pool.suspensions().len(), 2);

        let third = net
            .consensus
            .propose(proposal("C", "alice", 3), default_params())
            .await
            .unwrap();
        assert_eq!(third.total_validators, 19);
        assert!(third.is_accepted());
    }

    // =========================================================================
    // PROPERTIES
    // =========================================================================

    #[tokio::test(start_paused = true)]
    async fn test_accepted_rounds_always_meet_threshold_and_quorum() {
        let mut rng = StdRng::seed_from_u64(0xA11C);

        for round in 0..40u32 {
            let pool_scripts: Vec<Script> = (0..21)
                .map(|_| match rng.gen_range(0..4) {
                    0 => Script::Accept,
                    1 => Script::Reject,
                    2 => Script::Abstain,
                    _ => Script::Silent,
                })
                .collect();
            let threshold = rng.gen_range(0.5..=1.0);
            let min_responses = rng.gen_range(1..=21);
            let params = ac_06_consensus::RoundParams::new(threshold, min_responses, 5_000);
            let net = network(pool_scripts);

            let decision = net
                .consensus
                .propose(proposal(&format!("anchor-{round}"), "alice", 1), params)
                .await
                .unwrap();

            if decision.outcome == DecisionOutcome::Accepted {
                assert!(decision.ratio_achieved >= decision.threshold_used);
                assert!(decision.responded_count >= min_responses);
            } else {
                assert!(net.registry.is_empty().unwrap());
            }
            assert_eq!(net.audit.len(), 1);
        }
    }
}
