//! # Node Surface
//!
//! The full node as the binary wires it: environment-style configuration,
//! simulated validators, and the JSON-lines proposal stream.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use ac_05_audit_log::AuditLogApi;
    use node_runtime::container::{NodeConfig, SubsystemContainer};
    use node_runtime::handlers::{serve_json_lines, ProposalResponse};
    use shared_types::{DecisionOutcome, DecisionReason, ManualTimeSource};
    use tokio::io::AsyncWriteExt;
    use tokio::sync::watch;

    const PAYLOAD_A: &str = "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1";
    const PAYLOAD_ZERO: &str = "0000000000000000000000000000000000000000000000000000000000000000";

    fn config(vars: &[(&str, &str)], dir: &std::path::Path) -> NodeConfig {
        let mut env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        env.insert(
            "AC_REGISTRY_PATH".into(),
            dir.join("registry.bin").display().to_string(),
        );
        env.insert(
            "AC_AUDIT_PATH".into(),
            dir.join("audit.jsonl").display().to_string(),
        );
        NodeConfig::from_lookup(|var| env.get(var).cloned()).unwrap()
    }

    fn parse(output: Vec<u8>) -> Vec<ProposalResponse> {
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    async fn run(container: &SubsystemContainer, input: &str) -> Vec<ProposalResponse> {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        let mut output = Vec::new();
        serve_json_lines(
            Arc::clone(&container.consensus),
            container.config.consensus.round_params(),
            Arc::new(ManualTimeSource::new(1_000)),
            1,
            input.as_bytes(),
            &mut output,
            shutdown_rx,
        )
        .await
        .unwrap();

        parse(output)
    }

    fn outcome(response: &ProposalResponse) -> DecisionOutcome {
        match response {
            ProposalResponse::Decision(d) => d.outcome,
            ProposalResponse::Error { error, .. } => panic!("unexpected error line: {error}"),
        }
    }

    #[tokio::test]
    async fn test_stream_of_proposals_through_full_node() {
        let dir = tempfile::tempdir().unwrap();
        let container = SubsystemContainer::new(config(&[], dir.path())).unwrap();

        let input = format!(
            "{{\"anchor_id\":\"alice-id\",\"owner_reference\":\"alice\",\"payload_hash\":\"{PAYLOAD_A}\"}}\n\
             {{\"anchor_id\":\"alice-id\",\"owner_reference\":\"alice\",\"payload_hash\":\"{PAYLOAD_A}\"}}\n\
             {{\"anchor_id\":\"zero-id\",\"owner_reference\":\"bob\",\"payload_hash\":\"{PAYLOAD_ZERO}\"}}\n"
        );
        // One round in flight at a time keeps the order deterministic.
        let responses = run(&container, &input).await;

        assert_eq!(responses.len(), 3);
        assert_eq!(outcome(&responses[0]), DecisionOutcome::Accepted);
        assert_eq!(outcome(&responses[1]), DecisionOutcome::Rejected);
        assert_eq!(outcome(&responses[2]), DecisionOutcome::Rejected);
        match &responses[1] {
            ProposalResponse::Decision(d) => assert!(d.is_boundary_violation()),
            other => panic!("unexpected {other:?}"),
        }

        assert_eq!(container.audit.query(&"alice-id".into()).len(), 2);
        assert_eq!(container.registry.len().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_restarted_node_remembers_sealed_anchors() {
        let dir = tempfile::tempdir().unwrap();
        let line = format!(
            "{{\"owner_reference\":\"carol\",\"payload_hash\":\"{PAYLOAD_A}\"}}\n"
        );

        {
            let container = SubsystemContainer::new(config(&[], dir.path())).unwrap();
            let responses = run(&container, &line).await;
            assert_eq!(outcome(&responses[0]), DecisionOutcome::Accepted);
        }

        let container = SubsystemContainer::new(config(&[], dir.path())).unwrap();
        let responses = run(&container, &line).await;
        match &responses[0] {
            ProposalResponse::Decision(d) => assert!(d.is_boundary_violation()),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(container.audit.len(), 2);
        container.audit.verify().unwrap();
    }

    #[tokio::test]
    async fn test_environment_shapes_the_round() {
        let dir = tempfile::tempdir().unwrap();
        let container = SubsystemContainer::new(config(
            &[("AC_VALIDATORS", "5"), ("AC_MIN_RESPONSES", "3")],
            dir.path(),
        ))
        .unwrap();

        let line = format!(
            "{{\"anchor_id\":\"x\",\"owner_reference\":\"dave\",\"payload_hash\":\"{PAYLOAD_A}\",\"min_responses\":6}}\n"
        );
        let responses = run(&container, &line).await;

        // Five validators can never satisfy a per-round minimum of six.
        match &responses[0] {
            ProposalResponse::Decision(d) => {
                assert_eq!(d.outcome, DecisionOutcome::InsufficientQuorum);
                assert_eq!(d.total_validators, 5);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_shutdown_still_records_rounds_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        let container = SubsystemContainer::new(config(
            &[
                ("AC_VALIDATOR_LATENCY_MS", "60000"),
                ("AC_DEADLINE_MS", "120000"),
                ("AC_PER_CALL_TIMEOUT_MS", "120000"),
            ],
            dir.path(),
        ))
        .unwrap();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let (mut client, server) = tokio::io::duplex(4096);

        let consensus = Arc::clone(&container.consensus);
        let defaults = container.config.consensus.round_params();
        let serving = tokio::spawn(async move {
            let mut output = Vec::new();
            let summary = serve_json_lines(
                consensus,
                defaults,
                Arc::new(ManualTimeSource::new(1_000)),
                4,
                tokio::io::BufReader::new(server),
                &mut output,
                shutdown_rx,
            )
            .await
            .unwrap();
            (summary, output)
        });

        let line = format!(
            "{{\"anchor_id\":\"slow-id\",\"owner_reference\":\"erin\",\"payload_hash\":\"{PAYLOAD_A}\"}}\n"
        );
        client.write_all(line.as_bytes()).await.unwrap();
        // Validators answer after a minute; stop well before that.
        tokio::time::sleep(std::time::Duration::from_millis(200)).await;
        shutdown_tx.send(true).unwrap();

        let (summary, output) = serving.await.unwrap();
        let responses = parse(output);

        assert_eq!(summary.decisions, 1);
        match &responses[..] {
            [ProposalResponse::Decision(d)] => {
                assert_eq!(d.outcome, DecisionOutcome::InsufficientQuorum);
                assert_eq!(d.reason, Some(DecisionReason::Cancelled));
                assert_eq!(d.responded_count, 0);
            }
            other => panic!("unexpected {other:?}"),
        }
        let logged = container.audit.query(&"slow-id".into());
        assert_eq!(logged.len(), 1);
        assert_eq!(logged[0].reason, Some(DecisionReason::Cancelled));
        assert_eq!(container.registry.len().unwrap(), 0);
        drop(client);
    }
}
