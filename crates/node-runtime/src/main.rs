//! # Anchor-Chain Node Runtime
//!
//! Runs a full node: validator pool, sealer, boundary enforcer, registry,
//! audit log and the consensus coordinator, fed from stdin.
//!
//! ## Streams
//!
//! - stdin: JSON-lines proposals
//! - stdout: JSON-lines decisions (one per proposal)
//! - stderr: logs
//!
//! ## Startup Sequence
//!
//! 1. Load configuration from the environment
//! 2. Initialize telemetry (logging + metrics registry)
//! 3. Build and verify subsystems
//! 4. Start the metrics endpoint and the decision feed
//! 5. Serve proposals until EOF or Ctrl+C
//!
//! Ctrl+C cancels the rounds in flight; each still gets its decision logged
//! and printed before the node exits.

use std::sync::Arc;

use anyhow::{Context, Result};
use node_runtime::container::{NodeConfig, SubsystemContainer};
use node_runtime::handlers::{serve_json_lines, spawn_metrics_server};
use shared_types::SystemTimeSource;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// The node runtime orchestrating all subsystems.
struct NodeRuntime {
    container: SubsystemContainer,
    background: Vec<JoinHandle<()>>,
}

impl NodeRuntime {
    fn new(config: NodeConfig) -> Result<Self> {
        info!("Creating Anchor-Chain node runtime");
        let container = SubsystemContainer::new(config)?;
        Ok(Self {
            container,
            background: Vec::new(),
        })
    }

    /// Start the background tasks.
    fn start(&mut self) {
        let port = self.container.config.telemetry.metrics_port;
        if port != 0 {
            let server = spawn_metrics_server(port);
            self.background.push(tokio::spawn(async move {
                match server.await {
                    Ok(Err(e)) => error!(error = %e, "metrics server stopped"),
                    Err(e) => error!(error = %e, "metrics server task failed"),
                    Ok(Ok(())) => {}
                }
            }));
        }

        let mut feed = self.container.audit.subscribe();
        self.background.push(tokio::spawn(async move {
            loop {
                match feed.recv().await {
                    Ok(entry) => debug!(
                        sequence = entry.sequence,
                        anchor_id = %entry.decision.anchor_id,
                        outcome = entry.decision.outcome.as_str(),
                        "decision recorded"
                    ),
                    Err(RecvError::Lagged(missed)) => warn!(missed, "decision feed lagged"),
                    Err(RecvError::Closed) => break,
                }
            }
        }));
    }

    /// Serve stdin until EOF or until `shutdown` turns `true`.
    async fn serve_stdin(&self, shutdown: watch::Receiver<bool>) -> Result<()> {
        let config = &self.container.config;
        let summary = serve_json_lines(
            Arc::clone(&self.container.consensus),
            config.consensus.round_params(),
            Arc::new(SystemTimeSource),
            config.surface.max_in_flight,
            tokio::io::BufReader::new(tokio::io::stdin()),
            tokio::io::stdout(),
            shutdown,
        )
        .await
        .context("proposal stream failed")?;

        info!(
            decisions = summary.decisions,
            errors = summary.errors,
            "input exhausted"
        );
        Ok(())
    }

    fn shutdown(self) {
        info!("Shutting down node");
        for task in self.background {
            task.abort();
        }
        info!(
            anchors = self.container.registry.len().unwrap_or(0),
            decisions = self.container.audit.len(),
            "Node stopped"
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = NodeConfig::from_env().context("invalid configuration")?;
    let _telemetry =
        anchor_telemetry::init_telemetry(config.telemetry.clone()).context("telemetry")?;

    info!("===========================================");
    info!("  Anchor-Chain Node Runtime v{}", env!("CARGO_PKG_VERSION"));
    info!("===========================================");

    let mut runtime = NodeRuntime::new(config)?;
    runtime.start();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let result = {
        let serving = runtime.serve_stdin(shutdown_rx);
        tokio::pin!(serving);

        tokio::select! {
            result = &mut serving => result,
            signal = tokio::signal::ctrl_c() => match signal {
                Ok(()) => {
                    info!("Shutdown signal received, draining rounds in flight");
                    let _ = shutdown_tx.send(true);
                    serving.await
                }
                Err(e) => Err(e).context("listening for Ctrl+C"),
            },
        }
    };

    runtime.shutdown();
    result
}
