//! # JSON-Lines Proposal Surface
//!
//! One proposal per input line, one response per output line:
//!
//! ```text
//! in:  {"owner_reference":"did:example:alice","payload_hash":"<64 hex>"}
//! out: {"round_id":"...","anchor_id":"...","outcome":"accepted",...}
//! out: {"line":3,"error":"..."}
//! ```
//!
//! `anchor_id` is derived from owner and payload when absent. Per-round
//! `threshold`, `min_responses` and `deadline_ms` override the node defaults.
//! Rounds run concurrently up to a bound, so responses come back in
//! completion order; callers match them by `anchor_id`.
//!
//! On shutdown the surface stops reading, cancels every round in flight and
//! still writes each one's decision before returning.

use std::io;
use std::sync::Arc;

use ac_06_consensus::{ConsensusApi, ConsensusError, RoundParams};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as};
use shared_types::{
    AnchorId, AnchorProposal, ConsensusDecision, Hash, OwnerReference, Timestamp, TimeSource,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, info, warn};

/// One proposal as read from the input stream.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposalRequest {
    #[serde(default)]
    pub anchor_id: Option<AnchorId>,
    pub owner_reference: OwnerReference,
    #[serde_as(as = "Hex")]
    pub payload_hash: Hash,
    #[serde(default)]
    pub submitted_at: Option<Timestamp>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub min_responses: Option<usize>,
    #[serde(default)]
    pub deadline_ms: Option<u64>,
}

impl ProposalRequest {
    /// Resolve defaults into a proposal and its round parameters.
    pub fn into_round(self, defaults: RoundParams, now: Timestamp) -> (AnchorProposal, RoundParams) {
        let submitted_at = self.submitted_at.unwrap_or(now);
        let proposal = match self.anchor_id {
            Some(anchor_id) => AnchorProposal::new(
                anchor_id,
                self.owner_reference,
                self.payload_hash,
                submitted_at,
            ),
            None => AnchorProposal::derived(self.owner_reference, self.payload_hash, submitted_at),
        };
        let params = RoundParams {
            threshold: self.threshold.unwrap_or(defaults.threshold),
            min_responses: self.min_responses.unwrap_or(defaults.min_responses),
            deadline_ms: self.deadline_ms.unwrap_or(defaults.deadline_ms),
        };
        (proposal, params)
    }
}

/// One output line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProposalResponse {
    Decision(ConsensusDecision),
    Error {
        line: usize,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        anchor_id: Option<AnchorId>,
        error: String,
    },
}

/// Counts for one run of the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServeSummary {
    pub decisions: usize,
    pub errors: usize,
}

type RoundOutcome = (usize, AnchorId, Result<ConsensusDecision, ConsensusError>);

/// Read proposals from `input` until EOF or `shutdown`, writing one response
/// line each.
///
/// Every round is started with `shutdown` as its cancel signal. Returns once
/// every started round has answered.
pub async fn serve_json_lines<C, R, W>(
    consensus: Arc<C>,
    defaults: RoundParams,
    time_source: Arc<dyn TimeSource>,
    max_in_flight: usize,
    input: R,
    mut output: W,
    mut shutdown: watch::Receiver<bool>,
) -> io::Result<ServeSummary>
where
    C: ConsensusApi + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let max_in_flight = max_in_flight.max(1);
    let mut lines = input.lines();
    let mut rounds: JoinSet<RoundOutcome> = JoinSet::new();
    let mut summary = ServeSummary::default();
    let mut line_no = 0usize;

    loop {
        tokio::select! {
            Some(joined) = rounds.join_next(), if !rounds.is_empty() => {
                let response = round_response(joined);
                write_response(&mut output, &response, &mut summary).await?;
            }
            _ = shutdown_requested(&mut shutdown) => {
                info!(in_flight = rounds.len(), "shutdown requested, draining rounds");
                break;
            }
            line = lines.next_line(), if rounds.len() < max_in_flight => {
                let Some(line) = line? else { break };
                line_no += 1;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<ProposalRequest>(&line) {
                    Ok(request) => {
                        let (proposal, params) =
                            request.into_round(defaults, time_source.now_millis());
                        debug!(line = line_no, anchor_id = %proposal.anchor_id, "proposal received");
                        let consensus = Arc::clone(&consensus);
                        let cancel = shutdown.clone();
                        let number = line_no;
                        rounds.spawn(async move {
                            let anchor_id = proposal.anchor_id.clone();
                            let result = consensus.propose_cancellable(proposal, params, cancel).await;
                            (number, anchor_id, result)
                        });
                    }
                    Err(e) => {
                        warn!(line = line_no, error = %e, "malformed proposal line");
                        let response = ProposalResponse::Error {
                            line: line_no,
                            anchor_id: None,
                            error: format!("malformed proposal: {e}"),
                        };
                        write_response(&mut output, &response, &mut summary).await?;
                    }
                }
            }
        }
    }

    while let Some(joined) = rounds.join_next().await {
        let response = round_response(joined);
        write_response(&mut output, &response, &mut summary).await?;
    }
    output.flush().await?;
    Ok(summary)
}

/// Resolves once `shutdown` reads `true`. A dropped sender means never.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn round_response(joined: Result<RoundOutcome, JoinError>) -> ProposalResponse {
    match joined {
        Ok((_, _, Ok(decision))) => ProposalResponse::Decision(decision),
        Ok((line, anchor_id, Err(e))) => {
            warn!(line, anchor_id = %anchor_id, error = %e, "round failed");
            ProposalResponse::Error {
                line,
                anchor_id: Some(anchor_id),
                error: e.to_string(),
            }
        }
        Err(e) => ProposalResponse::Error {
            line: 0,
            anchor_id: None,
            error: format!("round task failed: {e}"),
        },
    }
}

async fn write_response<W: AsyncWrite + Unpin>(
    output: &mut W,
    response: &ProposalResponse,
    summary: &mut ServeSummary,
) -> io::Result<()> {
    match response {
        ProposalResponse::Decision(_) => summary.decisions += 1,
        ProposalResponse::Error { .. } => summary.errors += 1,
    }
    let mut line = serde_json::to_vec(response)?;
    line.push(b'\n');
    output.write_all(&line).await?;
    output.flush().await
}
