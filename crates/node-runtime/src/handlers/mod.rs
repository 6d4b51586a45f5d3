//! Caller-facing handlers: the JSON-lines proposal surface and the
//! Prometheus scrape endpoint.

pub mod metrics;
pub mod proposals;

pub use metrics::{metrics_router, spawn_metrics_server};
pub use proposals::{serve_json_lines, ProposalRequest, ProposalResponse, ServeSummary};
