//! Cross-subsystem integration flows.

mod concurrency;
mod consensus_flows;
mod node_surface;
mod tamper_evidence;
