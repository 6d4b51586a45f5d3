//! Ports for the Audit Log subsystem

pub mod inbound;
pub mod outbound;

pub use inbound::AuditLogApi;
pub use outbound::AuditStore;
