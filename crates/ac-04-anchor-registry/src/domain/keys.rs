//! Key layout.

use shared_types::{AnchorId, Hash};

pub const ANCHOR_PREFIX: &[u8] = b"anchor/";
pub const PAYLOAD_PREFIX: &[u8] = b"payload/";
pub const CHAIN_PREFIX: &[u8] = b"chain/";
pub const HEAD_KEY: &[u8] = b"meta/head";

pub fn anchor_key(anchor_id: &AnchorId) -> Vec<u8> {
    [ANCHOR_PREFIX, anchor_id.as_str().as_bytes()].concat()
}

pub fn payload_key(payload_hash: &Hash) -> Vec<u8> {
    [PAYLOAD_PREFIX, payload_hash.as_slice()].concat()
}

/// Big-endian so lexicographic key order equals chain order.
pub fn chain_key(sequence: u64) -> Vec<u8> {
    [CHAIN_PREFIX, sequence.to_be_bytes().as_slice()].concat()
}
