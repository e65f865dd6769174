//! Canonical block serialization and SHA-256 hashing.
//!
//! Determinism is the linchpin of the whole chain: two serializations of the
//! same logical block must be byte-identical, or hash verification breaks.
//! The canonical form is compact JSON with keys in lexicographic order, which
//! the types in [`crate::block`] guarantee through their field declaration
//! order.

use sha2::{Digest, Sha256};

use crate::block::Block;
use crate::error::Result;

/// Length of a hex-encoded SHA-256 digest.
pub const HASH_HEX_LEN: usize = 64;

/// Serialize a block to its canonical string encoding.
pub fn canonical_serialize(block: &Block) -> Result<String> {
    Ok(serde_json::to_string(block)?)
}

/// SHA-256 of the canonical serialization, as lowercase hex.
pub fn block_hash(block: &Block) -> Result<String> {
    let block_string = canonical_serialize(block)?;
    Ok(hex::encode(Sha256::digest(block_string.as_bytes())))
}
