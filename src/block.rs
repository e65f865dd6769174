//! Block and transfer types.
//!
//! Blocks are immutable once sealed; the chain only ever grows. Field layout
//! matters here: serde serializes struct fields in declaration order, and the
//! canonical encoding (see [`crate::hashing`]) requires keys in lexicographic
//! order, so every struct below declares its fields pre-sorted.

use serde::{Deserialize, Serialize};

/// Transfer amounts keep the exact JSON number they were submitted with
/// (integer or float), so re-serializing a block never rewrites them.
pub type Amount = serde_json::Number;

/// A single sender → recipient amount record.
///
/// No sign or self-transfer checks: the ledger records what it is handed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub amount: Amount,
    pub recipient: String,
    pub sender: String,
}

/// Reference to the prior block: either its hex digest or the integer marker
/// carried by the genesis block. Serializes as a bare JSON string or number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PreviousHash {
    Digest(String),
    Marker(u64),
}

impl PreviousHash {
    /// An unset reference: the empty digest or the zero marker. Callers of
    /// `seal_block` passing one of these get the computed fallback instead.
    pub fn is_unset(&self) -> bool {
        match self {
            PreviousHash::Digest(s) => s.is_empty(),
            PreviousHash::Marker(n) => *n == 0,
        }
    }
}

/// A sealed batch of transfers with chaining metadata.
///
/// `hash` is the chaining hash: SHA-256 over the canonical serialization of
/// the block that was last when this one was sealed, concatenated with the
/// decimal proof. The genesis block, sealed on an empty chain, carries `""`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub hash: String,
    pub index: u64,
    pub previous_hash: PreviousHash,
    pub proof: u64,
    pub timestamp: f64,
    pub transactions: Vec<Transfer>,
}

/// Proof the genesis block is sealed with.
pub const GENESIS_PROOF: u64 = 100;

/// The genesis block's previous-hash marker, the integer 1. Kept as a bare
/// number on the wire for compatibility with existing chain encodings.
pub const GENESIS_PREVIOUS_HASH: PreviousHash = PreviousHash::Marker(1);
