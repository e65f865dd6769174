//! Proof-of-work checker.
//!
//! A proof seals a block when SHA-256 over the canonical serialization of the
//! current last block concatenated with the decimal proof meets the
//! difficulty target. The checker is pure and stateless; callers branch on
//! the boolean rather than on an error.

use sha2::{Digest, Sha256};

/// A hash meets the difficulty target when its first six hex characters are
/// all zero (one accepted proof per ~16.7M candidates).
pub const DIFFICULTY_PREFIX: &str = "000000";

/// The guess hash shared by the checker and the chaining hash in
/// [`crate::ledger::Ledger::seal_block`]: SHA-256 of the block string with the
/// decimal proof appended, as lowercase hex.
pub fn seal_hash(block_string: &str, proof: u64) -> String {
    let guess = format!("{block_string}{proof}");
    hex::encode(Sha256::digest(guess.as_bytes()))
}

/// Does this proof meet the difficulty target for the given block string?
pub fn valid_proof(block_string: &str, proof: u64) -> bool {
    seal_hash(block_string, proof).starts_with(DIFFICULTY_PREFIX)
}

/// Brute-force search: increment a candidate from 0 until the checker accepts
/// it. This is a miner/test tool, not part of the ledger contract — sealing a
/// block never searches for or validates proofs itself.
pub fn find_proof(block_string: &str) -> u64 {
    let mut proof = 0u64;
    while !valid_proof(block_string, proof) {
        proof += 1;
    }
    proof
}
