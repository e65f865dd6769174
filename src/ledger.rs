//! The ledger: an append-only chain of blocks plus a pending-transfer buffer.

use crate::block::{
    Amount, Block, PreviousHash, Transfer, GENESIS_PREVIOUS_HASH, GENESIS_PROOF,
};
use crate::error::{LedgerError, Result};
use crate::hashing::{block_hash, canonical_serialize};
use crate::proof::seal_hash;

/// Wall-clock seconds since the Unix epoch, with sub-second precision.
fn unix_now() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// A sequential chain of blocks and the transfers waiting to be sealed into
/// the next one.
///
/// The chain is never empty after construction: the genesis block is sealed
/// by [`Ledger::new`]. Blocks are immutable once appended and the chain only
/// grows. The ledger itself does no locking — callers exposing it to
/// concurrent requests must hold exclusive access across any
/// `submit_transfer`/`seal_block` sequence (see [`crate::api`]).
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Block>,
    pending: Vec<Transfer>,
}

impl Ledger {
    /// Create a ledger with its genesis block sealed.
    pub fn new() -> Result<Self> {
        let mut ledger = Ledger {
            chain: Vec::new(),
            pending: Vec::new(),
        };
        ledger.seal_block(GENESIS_PROOF, Some(GENESIS_PREVIOUS_HASH))?;
        Ok(ledger)
    }

    /// The sealed chain, oldest block first.
    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    /// Transfers submitted since the last seal, in submission order.
    pub fn pending(&self) -> &[Transfer] {
        &self.pending
    }

    /// Number of sealed blocks.
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Queue a transfer for the next sealed block.
    ///
    /// Returns the index of the block expected to absorb it — purely
    /// informational, since other transfers may join before sealing. Never
    /// fails; field validation is the HTTP layer's concern.
    pub fn submit_transfer(&mut self, sender: &str, recipient: &str, amount: Amount) -> u64 {
        self.pending.push(Transfer {
            amount,
            recipient: recipient.to_string(),
            sender: sender.to_string(),
        });
        self.chain.len() as u64 + 1
    }

    /// Seal the pending transfers into a new block with the given proof.
    ///
    /// The chaining hash covers the canonical serialization of the block that
    /// is last *right now*, combined with the decimal proof; on an empty
    /// chain (genesis only) it is the empty string. `previous_hash` falls
    /// back to the computed hash of the last block when absent or unset.
    ///
    /// No proof validation happens here — callers gate on
    /// [`crate::proof::valid_proof`] first.
    pub fn seal_block(
        &mut self,
        proof: u64,
        previous_hash: Option<PreviousHash>,
    ) -> Result<Block> {
        let current_hash = match self.chain.last() {
            Some(last) => seal_hash(&canonical_serialize(last)?, proof),
            None => String::new(),
        };

        let previous_hash = match previous_hash {
            Some(given) if !given.is_unset() => given,
            _ => {
                let last = self.chain.last().ok_or(LedgerError::EmptyChain)?;
                PreviousHash::Digest(block_hash(last)?)
            }
        };

        let block = Block {
            hash: current_hash,
            index: self.chain.len() as u64 + 1,
            previous_hash,
            proof,
            timestamp: unix_now(),
            // Moved, not copied: the buffer is empty the instant the block
            // owns the transfers.
            transactions: std::mem::take(&mut self.pending),
        };

        self.chain.push(block.clone());
        Ok(block)
    }

    /// The most recently sealed block.
    ///
    /// `EmptyChain` is unreachable through [`Ledger::new`], which always
    /// seals genesis.
    pub fn last_block(&self) -> Result<&Block> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Number;

    #[test]
    fn test_genesis_invariants() {
        let ledger = Ledger::new().unwrap();

        assert_eq!(ledger.len(), 1);
        let genesis = ledger.last_block().unwrap();
        assert_eq!(genesis.index, 1);
        assert_eq!(genesis.proof, GENESIS_PROOF);
        assert_eq!(genesis.previous_hash, PreviousHash::Marker(1));
        assert_eq!(genesis.hash, "");
        assert!(genesis.transactions.is_empty());
    }

    #[test]
    fn test_submit_transfer_preserves_order() {
        let mut ledger = Ledger::new().unwrap();

        let index = ledger.submit_transfer("alice", "bob", Number::from(10));
        assert_eq!(index, 2);
        let index = ledger.submit_transfer("bob", "carol", Number::from(3));
        assert_eq!(index, 2);

        let pending = ledger.pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].sender, "alice");
        assert_eq!(pending[0].recipient, "bob");
        assert_eq!(pending[1].sender, "bob");
        assert_eq!(pending[1].recipient, "carol");
    }

    #[test]
    fn test_seal_block_moves_pending_buffer() {
        let mut ledger = Ledger::new().unwrap();
        ledger.submit_transfer("alice", "bob", Number::from(10));
        ledger.submit_transfer("carol", "dave", Number::from(7));
        let snapshot = ledger.pending().to_vec();

        let block = ledger.seal_block(12345, None).unwrap();

        assert!(ledger.pending().is_empty());
        assert_eq!(block.transactions, snapshot);
        assert_eq!(block.index, 2);
        assert_eq!(block.proof, 12345);
    }

    #[test]
    fn test_seal_block_links_to_previous_block() {
        let mut ledger = Ledger::new().unwrap();
        let genesis_hash = block_hash(ledger.last_block().unwrap()).unwrap();

        let block = ledger.seal_block(12345, None).unwrap();

        assert_eq!(block.previous_hash, PreviousHash::Digest(genesis_hash));
    }

    #[test]
    fn test_seal_block_chaining_hash_covers_prior_block() {
        let mut ledger = Ledger::new().unwrap();
        let last_string = canonical_serialize(ledger.last_block().unwrap()).unwrap();

        let block = ledger.seal_block(777, None).unwrap();

        assert_eq!(block.hash, seal_hash(&last_string, 777));
        assert_eq!(block.hash.len(), 64);
    }

    #[test]
    fn test_seal_block_honors_previous_hash_override() {
        let mut ledger = Ledger::new().unwrap();
        let override_hash = PreviousHash::Digest("ff".repeat(32));

        let block = ledger.seal_block(1, Some(override_hash.clone())).unwrap();

        assert_eq!(block.previous_hash, override_hash);
    }

    #[test]
    fn test_seal_block_unset_override_falls_back() {
        let mut ledger = Ledger::new().unwrap();
        let genesis_hash = block_hash(ledger.last_block().unwrap()).unwrap();

        let block = ledger
            .seal_block(1, Some(PreviousHash::Digest(String::new())))
            .unwrap();
        assert_eq!(block.previous_hash, PreviousHash::Digest(genesis_hash));

        let next_hash = block_hash(ledger.last_block().unwrap()).unwrap();
        let block = ledger
            .seal_block(2, Some(PreviousHash::Marker(0)))
            .unwrap();
        assert_eq!(block.previous_hash, PreviousHash::Digest(next_hash));
    }

    #[test]
    fn test_chain_links_hold_over_many_blocks() {
        let mut ledger = Ledger::new().unwrap();
        for proof in [5, 6, 7, 8] {
            ledger.submit_transfer("alice", "bob", Number::from(1));
            ledger.seal_block(proof, None).unwrap();
        }

        let chain = ledger.chain();
        assert_eq!(chain.len(), 5);
        for i in 1..chain.len() {
            assert_eq!(chain[i].index, chain[i - 1].index + 1);
            assert_eq!(
                chain[i].previous_hash,
                PreviousHash::Digest(block_hash(&chain[i - 1]).unwrap())
            );
        }
    }

    #[test]
    fn test_indices_strictly_increase_from_one() {
        let mut ledger = Ledger::new().unwrap();
        ledger.seal_block(10, None).unwrap();
        ledger.seal_block(11, None).unwrap();

        let indices: Vec<u64> = ledger.chain().iter().map(|b| b.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }
}
