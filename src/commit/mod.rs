//! Commitment layer - secrets and hashlocks
//!
//! This module provides:
//! - CSPRNG generation of per-fill secrets
//! - Keccak-256 hashlock commitments (single hash or Merkle root)
//! - Per-order secret storage with at-most-once reveal tracking

pub mod merkle;
pub mod secrets;

pub use secrets::{generate_secrets, Secret, SecretHash, SecretStore};

use merkle::{keccak256, merkle_root};

/// The order's cryptographic commitment.
///
/// Single-fill orders commit to the hash of their one secret. Multi-fill
/// orders commit to the Merkle root over the per-secret hashes so each fill
/// can be proven and unlocked independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashLock {
    Single([u8; 32]),
    MerkleRoot([u8; 32]),
}

impl HashLock {
    /// Raw 32-byte commitment value
    pub fn value(&self) -> &[u8; 32] {
        match self {
            HashLock::Single(h) => h,
            HashLock::MerkleRoot(r) => r,
        }
    }

    /// 0x-prefixed hex rendering used on the wire
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.value()))
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, HashLock::MerkleRoot(_))
    }
}

/// Build the hashlock and the ordered secret-hash list for an order.
///
/// Leaf `i` is `keccak256(secret[i])`; the returned hash list preserves the
/// input order, and that order is the sole correlation between a later
/// readiness notification and its secret. Returns `None` for an empty
/// secret list, which no valid quote can produce.
pub fn commit(secrets: &[Secret]) -> Option<(HashLock, Vec<SecretHash>)> {
    if secrets.is_empty() {
        return None;
    }

    let hashes: Vec<SecretHash> = secrets
        .iter()
        .map(|s| SecretHash(keccak256(s.as_bytes())))
        .collect();

    let lock = if hashes.len() == 1 {
        HashLock::Single(hashes[0].0)
    } else {
        let leaves: Vec<[u8; 32]> = hashes.iter().map(|h| h.0).collect();
        HashLock::MerkleRoot(merkle_root(&leaves))
    };

    Some((lock, hashes))
}
