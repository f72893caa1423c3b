//! Keccak-256 hashing and the Merkle tree over secret hashes

use sha3::{Digest, Keccak256};

/// Keccak-256 of arbitrary bytes
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Merkle root over ordered leaves.
///
/// Parent = keccak256(left || right); an unpaired node at the end of a level
/// is promoted to the next level unchanged. A single leaf is its own root.
///
/// Panics on an empty slice; callers guarantee at least one leaf.
pub fn merkle_root(leaves: &[[u8; 32]]) -> [u8; 32] {
    assert!(!leaves.is_empty(), "merkle tree requires at least one leaf");

    let mut level: Vec<[u8; 32]> = leaves.to_vec();

    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len() / 2 + 1);

        for pair in level.chunks(2) {
            if pair.len() == 2 {
                let mut buf = [0u8; 64];
                buf[..32].copy_from_slice(&pair[0]);
                buf[32..].copy_from_slice(&pair[1]);
                next.push(keccak256(&buf));
            } else {
                next.push(pair[0]);
            }
        }

        level = next;
    }

    level[0]
}
