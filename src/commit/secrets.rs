//! Per-fill secrets: generation and at-most-once reveal tracking

use crate::error::{SwapError, SwapResult};

use rand::rngs::OsRng;
use rand::RngCore;

/// A single-use 32-byte random value enabling one fill's reveal.
///
/// Held in memory only for the lifetime of one order. The `Debug`
/// implementation is redacted so a secret can never leak through logging or
/// error formatting; the raw bytes are exposed only at the reveal boundary.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret([u8; 32]);

impl Secret {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Raw bytes, needed for hashing and for the reveal call. Never log.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// 0x-prefixed hex rendering used on the wire at reveal time
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Commitment to one secret: keccak256 of its bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecretHash(pub [u8; 32]);

impl SecretHash {
    /// 0x-prefixed hex rendering used on the wire
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

/// Generate `count` independent secrets from the OS CSPRNG.
///
/// Entropy failure is fatal and must abort order creation - an order must
/// never be created with fewer secrets than its preset demands.
pub fn generate_secrets(count: usize) -> SwapResult<Vec<Secret>> {
    let mut secrets = Vec::with_capacity(count);

    for _ in 0..count {
        let mut bytes = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| SwapError::Entropy(e.to_string()))?;
        secrets.push(Secret(bytes));
    }

    Ok(secrets)
}

#[derive(Debug)]
struct SecretSlot {
    secret: Secret,
    revealed: bool,
}

/// Explicit leaf-index -> secret mapping for one order.
///
/// Owns every secret (revealed or not) for the order's lifetime and tracks
/// which leaves were already revealed, so a leaf is never submitted twice
/// and cancellation never discards knowledge of what went out.
#[derive(Debug)]
pub struct SecretStore {
    slots: Vec<SecretSlot>,
}

impl SecretStore {
    pub fn new(secrets: Vec<Secret>) -> Self {
        let slots = secrets
            .into_iter()
            .map(|secret| SecretSlot {
                secret,
                revealed: false,
            })
            .collect();
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Secret for a leaf index, if the index is in range
    pub fn secret(&self, idx: u64) -> Option<&Secret> {
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.slots.get(i))
            .map(|slot| &slot.secret)
    }

    /// Whether this leaf's secret already went out
    pub fn is_revealed(&self, idx: u64) -> bool {
        usize::try_from(idx)
            .ok()
            .and_then(|i| self.slots.get(i))
            .map(|slot| slot.revealed)
            .unwrap_or(false)
    }

    /// Record a successful reveal. Out-of-range indices are ignored.
    pub fn mark_revealed(&mut self, idx: u64) {
        if let Some(slot) = usize::try_from(idx).ok().and_then(|i| self.slots.get_mut(i)) {
            slot.revealed = true;
        }
    }

    /// Leaf indices revealed so far, in index order
    pub fn revealed_indices(&self) -> Vec<u64> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.revealed)
            .map(|(i, _)| i as u64)
            .collect()
    }
}
