//! Wire and domain types for the order lifecycle
//!
//! Field names follow the relayer's camelCase JSON conventions; amounts are
//! decimal strings in the token's smallest unit and are never parsed into
//! numerics by the coordinator.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A user's desired cross-chain exchange. Immutable; consumed once by the
/// quote call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapIntent {
    pub src_chain_id: u64,
    pub dst_chain_id: u64,
    #[serde(rename = "fromTokenAddress")]
    pub src_token_address: String,
    #[serde(rename = "toTokenAddress")]
    pub dst_token_address: String,
    /// Amount in the source token's smallest unit
    pub amount: String,
    pub wallet_address: String,
    pub enable_estimate: bool,
}

/// Execution speed/cost tier chosen by the relayer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresetKind {
    Fast,
    Medium,
    Slow,
}

/// Execution parameters for one preset tier
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// How many partial fills (and therefore secrets) the order supports
    pub secrets_count: usize,
    #[serde(default)]
    pub auction_duration: u64,
}

/// A priced route plus execution parameters, returned per SwapIntent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub quote_id: String,
    pub src_token_amount: String,
    pub dst_token_amount: String,
    pub recommended_preset: PresetKind,
    pub presets: HashMap<PresetKind, Preset>,
}

impl Quote {
    /// Look up a preset tier
    pub fn preset(&self, kind: PresetKind) -> Option<&Preset> {
        self.presets.get(&kind)
    }

    /// Secrets count dictated by the given preset
    pub fn secrets_count(&self, kind: PresetKind) -> Option<usize> {
        self.preset(kind).map(|p| p.secrets_count)
    }
}

/// Result of the create step: the order is packaged but not yet published.
///
/// The `order` body is an opaque relayer-defined structure; the coordinator
/// only echoes it back at submit time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuiltOrder {
    pub order_hash: String,
    pub quote_id: String,
    pub order: serde_json::Value,
}

/// One partial execution unit reported ready to accept its secret
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ReadyFill {
    /// Leaf index correlating this fill with its secret
    pub idx: u64,
}

/// Lifecycle stage of a submitted order, as reported by the relayer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Executed,
    Expired,
    Refunded,
}

impl OrderStatus {
    /// Terminal states stop the reveal loop
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Executed | OrderStatus::Expired | OrderStatus::Refunded
        )
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Executed => "executed",
            OrderStatus::Expired => "expired",
            OrderStatus::Refunded => "refunded",
        };
        f.write_str(s)
    }
}

/// An open order as returned by the active-orders listing, for display only
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveOrder {
    pub order_hash: String,
    pub quote_id: String,
    pub src_chain_id: u64,
    pub dst_chain_id: u64,
    #[serde(default)]
    pub remaining_maker_amount: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(OrderStatus::Executed.is_terminal());
        assert!(OrderStatus::Expired.is_terminal());
        assert!(OrderStatus::Refunded.is_terminal());
    }

    #[test]
    fn quote_deserializes_relayer_shape() {
        let raw = r#"{
            "quoteId": "q-1",
            "srcTokenAmount": "1000000",
            "dstTokenAmount": "995000",
            "recommendedPreset": "fast",
            "presets": {
                "fast": { "secretsCount": 1, "auctionDuration": 120 },
                "medium": { "secretsCount": 4 }
            }
        }"#;
        let quote: Quote = serde_json::from_str(raw).unwrap();
        assert_eq!(quote.secrets_count(PresetKind::Fast), Some(1));
        assert_eq!(quote.secrets_count(PresetKind::Medium), Some(4));
        assert_eq!(quote.secrets_count(PresetKind::Slow), None);
        assert_eq!(quote.recommended_preset, PresetKind::Fast);
    }

    #[test]
    fn status_deserializes_lowercase() {
        let status: OrderStatus = serde_json::from_str("\"executed\"").unwrap();
        assert_eq!(status, OrderStatus::Executed);
    }
}
