//! Swap-matching network client
//!
//! This module provides:
//! - The `FusionNetwork` trait the coordinator is written against
//! - An HTTP implementation speaking the relayer's REST API
//!
//! The network client is the coordinator's only shared collaborator. It is
//! stateless and reentrant; callers inject it explicitly so tests can
//! substitute a fake without touching process-wide state.

pub mod http;

pub use http::HttpFusionClient;

use crate::commit::{HashLock, Secret, SecretHash};
use crate::error::NetworkError;
use crate::types::{ActiveOrder, BuiltOrder, OrderStatus, PresetKind, Quote, ReadyFill, SwapIntent};

use async_trait::async_trait;

/// Everything the relayer needs to package an order for submission
#[derive(Debug, Clone)]
pub struct CreateOrderRequest {
    pub quote_id: String,
    pub wallet_address: String,
    pub hashlock: HashLock,
    pub preset: PresetKind,
    pub secret_hashes: Vec<SecretHash>,
    /// Free-text attribution tag
    pub source_tag: String,
}

/// The swap-matching network's order and secret-reveal surface
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FusionNetwork: Send + Sync {
    /// Price a swap intent; the returned preset table dictates the secrets
    /// count for the order
    async fn get_quote(&self, intent: &SwapIntent) -> Result<Quote, NetworkError>;

    /// Package an order server-side. Does not publish it.
    async fn create_order(&self, request: &CreateOrderRequest) -> Result<BuiltOrder, NetworkError>;

    /// Publish a packaged order for matching and execution
    async fn submit_order(
        &self,
        chain_id: u64,
        order: &BuiltOrder,
        secret_hashes: &[SecretHash],
    ) -> Result<(), NetworkError>;

    /// Fills currently ready to accept their secret, with leaf indices
    async fn ready_fills(&self, order_hash: &str) -> Result<Vec<ReadyFill>, NetworkError>;

    /// Reveal one secret. The relayer correlates it to its leaf by hash and
    /// rejects reveals for fills that are not ready.
    async fn submit_secret(&self, order_hash: &str, secret: &Secret) -> Result<(), NetworkError>;

    async fn order_status(&self, order_hash: &str) -> Result<OrderStatus, NetworkError>;

    /// Currently open orders for display, paged
    async fn active_orders(&self, page: u64, limit: u64)
        -> Result<Vec<ActiveOrder>, NetworkError>;
}
