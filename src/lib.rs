//! Fusion Coordinator - cross-chain swap order coordination
//!
//! Turns a swap intent ("amount A of token X on chain S for token Y on
//! chain D") into a cryptographically committed, partially fillable order on
//! a Fusion-style relayer network, then drives it through the
//! reveal-on-demand secret protocol to a terminal status.
//!
//! The flow: quote the intent, generate one secret per supported fill,
//! commit to them with a hashlock (single hash, or a Merkle root for
//! multi-fill orders), create and submit the order, then poll for fills
//! ready to accept their secret and reveal each exactly once until the
//! order executes, expires, or refunds.
//!
//! ```no_run
//! use fusion_coordinator::{
//!     CancelFlag, HttpFusionClient, Settings, SwapCoordinator, SwapIntent,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let settings = Settings::load()?;
//! let network = Arc::new(HttpFusionClient::new(&settings.network)?);
//! let coordinator = SwapCoordinator::new(network, settings.coordinator);
//!
//! let intent = SwapIntent {
//!     src_chain_id: 1,
//!     dst_chain_id: 137,
//!     src_token_address: "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee".into(),
//!     dst_token_address: "0x2791bca1f2de4661ed88a30c99a7a9449aa84174".into(),
//!     amount: "1000000000000000000".into(),
//!     wallet_address: "0x...".into(),
//!     enable_estimate: true,
//! };
//!
//! let outcome = coordinator.swap(&intent, &CancelFlag::new()).await?;
//! # Ok(())
//! # }
//! ```

pub mod commit;
pub mod config;
pub mod coordination;
pub mod error;
pub mod network;
pub mod types;

pub use commit::{commit, generate_secrets, HashLock, Secret, SecretHash, SecretStore};
pub use config::{CoordinatorConfig, NetworkConfig, Settings};
pub use coordination::{CancelFlag, PlacedOrder, SwapCoordinator, SwapOutcome};
pub use error::{NetworkError, Phase, SwapError, SwapResult};
pub use network::{CreateOrderRequest, FusionNetwork, HttpFusionClient};
pub use types::{
    ActiveOrder, BuiltOrder, OrderStatus, Preset, PresetKind, Quote, ReadyFill, SwapIntent,
};
