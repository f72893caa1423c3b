//! The coordinator: order placement phases and the reveal-loop state machine

use crate::commit::{commit, generate_secrets, SecretStore};
use crate::config::CoordinatorConfig;
use crate::error::{NetworkError, SwapError, SwapResult};
use crate::network::{CreateOrderRequest, FusionNetwork};
use crate::types::{ActiveOrder, OrderStatus, PresetKind, Quote, SwapIntent};

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{interval, Duration, Instant};
use tracing::{debug, info, warn};

/// Cloneable cancellation handle for an in-flight reveal loop.
///
/// Cancelling stops polling without discarding knowledge of which secrets
/// were already revealed; the loop reports them in its outcome.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// A submitted order together with its exclusively-owned secret set.
///
/// Secrets are scoped to this value and the loop driving it; they are never
/// shared across orders.
#[derive(Debug)]
pub struct PlacedOrder {
    pub order_hash: String,
    pub quote_id: String,
    pub src_chain_id: u64,
    pub preset: PresetKind,
    store: SecretStore,
}

impl PlacedOrder {
    /// Number of partial fills this order supports
    pub fn secrets_count(&self) -> usize {
        self.store.len()
    }

    /// Leaf indices revealed so far
    pub fn revealed_indices(&self) -> Vec<u64> {
        self.store.revealed_indices()
    }
}

/// How a reveal loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapOutcome {
    /// The order reached a terminal status
    Completed {
        status: OrderStatus,
        revealed: Vec<u64>,
    },
    /// The deadline passed with the order still non-terminal. The order's
    /// true fate is unknown and needs manual reconciliation; `revealed`
    /// records every secret that already went out.
    Inconclusive {
        last_status: Option<OrderStatus>,
        revealed: Vec<u64>,
    },
    /// The caller cancelled the loop
    Cancelled { revealed: Vec<u64> },
}

/// Cross-chain swap order coordinator.
///
/// Stateless between orders; the injected network client is the only shared
/// resource. Multiple orders may run their own loops concurrently on clones
/// of the same coordinator handle.
pub struct SwapCoordinator<N: FusionNetwork> {
    network: Arc<N>,
    config: CoordinatorConfig,
}

impl<N: FusionNetwork> Clone for SwapCoordinator<N> {
    fn clone(&self) -> Self {
        Self {
            network: self.network.clone(),
            config: self.config.clone(),
        }
    }
}

impl<N: FusionNetwork> SwapCoordinator<N> {
    pub fn new(network: Arc<N>, config: CoordinatorConfig) -> Self {
        Self { network, config }
    }

    /// Price a swap intent
    pub async fn quote(&self, intent: &SwapIntent) -> SwapResult<Quote> {
        self.network.get_quote(intent).await.map_err(SwapError::Quote)
    }

    /// Run the full placement pipeline: quote, secrets, commitment, create,
    /// submit. On success the order is live on the network and the returned
    /// `PlacedOrder` owns every secret needed to settle it.
    pub async fn place_order(&self, intent: &SwapIntent) -> SwapResult<PlacedOrder> {
        let quote = self.quote(intent).await?;

        let preset = quote.recommended_preset;
        let secrets_count = quote
            .secrets_count(preset)
            .ok_or_else(|| SwapError::InvalidQuote(format!("preset {:?} missing", preset)))?;
        if secrets_count == 0 {
            return Err(SwapError::InvalidQuote(
                "preset reports zero secrets".to_string(),
            ));
        }

        debug!(
            quote_id = %quote.quote_id,
            ?preset,
            secrets_count,
            "quote received, generating secrets"
        );

        // Secrets must exist in full before anything touches the network
        let secrets = generate_secrets(secrets_count)?;
        let (hashlock, secret_hashes) = commit(&secrets)
            .ok_or_else(|| SwapError::InvalidQuote("empty secret set".to_string()))?;

        let request = CreateOrderRequest {
            quote_id: quote.quote_id.clone(),
            wallet_address: intent.wallet_address.clone(),
            hashlock,
            preset,
            secret_hashes: secret_hashes.clone(),
            source_tag: self.config.source_tag.clone(),
        };

        let built = self
            .network
            .create_order(&request)
            .await
            .map_err(SwapError::Create)?;

        info!(
            order_hash = %built.order_hash,
            quote_id = %built.quote_id,
            multi_fill = hashlock.is_multi(),
            "order created, submitting"
        );

        self.network
            .submit_order(intent.src_chain_id, &built, &secret_hashes)
            .await
            .map_err(SwapError::Submit)?;

        info!(order_hash = %built.order_hash, "order submitted");

        Ok(PlacedOrder {
            order_hash: built.order_hash,
            quote_id: built.quote_id,
            src_chain_id: intent.src_chain_id,
            preset,
            store: SecretStore::new(secrets),
        })
    }

    /// Drive a submitted order to completion.
    ///
    /// Each iteration fetches the fills ready to accept their secret,
    /// reveals each corresponding secret exactly once, then polls status.
    /// Transient network errors are retried on the next interval. The loop
    /// ends on a terminal status, on the configured deadline, or on
    /// cancellation - never silently.
    pub async fn settle(&self, order: &mut PlacedOrder, cancel: &CancelFlag) -> SwapOutcome {
        let mut tick = interval(Duration::from_millis(self.config.poll_interval_ms));
        let deadline = Instant::now() + Duration::from_secs(self.config.max_poll_secs);
        let mut last_status = None;

        info!(order_hash = %order.order_hash, "entering reveal loop");

        loop {
            if cancel.is_cancelled() {
                info!(
                    order_hash = %order.order_hash,
                    revealed = ?order.revealed_indices(),
                    "reveal loop cancelled"
                );
                return SwapOutcome::Cancelled {
                    revealed: order.revealed_indices(),
                };
            }

            if Instant::now() >= deadline {
                warn!(
                    order_hash = %order.order_hash,
                    ?last_status,
                    revealed = ?order.revealed_indices(),
                    "reveal loop deadline reached, order status unknown, manual reconciliation required"
                );
                return SwapOutcome::Inconclusive {
                    last_status,
                    revealed: order.revealed_indices(),
                };
            }

            tick.tick().await;

            self.reveal_ready(order).await;

            // Status always follows the same iteration's reveals so a
            // transition they cause is visible on this pass
            match self.network.order_status(&order.order_hash).await {
                Ok(status) => {
                    last_status = Some(status);
                    if status.is_terminal() {
                        info!(
                            order_hash = %order.order_hash,
                            %status,
                            revealed = ?order.revealed_indices(),
                            "order reached terminal status"
                        );
                        return SwapOutcome::Completed {
                            status,
                            revealed: order.revealed_indices(),
                        };
                    }
                    debug!(order_hash = %order.order_hash, %status, "order still open");
                }
                Err(e) => self.log_transient(&order.order_hash, "status poll", e),
            }
        }
    }

    /// Reveal the secret for every fill reported ready, skipping leaves
    /// already revealed
    async fn reveal_ready(&self, order: &mut PlacedOrder) {
        let fills = match self.network.ready_fills(&order.order_hash).await {
            Ok(fills) => fills,
            Err(e) => {
                self.log_transient(&order.order_hash, "ready-fills poll", e);
                return;
            }
        };

        for fill in fills {
            if order.store.is_revealed(fill.idx) {
                continue;
            }

            let Some(secret) = order.store.secret(fill.idx) else {
                warn!(
                    order_hash = %order.order_hash,
                    idx = fill.idx,
                    secrets = order.store.len(),
                    "ready fill index out of range, ignoring"
                );
                continue;
            };

            match self.network.submit_secret(&order.order_hash, secret).await {
                Ok(()) => {
                    order.store.mark_revealed(fill.idx);
                    info!(order_hash = %order.order_hash, idx = fill.idx, "secret revealed");
                }
                // Leave the leaf unrevealed; the fill will report ready
                // again and the reveal retries next interval
                Err(e) => self.log_transient(&order.order_hash, "secret reveal", e),
            }
        }
    }

    fn log_transient(&self, order_hash: &str, operation: &str, error: NetworkError) {
        if error.is_retryable() {
            warn!(order_hash, operation, %error, "transient relayer error, will retry");
        } else {
            warn!(order_hash, operation, %error, "relayer error on poll iteration, will retry");
        }
    }

    /// End-to-end: place the order, then settle it
    pub async fn swap(&self, intent: &SwapIntent, cancel: &CancelFlag) -> SwapResult<SwapOutcome> {
        let mut order = self.place_order(intent).await?;
        Ok(self.settle(&mut order, cancel).await)
    }

    /// Currently open orders for display, paged. Single call, no retries.
    pub async fn active_orders(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<Vec<ActiveOrder>, NetworkError> {
        self.network.active_orders(page, limit).await
    }
}
