//! End-to-end coordinator scenarios against a scripted relayer network

use fusion_coordinator::commit::merkle::keccak256;
use fusion_coordinator::{
    ActiveOrder, BuiltOrder, CancelFlag, CoordinatorConfig, CreateOrderRequest, FusionNetwork,
    NetworkError, OrderStatus, Phase, Preset, PresetKind, Quote, ReadyFill, Secret, SecretHash,
    SwapCoordinator, SwapIntent, SwapOutcome,
};

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn intent() -> SwapIntent {
    SwapIntent {
        src_chain_id: 1,
        dst_chain_id: 42161,
        src_token_address: "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee".to_string(),
        dst_token_address: "0xff970a61a04b1ca14834a43f5de4533ebddb5cc8".to_string(),
        amount: "2500000000000000000".to_string(),
        wallet_address: "0x70997970c51812dc3a010c7d01b50e0d17dc79c8".to_string(),
        enable_estimate: true,
    }
}

fn config() -> CoordinatorConfig {
    CoordinatorConfig {
        source_tag: "dashboard-tests".to_string(),
        poll_interval_ms: 1_000,
        max_poll_secs: 600,
    }
}

/// Relayer double driven by per-iteration scripts.
///
/// `ready_script` holds one entry per ready-fills poll (leaf indices to
/// report ready); `status_script` one entry per status poll. Exhausted
/// scripts report no fills / a pending order. Revealed secrets are matched
/// back to their leaf index through the hashes captured at create time.
struct ScriptedNetwork {
    secrets_count: usize,
    fail_create: bool,
    ready_script: Mutex<VecDeque<Vec<u64>>>,
    status_script: Mutex<VecDeque<OrderStatus>>,
    created_hashes: Mutex<Vec<SecretHash>>,
    reveal_log: Mutex<Vec<u64>>,
    ready_calls: AtomicU32,
    status_calls: AtomicU32,
}

impl ScriptedNetwork {
    fn new(
        secrets_count: usize,
        ready_script: Vec<Vec<u64>>,
        status_script: Vec<OrderStatus>,
    ) -> Self {
        Self {
            secrets_count,
            fail_create: false,
            ready_script: Mutex::new(ready_script.into_iter().collect()),
            status_script: Mutex::new(status_script.into_iter().collect()),
            created_hashes: Mutex::new(Vec::new()),
            reveal_log: Mutex::new(Vec::new()),
            ready_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
        }
    }

    fn failing_create(secrets_count: usize) -> Self {
        let mut network = Self::new(secrets_count, Vec::new(), Vec::new());
        network.fail_create = true;
        network
    }

    fn reveal_log(&self) -> Vec<u64> {
        self.reveal_log.lock().unwrap().clone()
    }
}

#[async_trait]
impl FusionNetwork for ScriptedNetwork {
    async fn get_quote(&self, _intent: &SwapIntent) -> Result<Quote, NetworkError> {
        let mut presets = HashMap::new();
        presets.insert(
            PresetKind::Fast,
            Preset {
                secrets_count: self.secrets_count,
                auction_duration: 120,
            },
        );
        Ok(Quote {
            quote_id: "q-scripted".to_string(),
            src_token_amount: "2500000000000000000".to_string(),
            dst_token_amount: "2493000000".to_string(),
            recommended_preset: PresetKind::Fast,
            presets,
        })
    }

    async fn create_order(
        &self,
        request: &CreateOrderRequest,
    ) -> Result<BuiltOrder, NetworkError> {
        if self.fail_create {
            return Err(NetworkError::Status {
                status: 502,
                url: "https://relayer/quoter/v1.0/quote/build".to_string(),
                body: "bad gateway".to_string(),
            });
        }

        *self.created_hashes.lock().unwrap() = request.secret_hashes.clone();
        Ok(BuiltOrder {
            order_hash: "0xfeedbeef".to_string(),
            quote_id: request.quote_id.clone(),
            order: serde_json::json!({ "salt": "42" }),
        })
    }

    async fn submit_order(
        &self,
        _chain_id: u64,
        _order: &BuiltOrder,
        _secret_hashes: &[SecretHash],
    ) -> Result<(), NetworkError> {
        Ok(())
    }

    async fn ready_fills(&self, _order_hash: &str) -> Result<Vec<ReadyFill>, NetworkError> {
        self.ready_calls.fetch_add(1, Ordering::SeqCst);
        let indices = self
            .ready_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_default();
        Ok(indices.into_iter().map(|idx| ReadyFill { idx }).collect())
    }

    async fn submit_secret(&self, _order_hash: &str, secret: &Secret) -> Result<(), NetworkError> {
        let hash = keccak256(secret.as_bytes());
        let idx = self
            .created_hashes
            .lock()
            .unwrap()
            .iter()
            .position(|h| h.0 == hash)
            .expect("revealed secret does not match any committed leaf") as u64;
        self.reveal_log.lock().unwrap().push(idx);
        Ok(())
    }

    async fn order_status(&self, _order_hash: &str) -> Result<OrderStatus, NetworkError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .status_script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(OrderStatus::Pending))
    }

    async fn active_orders(
        &self,
        _page: u64,
        _limit: u64,
    ) -> Result<Vec<ActiveOrder>, NetworkError> {
        Ok(Vec::new())
    }
}

/// Scenario A: one secret, fill ready on poll 1, executed on poll 2.
#[tokio::test(start_paused = true)]
async fn single_fill_executes_after_two_polls() {
    init_tracing();

    let network = Arc::new(ScriptedNetwork::new(
        1,
        vec![vec![0]],
        vec![OrderStatus::Pending, OrderStatus::Executed],
    ));
    let coordinator = SwapCoordinator::new(network.clone(), config());

    let outcome = coordinator
        .swap(&intent(), &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SwapOutcome::Completed {
            status: OrderStatus::Executed,
            revealed: vec![0],
        }
    );
    assert_eq!(network.reveal_log(), vec![0]);
    assert_eq!(network.ready_calls.load(Ordering::SeqCst), 2);
    assert_eq!(network.status_calls.load(Ordering::SeqCst), 2);
}

/// Scenario B: three secrets become ready one at a time across polls 1, 3
/// and 5, in readiness order rather than numeric order. Poll 2 re-reports a
/// leaf that was already revealed, which must not be re-submitted.
#[tokio::test(start_paused = true)]
async fn multi_fill_reveals_each_leaf_once_in_readiness_order() {
    init_tracing();

    let network = Arc::new(ScriptedNetwork::new(
        3,
        vec![vec![1], vec![1], vec![0], vec![], vec![2]],
        vec![
            OrderStatus::Pending,
            OrderStatus::Pending,
            OrderStatus::Pending,
            OrderStatus::Pending,
            OrderStatus::Executed,
        ],
    ));
    let coordinator = SwapCoordinator::new(network.clone(), config());

    let mut order = coordinator.place_order(&intent()).await.unwrap();
    assert_eq!(order.secrets_count(), 3);

    let outcome = coordinator.settle(&mut order, &CancelFlag::new()).await;

    assert_eq!(
        outcome,
        SwapOutcome::Completed {
            status: OrderStatus::Executed,
            revealed: vec![0, 1, 2],
        }
    );
    // Readiness order, not numeric order, and exactly once per leaf
    assert_eq!(network.reveal_log(), vec![1, 0, 2]);
    assert_eq!(network.status_calls.load(Ordering::SeqCst), 5);
}

/// Scenario C: create fails; the failure is create-phase and no secret ever
/// leaves the coordinator.
#[tokio::test(start_paused = true)]
async fn create_failure_reveals_no_secrets() {
    init_tracing();

    let network = Arc::new(ScriptedNetwork::failing_create(1));
    let coordinator = SwapCoordinator::new(network.clone(), config());

    let err = coordinator
        .swap(&intent(), &CancelFlag::new())
        .await
        .unwrap_err();

    assert_eq!(err.phase(), Phase::Create);
    assert!(!err.order_may_exist());
    assert!(network.reveal_log().is_empty());
    assert_eq!(network.ready_calls.load(Ordering::SeqCst), 0);
    assert_eq!(network.status_calls.load(Ordering::SeqCst), 0);
}

/// Scenario D: the order never reaches a terminal state; the loop returns
/// an inconclusive outcome at the deadline instead of polling forever.
#[tokio::test(start_paused = true)]
async fn stuck_order_is_inconclusive_at_deadline() {
    init_tracing();

    let network = Arc::new(ScriptedNetwork::new(1, Vec::new(), Vec::new()));
    let coordinator = SwapCoordinator::new(
        network.clone(),
        CoordinatorConfig {
            max_poll_secs: 5,
            ..config()
        },
    );

    let outcome = coordinator
        .swap(&intent(), &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SwapOutcome::Inconclusive {
            last_status: Some(OrderStatus::Pending),
            revealed: Vec::new(),
        }
    );
    // 5s deadline at a 1s interval: a handful of polls, then out
    assert!(network.status_calls.load(Ordering::SeqCst) >= 1);
    assert!(network.status_calls.load(Ordering::SeqCst) <= 6);
}

/// Cancellation stops the loop and reports which leaves already went out.
#[tokio::test(start_paused = true)]
async fn cancellation_preserves_reveal_record() {
    init_tracing();

    // First poll reveals leaf 0; the order stays pending
    let network = Arc::new(ScriptedNetwork::new(
        2,
        vec![vec![0]],
        vec![OrderStatus::Pending],
    ));
    let coordinator = SwapCoordinator::new(network.clone(), config());
    let cancel = CancelFlag::new();

    let mut order = coordinator.place_order(&intent()).await.unwrap();

    let loop_handle = {
        let coordinator = coordinator.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { coordinator.settle(&mut order, &cancel).await })
    };

    // Let the first iteration run, then abort
    tokio::time::sleep(tokio::time::Duration::from_millis(1_500)).await;
    cancel.cancel();

    let outcome = loop_handle.await.unwrap();
    assert_eq!(outcome, SwapOutcome::Cancelled { revealed: vec![0] });
    assert_eq!(network.reveal_log(), vec![0]);
}

/// A transient status failure is retried, not surfaced.
#[tokio::test(start_paused = true)]
async fn transient_poll_errors_are_retried() {
    init_tracing();

    struct FlakyStatus {
        inner: ScriptedNetwork,
        fail_first: AtomicU32,
    }

    #[async_trait]
    impl FusionNetwork for FlakyStatus {
        async fn get_quote(&self, intent: &SwapIntent) -> Result<Quote, NetworkError> {
            self.inner.get_quote(intent).await
        }
        async fn create_order(
            &self,
            request: &CreateOrderRequest,
        ) -> Result<BuiltOrder, NetworkError> {
            self.inner.create_order(request).await
        }
        async fn submit_order(
            &self,
            chain_id: u64,
            order: &BuiltOrder,
            secret_hashes: &[SecretHash],
        ) -> Result<(), NetworkError> {
            self.inner.submit_order(chain_id, order, secret_hashes).await
        }
        async fn ready_fills(&self, order_hash: &str) -> Result<Vec<ReadyFill>, NetworkError> {
            self.inner.ready_fills(order_hash).await
        }
        async fn submit_secret(
            &self,
            order_hash: &str,
            secret: &Secret,
        ) -> Result<(), NetworkError> {
            self.inner.submit_secret(order_hash, secret).await
        }
        async fn order_status(&self, order_hash: &str) -> Result<OrderStatus, NetworkError> {
            if self.fail_first.fetch_add(1, Ordering::SeqCst) == 0 {
                return Err(NetworkError::Status {
                    status: 503,
                    url: "https://relayer/orders/v1.0/order/status/0xfeedbeef".to_string(),
                    body: String::new(),
                });
            }
            self.inner.order_status(order_hash).await
        }
        async fn active_orders(
            &self,
            page: u64,
            limit: u64,
        ) -> Result<Vec<ActiveOrder>, NetworkError> {
            self.inner.active_orders(page, limit).await
        }
    }

    let network = Arc::new(FlakyStatus {
        inner: ScriptedNetwork::new(1, vec![vec![0]], vec![OrderStatus::Executed]),
        fail_first: AtomicU32::new(0),
    });
    let coordinator = SwapCoordinator::new(network.clone(), config());

    let outcome = coordinator
        .swap(&intent(), &CancelFlag::new())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        SwapOutcome::Completed {
            status: OrderStatus::Executed,
            revealed: vec![0],
        }
    );
}
