//! HTTP implementation of the relayer API

use super::{CreateOrderRequest, FusionNetwork};
use crate::commit::{Secret, SecretHash};
use crate::config::NetworkConfig;
use crate::error::NetworkError;
use crate::types::{ActiveOrder, BuiltOrder, OrderStatus, Quote, ReadyFill, SwapIntent};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for a Fusion-style relayer's REST API.
///
/// Quote and order packaging live under the quoter service, publication and
/// secret reveal under the relayer service, and order inspection under the
/// orders service; all share one base URL and bearer token.
pub struct HttpFusionClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ReadyFillsResponse {
    #[serde(default)]
    fills: Vec<ReadyFill>,
}

#[derive(Deserialize)]
struct OrderStatusResponse {
    status: OrderStatus,
}

#[derive(Deserialize)]
struct ActiveOrdersResponse {
    #[serde(default)]
    items: Vec<ActiveOrder>,
}

impl HttpFusionClient {
    /// Create a client from network settings
    pub fn new(config: &NetworkConfig) -> Result<Self, NetworkError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if config.auth_key.is_empty() {
            warn!("No relayer auth key configured - API calls will likely fail");
        } else {
            let bearer = format!("Bearer {}", config.auth_key);
            let mut value = HeaderValue::from_str(&bearer)
                .map_err(|e| NetworkError::Decode(format!("invalid auth key: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, NetworkError> {
        let url = self.url(path);
        debug!(%url, "relayer GET");
        let response = self.client.get(&url).send().await?;
        Self::decode(url, response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, NetworkError> {
        let url = self.url(path);
        debug!(%url, "relayer POST");
        let response = self.client.post(&url).json(body).send().await?;
        Self::decode(url, response).await
    }

    async fn decode<T: DeserializeOwned>(
        url: String,
        response: reqwest::Response,
    ) -> Result<T, NetworkError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, status = status.as_u16(), "relayer request rejected");
            return Err(NetworkError::Status {
                status: status.as_u16(),
                url,
                body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            NetworkError::Decode(format!("{} from {}", e, url))
        })
    }
}

#[async_trait]
impl FusionNetwork for HttpFusionClient {
    async fn get_quote(&self, intent: &SwapIntent) -> Result<Quote, NetworkError> {
        let body = serde_json::to_value(intent)
            .map_err(|e| NetworkError::Decode(e.to_string()))?;
        self.post_json("/quoter/v1.0/quote/receive", &body).await
    }

    async fn create_order(&self, request: &CreateOrderRequest) -> Result<BuiltOrder, NetworkError> {
        let body = json!({
            "quoteId": request.quote_id,
            "walletAddress": request.wallet_address,
            "hashLock": request.hashlock.to_hex(),
            "preset": request.preset,
            "secretHashes": hex_hashes(&request.secret_hashes),
            "source": request.source_tag,
        });
        self.post_json("/quoter/v1.0/quote/build", &body).await
    }

    async fn submit_order(
        &self,
        chain_id: u64,
        order: &BuiltOrder,
        secret_hashes: &[SecretHash],
    ) -> Result<(), NetworkError> {
        let body = json!({
            "chainId": chain_id,
            "order": order.order,
            "quoteId": order.quote_id,
            "secretHashes": hex_hashes(secret_hashes),
        });
        let _ack: serde_json::Value = self.post_json("/relayer/v1.0/submit", &body).await?;
        Ok(())
    }

    async fn ready_fills(&self, order_hash: &str) -> Result<Vec<ReadyFill>, NetworkError> {
        let path = format!("/orders/v1.0/order/ready-to-accept-secret-fills/{}", order_hash);
        let response: ReadyFillsResponse = self.get_json(&path).await?;
        Ok(response.fills)
    }

    async fn submit_secret(&self, order_hash: &str, secret: &Secret) -> Result<(), NetworkError> {
        // The secret leaves memory here and nowhere else; it is never logged.
        let body = json!({
            "orderHash": order_hash,
            "secret": secret.to_hex(),
        });
        let _ack: serde_json::Value = self.post_json("/relayer/v1.0/submit/secret", &body).await?;
        debug!(order_hash, "secret submitted");
        Ok(())
    }

    async fn order_status(&self, order_hash: &str) -> Result<OrderStatus, NetworkError> {
        let path = format!("/orders/v1.0/order/status/{}", order_hash);
        let response: OrderStatusResponse = self.get_json(&path).await?;
        Ok(response.status)
    }

    async fn active_orders(
        &self,
        page: u64,
        limit: u64,
    ) -> Result<Vec<ActiveOrder>, NetworkError> {
        let path = format!("/orders/v1.0/order/active?page={}&limit={}", page, limit);
        let response: ActiveOrdersResponse = self.get_json(&path).await?;
        Ok(response.items)
    }
}

fn hex_hashes(hashes: &[SecretHash]) -> Vec<String> {
    hashes.iter().map(|h| h.to_hex()).collect()
}
