use crate::algorand::transaction::SuggestedParams;
use crate::entity::PayError;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use std::time::Duration;

const API_TOKEN_HEADER: &str = "X-Algo-API-Token";

/// Operations the payment flow needs from an Algorand node
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Account balance in microalgos
    async fn account_balance(&self, address: &str) -> Result<u64>;

    async fn suggested_params(&self) -> Result<SuggestedParams>;

    /// Submit signed msgpack bytes, returning the transaction id
    async fn submit_transaction(&self, signed: &[u8]) -> Result<String>;

    /// Poll until the transaction is in a block, returning the confirmed round
    async fn wait_for_confirmation(&self, tx_id: &str) -> Result<u64>;
}

#[derive(Deserialize)]
struct AccountResponse {
    amount: u64,
}

#[derive(Deserialize)]
struct SubmitResponse {
    #[serde(rename = "txId")]
    tx_id: String,
}

#[derive(Deserialize)]
struct PendingResponse {
    #[serde(rename = "confirmed-round", default)]
    confirmed_round: Option<u64>,
    #[serde(rename = "pool-error", default)]
    pool_error: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// algod v2 REST client
pub struct AlgodClient {
    http_client: Client,
    base_url: String,
    api_token: Option<String>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl AlgodClient {
    pub fn new(base_url: &str, api_token: Option<String>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.filter(|t| !t.is_empty()),
            poll_interval: Duration::from_millis(1000),
            max_attempts: 10,
        }
    }

    pub fn with_polling(mut self, poll_interval: Duration, max_attempts: u32) -> Self {
        self.poll_interval = poll_interval;
        self.max_attempts = max_attempts;
        self
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_token {
            Some(token) => request.header(API_TOKEN_HEADER, token),
            None => request,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .authorize(self.http_client.get(&url))
            .send()
            .await
            .map_err(|e| PayError::AlgodClient(format!("Request to {} failed: {}", path, e)))?;

        Self::parse_response(response).await
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(ErrorResponse { message }) => message,
                Err(_) => status.to_string(),
            };
            return Err(PayError::AlgodClient(format!("{}: {}", status.as_u16(), message)).into());
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PayError::AlgodClient(format!("JSON deserialization error: {}", e)).into())
    }
}

#[async_trait]
impl ChainClient for AlgodClient {
    async fn account_balance(&self, address: &str) -> Result<u64> {
        let account: AccountResponse = self
            .get_json(&format!("/v2/accounts/{}?exclude=all", address))
            .await?;
        Ok(account.amount)
    }

    async fn suggested_params(&self) -> Result<SuggestedParams> {
        self.get_json("/v2/transactions/params").await
    }

    async fn submit_transaction(&self, signed: &[u8]) -> Result<String> {
        let url = format!("{}/v2/transactions", self.base_url);

        let response = self
            .authorize(self.http_client.post(&url))
            .header(reqwest::header::CONTENT_TYPE, "application/x-binary")
            .body(signed.to_vec())
            .send()
            .await
            .map_err(|e| PayError::AlgodClient(format!("Failed to submit transaction: {}", e)))?;

        let submitted: SubmitResponse = Self::parse_response(response).await?;
        info!("Submitted transaction {}", submitted.tx_id);

        Ok(submitted.tx_id)
    }

    async fn wait_for_confirmation(&self, tx_id: &str) -> Result<u64> {
        let path = format!("/v2/transactions/pending/{}", tx_id);

        for attempt in 1..=self.max_attempts {
            match self.get_json::<PendingResponse>(&path).await {
                Ok(pending) => {
                    if let Some(round) = pending.confirmed_round.filter(|r| *r > 0) {
                        info!("Transaction {} confirmed in round {}", tx_id, round);
                        return Ok(round);
                    }
                    if !pending.pool_error.is_empty() {
                        return Err(PayError::AlgodClient(format!(
                            "Transaction rejected: {}",
                            pending.pool_error
                        ))
                        .into());
                    }
                }
                // The node may not know the transaction yet right after submit
                Err(e) => match e.downcast_ref::<PayError>() {
                    Some(PayError::AlgodClient(msg))
                        if msg.starts_with(&StatusCode::NOT_FOUND.as_u16().to_string()) => {}
                    _ => return Err(e),
                },
            }

            debug!("Transaction {} pending (attempt {})", tx_id, attempt);
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(anyhow!(
            "Transaction {} not confirmed after {} attempts",
            tx_id,
            self.max_attempts
        ))
    }
}
