use crate::algorand::utils::{algos_to_microalgos, microalgos_to_algos};
use crate::entity::PayError;
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// TestNet dispenser
#[async_trait]
pub trait Faucet: Send + Sync {
    /// Request `amount` ALGO for `receiver`. Returns (tx id, ALGO received).
    async fn fund(&self, receiver: &str, amount: f64) -> Result<(String, f64)>;
}

#[derive(Serialize)]
struct FundRequest<'a> {
    receiver: &'a str,
    amount: u64,
}

#[derive(Deserialize)]
struct FundResponse {
    #[serde(rename = "txID")]
    tx_id: String,
    amount: u64,
}

pub struct DispenserFaucet {
    http_client: Client,
    url: String,
    token: Option<String>,
}

impl DispenserFaucet {
    pub fn new(url: &str, token: Option<String>) -> Self {
        Self {
            http_client: Client::new(),
            url: url.to_string(),
            token: token.filter(|t| !t.is_empty()),
        }
    }
}

#[async_trait]
impl Faucet for DispenserFaucet {
    async fn fund(&self, receiver: &str, amount: f64) -> Result<(String, f64)> {
        let mut request = self.http_client.post(&self.url).json(&FundRequest {
            receiver,
            amount: algos_to_microalgos(amount),
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| PayError::Faucet(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PayError::Faucet(format!("{}: {}", status.as_u16(), body)).into());
        }

        let funded: FundResponse = response
            .json()
            .await
            .map_err(|e| PayError::Faucet(format!("Unexpected response: {}", e)))?;
        info!("Faucet funded {} with {} microalgos", receiver, funded.amount);

        Ok((funded.tx_id, microalgos_to_algos(funded.amount)))
    }
}
