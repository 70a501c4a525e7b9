//! Scripted chain client for tests.

use crate::algorand::client::ChainClient;
use crate::algorand::transaction::SuggestedParams;
use crate::entity::PayError;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeChainClient {
    balances: Mutex<HashMap<String, u64>>,
    submitted: Mutex<Vec<Vec<u8>>>,
    reject_submit: bool,
    stall_balances: bool,
}

impl FakeChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rejecting_submissions() -> Self {
        Self {
            reject_submit: true,
            ..Self::default()
        }
    }

    /// Balance lookups never resolve
    pub fn stalled() -> Self {
        Self {
            stall_balances: true,
            ..Self::default()
        }
    }

    pub fn set_balance(&self, address: &str, microalgos: u64) {
        self.balances
            .lock()
            .unwrap()
            .insert(address.to_string(), microalgos);
    }

    pub fn submitted_count(&self) -> usize {
        self.submitted.lock().unwrap().len()
    }
}

#[async_trait]
impl ChainClient for FakeChainClient {
    async fn account_balance(&self, address: &str) -> Result<u64> {
        if self.stall_balances {
            std::future::pending::<()>().await;
        }
        Ok(self
            .balances
            .lock()
            .unwrap()
            .get(address)
            .copied()
            .unwrap_or(0))
    }

    async fn suggested_params(&self) -> Result<SuggestedParams> {
        Ok(SuggestedParams {
            fee: 0,
            min_fee: 1000,
            last_round: 1_000,
            genesis_id: "testnet-v1.0".to_string(),
            genesis_hash: "SGO1GKSzyE7IEPItTxCByw9x8FmnrCDexi9/cOUJOiI=".to_string(),
        })
    }

    async fn submit_transaction(&self, signed: &[u8]) -> Result<String> {
        if self.reject_submit {
            return Err(PayError::AlgodClient("400: overspend".to_string()).into());
        }
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(signed.to_vec());
        Ok(format!("FAKETX{}", submitted.len()))
    }

    async fn wait_for_confirmation(&self, _tx_id: &str) -> Result<u64> {
        Ok(1_001)
    }
}
