use crate::algorand::{self, wallet as algo_wallet, ChainClient, Faucet};
use crate::entity::{PayError, Wallet};
use crate::interactor::repository::PaymentRepository;
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait WalletInteractor: Send + Sync {
    async fn get_or_create_wallet(&self, user_id: Uuid) -> Result<(Wallet, bool)>;
    async fn get_wallet(&self, user_id: Uuid) -> Result<Wallet>;
    /// Fetch the chain balance and store it as the cached balance
    async fn refresh_balance(&self, user_id: Uuid) -> Result<f64>;
    async fn reveal_mnemonic(&self, user_id: Uuid) -> Result<String>;
    async fn fund_from_faucet(&self, user_id: Uuid) -> Result<(String, f64)>;
}

pub struct WalletInteractorImpl {
    repository: Arc<dyn PaymentRepository>,
    chain_client: Arc<dyn ChainClient>,
    faucet: Arc<dyn Faucet>,
    faucet_amount: f64,
}

impl WalletInteractorImpl {
    pub fn new(
        repository: Arc<dyn PaymentRepository>,
        chain_client: Arc<dyn ChainClient>,
        faucet: Arc<dyn Faucet>,
        faucet_amount: f64,
    ) -> Self {
        Self {
            repository,
            chain_client,
            faucet,
            faucet_amount,
        }
    }
}

#[async_trait]
impl WalletInteractor for WalletInteractorImpl {
    async fn get_or_create_wallet(&self, user_id: Uuid) -> Result<(Wallet, bool)> {
        if let Some(wallet) = self.repository.get_wallet(user_id).await? {
            return Ok((wallet, false));
        }

        // Generate new wallet
        let (mnemonic, address) = algorand::generate_wallet()
            .map_err(|e| PayError::WalletCreationError(e.to_string()))?;

        let wallet = self
            .repository
            .create_wallet(user_id, &address, &algo_wallet::obfuscate_mnemonic(&mnemonic))
            .await?;
        info!("Created Algorand wallet {} for user {}", address, user_id);

        Ok((wallet, true))
    }

    async fn get_wallet(&self, user_id: Uuid) -> Result<Wallet> {
        self.repository
            .get_wallet(user_id)
            .await?
            .ok_or_else(|| PayError::WalletNotFound.into())
    }

    async fn refresh_balance(&self, user_id: Uuid) -> Result<f64> {
        let wallet = self.get_wallet(user_id).await?;

        let balance =
            algorand::get_algo_balance(self.chain_client.as_ref(), &wallet.algorand_address)
                .await?;
        self.repository.set_wallet_balance(user_id, balance).await?;

        Ok(balance)
    }

    async fn reveal_mnemonic(&self, user_id: Uuid) -> Result<String> {
        let wallet = self.get_wallet(user_id).await?;
        algo_wallet::reveal_mnemonic(&wallet.encrypted_mnemonic)
    }

    async fn fund_from_faucet(&self, user_id: Uuid) -> Result<(String, f64)> {
        let wallet = self.get_wallet(user_id).await?;
        self.faucet
            .fund(&wallet.algorand_address, self.faucet_amount)
            .await
    }
}
