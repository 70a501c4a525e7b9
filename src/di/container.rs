use std::sync::Arc;

use sqlx::PgPool;

use crate::algorand::{AlgodClient, ChainClient, DispenserFaucet, Faucet};
use crate::config::AppConfig;
use crate::interactor::investment_interactor::{InvestmentInteractor, InvestmentInteractorImpl};
use crate::interactor::limit_interactor::{LimitInteractor, LimitInteractorImpl};
use crate::interactor::payment_interactor::{PaymentInteractor, PaymentInteractorImpl};
use crate::interactor::profile_interactor::{ProfileInteractor, ProfileInteractorImpl};
use crate::interactor::repository::{PaymentRepository, PgRepository};
use crate::interactor::wallet_interactor::{WalletInteractor, WalletInteractorImpl};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Core services
    repository: Arc<dyn PaymentRepository>,

    // Algorand
    chain_client: Arc<dyn ChainClient>,

    // Interactors
    profiles: Arc<dyn ProfileInteractor>,
    wallets: Arc<dyn WalletInteractor>,
    limits: Arc<dyn LimitInteractor>,
    payments: Arc<dyn PaymentInteractor>,
    investments: Arc<dyn InvestmentInteractor>,

    // Configuration
    config: AppConfig,
}

impl ServiceContainer {
    /// Create a new service container with essential dependencies
    pub fn new(db_pool: Arc<PgPool>, algod_client: AlgodClient, config: AppConfig) -> Self {
        let repository =
            Arc::new(PgRepository::new(db_pool)) as Arc<dyn PaymentRepository>;
        let chain_client = Arc::new(algod_client) as Arc<dyn ChainClient>;
        let faucet = Arc::new(DispenserFaucet::new(
            &config.faucet_url,
            config.faucet_token.clone(),
        )) as Arc<dyn Faucet>;

        // Interactors share the repository and chain client
        let profiles = Arc::new(ProfileInteractorImpl::new(repository.clone()));
        let wallets = Arc::new(WalletInteractorImpl::new(
            repository.clone(),
            chain_client.clone(),
            faucet,
            config.faucet_amount,
        ));
        let limits: Arc<dyn LimitInteractor> = Arc::new(LimitInteractorImpl::new(
            repository.clone(),
            config.limits.clone(),
        ));
        let payments = Arc::new(PaymentInteractorImpl::new(
            repository.clone(),
            chain_client.clone(),
            limits.clone(),
            config.simulation.clone(),
        ));
        let investments = Arc::new(InvestmentInteractorImpl::new(
            repository.clone(),
            config.apy_rate,
        ));

        Self {
            repository,
            chain_client,
            profiles,
            wallets,
            limits,
            payments,
            investments,
            config,
        }
    }

    // Accessor methods

    pub fn repository(&self) -> Arc<dyn PaymentRepository> {
        self.repository.clone()
    }

    pub fn chain_client(&self) -> Arc<dyn ChainClient> {
        self.chain_client.clone()
    }

    pub fn profiles(&self) -> Arc<dyn ProfileInteractor> {
        self.profiles.clone()
    }

    pub fn wallets(&self) -> Arc<dyn WalletInteractor> {
        self.wallets.clone()
    }

    pub fn limits(&self) -> Arc<dyn LimitInteractor> {
        self.limits.clone()
    }

    pub fn payments(&self) -> Arc<dyn PaymentInteractor> {
        self.payments.clone()
    }

    pub fn investments(&self) -> Arc<dyn InvestmentInteractor> {
        self.investments.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
