use crate::entity::{
    Investment, InvestmentStatus, NewTransaction, Profile, Transaction, TransactionStatus,
    PayError, UserLimits, Wallet,
};
use crate::interactor::db;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Storage the interactors run against
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn create_profile(&self, telegram_id: i64, username: Option<String>) -> Result<Profile>;
    async fn get_profile_by_telegram_id(&self, telegram_id: i64) -> Result<Option<Profile>>;
    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>>;
    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>>;
    async fn update_profile_contact(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<()>;

    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>>;
    async fn get_all_wallets(&self) -> Result<Vec<Wallet>>;
    async fn create_wallet(
        &self,
        user_id: Uuid,
        address: &str,
        encrypted_mnemonic: &str,
    ) -> Result<Wallet>;
    async fn set_wallet_balance(&self, user_id: Uuid, balance: f64) -> Result<()>;
    async fn adjust_wallet_balance(&self, user_id: Uuid, delta: f64) -> Result<f64>;

    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction>;
    async fn update_transaction_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        algorand_tx_id: Option<&str>,
    ) -> Result<()>;
    async fn get_user_transactions(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>>;

    async fn get_user_limits(&self, user_id: Uuid) -> Result<Option<UserLimits>>;
    async fn save_user_limits(&self, limits: &UserLimits) -> Result<()>;

    async fn create_investment(&self, user_id: Uuid, amount: f64, apy_rate: f64)
        -> Result<Investment>;
    async fn get_investment(&self, id: Uuid) -> Result<Option<Investment>>;
    async fn get_user_investments(
        &self,
        user_id: Uuid,
        status: InvestmentStatus,
    ) -> Result<Vec<Investment>>;
    async fn update_investment(
        &self,
        id: Uuid,
        current_value: f64,
        status: InvestmentStatus,
    ) -> Result<()>;
}

/// Postgres-backed repository
pub struct PgRepository {
    db_pool: Arc<PgPool>,
}

impl PgRepository {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PgRepository {
    async fn create_profile(&self, telegram_id: i64, username: Option<String>) -> Result<Profile> {
        db::create_profile(&self.db_pool, telegram_id, username)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn get_profile_by_telegram_id(&self, telegram_id: i64) -> Result<Option<Profile>> {
        db::get_profile_by_telegram_id(&self.db_pool, telegram_id)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        db::get_profile(&self.db_pool, user_id)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        db::find_profile_by_email(&self.db_pool, email)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn update_profile_contact(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<()> {
        db::update_profile_contact(&self.db_pool, user_id, email, phone)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>> {
        db::get_wallet(&self.db_pool, user_id)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn get_all_wallets(&self) -> Result<Vec<Wallet>> {
        db::get_all_wallets(&self.db_pool)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn create_wallet(
        &self,
        user_id: Uuid,
        address: &str,
        encrypted_mnemonic: &str,
    ) -> Result<Wallet> {
        db::create_wallet(&self.db_pool, user_id, address, encrypted_mnemonic)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn set_wallet_balance(&self, user_id: Uuid, balance: f64) -> Result<()> {
        db::set_wallet_balance(&self.db_pool, user_id, balance)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn adjust_wallet_balance(&self, user_id: Uuid, delta: f64) -> Result<f64> {
        db::adjust_wallet_balance(&self.db_pool, user_id, delta)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        db::insert_transaction(&self.db_pool, tx)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn update_transaction_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        algorand_tx_id: Option<&str>,
    ) -> Result<()> {
        db::update_transaction_status(&self.db_pool, id, status, algorand_tx_id)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn get_user_transactions(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>> {
        db::get_user_transactions(&self.db_pool, user_id, limit)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn get_user_limits(&self, user_id: Uuid) -> Result<Option<UserLimits>> {
        db::get_user_limits(&self.db_pool, user_id)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn save_user_limits(&self, limits: &UserLimits) -> Result<()> {
        db::save_user_limits(&self.db_pool, limits)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn create_investment(
        &self,
        user_id: Uuid,
        amount: f64,
        apy_rate: f64,
    ) -> Result<Investment> {
        db::create_investment(&self.db_pool, user_id, amount, apy_rate)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn get_investment(&self, id: Uuid) -> Result<Option<Investment>> {
        db::get_investment(&self.db_pool, id)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn get_user_investments(
        &self,
        user_id: Uuid,
        status: InvestmentStatus,
    ) -> Result<Vec<Investment>> {
        db::get_user_investments(&self.db_pool, user_id, status)
            .await
            .map_err(|e| PayError::Database(e).into())
    }

    async fn update_investment(
        &self,
        id: Uuid,
        current_value: f64,
        status: InvestmentStatus,
    ) -> Result<()> {
        db::update_investment(&self.db_pool, id, current_value, status)
            .await
            .map_err(|e| PayError::Database(e).into())
    }
}
