//! In-memory repository used by the interactor tests.

use crate::entity::{
    Investment, InvestmentStatus, NewTransaction, PayError, Profile, Transaction,
    TransactionStatus, UserLimits, Wallet,
};
use crate::interactor::repository::PaymentRepository;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    profiles: Vec<Profile>,
    wallets: HashMap<Uuid, Wallet>,
    transactions: Vec<Transaction>,
    limits: HashMap<Uuid, UserLimits>,
    investments: Vec<Investment>,
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: Mutex<Tables>,
    failing_status: Mutex<Option<TransactionStatus>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.tables.lock().unwrap().transactions.clone()
    }

    pub fn wallet(&self, user_id: Uuid) -> Option<Wallet> {
        self.tables.lock().unwrap().wallets.get(&user_id).cloned()
    }

    pub fn limits(&self, user_id: Uuid) -> Option<UserLimits> {
        self.tables.lock().unwrap().limits.get(&user_id).cloned()
    }

    /// Makes every later status write to `status` return an error
    pub fn fail_status_writes(&self, status: TransactionStatus) {
        *self.failing_status.lock().unwrap() = Some(status);
    }
}

#[async_trait]
impl PaymentRepository for MemoryRepository {
    async fn create_profile(&self, telegram_id: i64, username: Option<String>) -> Result<Profile> {
        let profile = Profile {
            id: Uuid::new_v4(),
            telegram_id,
            username,
            email: None,
            phone: None,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().profiles.push(profile.clone());
        Ok(profile)
    }

    async fn get_profile_by_telegram_id(&self, telegram_id: i64) -> Result<Option<Profile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .profiles
            .iter()
            .find(|p| p.telegram_id == telegram_id)
            .cloned())
    }

    async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn find_profile_by_email(&self, email: &str) -> Result<Option<Profile>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .profiles
            .iter()
            .find(|p| {
                p.email
                    .as_deref()
                    .is_some_and(|e| e.eq_ignore_ascii_case(email))
            })
            .cloned())
    }

    async fn update_profile_contact(
        &self,
        user_id: Uuid,
        email: Option<&str>,
        phone: Option<&str>,
    ) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let profile = tables
            .profiles
            .iter_mut()
            .find(|p| p.id == user_id)
            .ok_or(PayError::ProfileNotFound)?;
        if let Some(email) = email {
            profile.email = Some(email.to_string());
        }
        if let Some(phone) = phone {
            profile.phone = Some(phone.to_string());
        }
        Ok(())
    }

    async fn get_wallet(&self, user_id: Uuid) -> Result<Option<Wallet>> {
        Ok(self.wallet(user_id))
    }

    async fn get_all_wallets(&self) -> Result<Vec<Wallet>> {
        Ok(self.tables.lock().unwrap().wallets.values().cloned().collect())
    }

    async fn create_wallet(
        &self,
        user_id: Uuid,
        address: &str,
        encrypted_mnemonic: &str,
    ) -> Result<Wallet> {
        let now = Utc::now();
        let wallet = Wallet {
            user_id,
            algorand_address: address.to_string(),
            encrypted_mnemonic: encrypted_mnemonic.to_string(),
            balance: 0.0,
            created_at: now,
            updated_at: now,
        };
        self.tables
            .lock()
            .unwrap()
            .wallets
            .insert(user_id, wallet.clone());
        Ok(wallet)
    }

    async fn set_wallet_balance(&self, user_id: Uuid, balance: f64) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let wallet = tables
            .wallets
            .get_mut(&user_id)
            .ok_or(PayError::WalletNotFound)?;
        wallet.balance = balance;
        Ok(())
    }

    async fn adjust_wallet_balance(&self, user_id: Uuid, delta: f64) -> Result<f64> {
        let mut tables = self.tables.lock().unwrap();
        let wallet = tables
            .wallets
            .get_mut(&user_id)
            .ok_or(PayError::WalletNotFound)?;
        wallet.balance += delta;
        Ok(wallet.balance)
    }

    async fn insert_transaction(&self, tx: &NewTransaction) -> Result<Transaction> {
        let transaction = Transaction {
            id: Uuid::new_v4(),
            user_id: tx.user_id,
            tx_type: tx.tx_type,
            amount: tx.amount,
            currency: tx.currency.clone(),
            channel: tx.channel,
            to_address: tx.to_address.clone(),
            from_address: tx.from_address.clone(),
            algorand_tx_id: tx.algorand_tx_id.clone(),
            status: tx.status,
            metadata: tx.metadata.clone(),
            created_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .transactions
            .push(transaction.clone());
        Ok(transaction)
    }

    async fn update_transaction_status(
        &self,
        id: Uuid,
        status: TransactionStatus,
        algorand_tx_id: Option<&str>,
    ) -> Result<()> {
        if *self.failing_status.lock().unwrap() == Some(status) {
            return Err(anyhow!("status write to {} rejected", status));
        }
        let mut tables = self.tables.lock().unwrap();
        if let Some(tx) = tables.transactions.iter_mut().find(|t| t.id == id) {
            tx.status = status;
            if let Some(tx_id) = algorand_tx_id {
                tx.algorand_tx_id = Some(tx_id.to_string());
            }
        }
        Ok(())
    }

    async fn get_user_transactions(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == user_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn get_user_limits(&self, user_id: Uuid) -> Result<Option<UserLimits>> {
        Ok(self.limits(user_id))
    }

    async fn save_user_limits(&self, limits: &UserLimits) -> Result<()> {
        self.tables
            .lock()
            .unwrap()
            .limits
            .insert(limits.user_id, limits.clone());
        Ok(())
    }

    async fn create_investment(
        &self,
        user_id: Uuid,
        amount: f64,
        apy_rate: f64,
    ) -> Result<Investment> {
        let investment = Investment {
            id: Uuid::new_v4(),
            user_id,
            amount_invested: amount,
            apy_rate,
            start_date: Utc::now(),
            current_value: amount,
            status: InvestmentStatus::Active,
        };
        self.tables
            .lock()
            .unwrap()
            .investments
            .push(investment.clone());
        Ok(investment)
    }

    async fn get_investment(&self, id: Uuid) -> Result<Option<Investment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.investments.iter().find(|i| i.id == id).cloned())
    }

    async fn get_user_investments(
        &self,
        user_id: Uuid,
        status: InvestmentStatus,
    ) -> Result<Vec<Investment>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .investments
            .iter()
            .filter(|i| i.user_id == user_id && i.status == status)
            .cloned()
            .collect())
    }

    async fn update_investment(
        &self,
        id: Uuid,
        current_value: f64,
        status: InvestmentStatus,
    ) -> Result<()> {
        let mut tables = self.tables.lock().unwrap();
        let investment = tables
            .investments
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(PayError::InvestmentNotFound)?;
        investment.current_value = current_value;
        investment.status = status;
        Ok(())
    }
}
