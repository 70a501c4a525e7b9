use crate::algorand::{self, wallet as algo_wallet, ChainClient};
use crate::config::SimulationSettings;
use crate::entity::{
    Channel, NewTransaction, PayError, Transaction, TransactionStatus, TransactionType, Wallet,
};
use crate::interactor::limit_interactor::LimitInteractor;
use crate::interactor::repository::PaymentRepository;
use crate::utils::{is_valid_algorand_address, is_valid_email};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use log::{error, info, warn};
use rand::Rng;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub user_id: Uuid,
    pub amount: f64,
    /// Algorand address, or the recipient's email for the simulated rails
    pub recipient: String,
    pub channel: Channel,
    pub currency: String,
    pub note: Option<String>,
}

impl PaymentRequest {
    pub fn new(user_id: Uuid, amount: f64, recipient: &str, channel: Channel) -> Self {
        let currency = match channel {
            Channel::Algorand => "ALGO",
            Channel::MobileMoney | Channel::Bank => "USD",
        };
        Self {
            user_id,
            amount,
            recipient: recipient.trim().to_string(),
            channel,
            currency: currency.to_string(),
            note: None,
        }
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }
}

#[derive(Debug, Clone)]
pub struct PaymentReceipt {
    pub transaction_id: Uuid,
    pub amount: f64,
    pub currency: String,
    pub channel: Channel,
    pub recipient: String,
    /// Algorand tx id or the synthetic reference of a simulated rail
    pub external_id: String,
    /// Telegram id of a registered recipient, for notifying them
    pub recipient_telegram_id: Option<i64>,
}

// What a channel handler reports on success
struct ChannelOutcome {
    external_id: String,
    recipient_telegram_id: Option<i64>,
}

#[async_trait]
pub trait PaymentInteractor: Send + Sync {
    async fn send_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt>;
    async fn get_history(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>>;
}

pub struct PaymentInteractorImpl {
    repository: Arc<dyn PaymentRepository>,
    chain_client: Arc<dyn ChainClient>,
    limits: Arc<dyn LimitInteractor>,
    simulation: SimulationSettings,
}

impl PaymentInteractorImpl {
    pub fn new(
        repository: Arc<dyn PaymentRepository>,
        chain_client: Arc<dyn ChainClient>,
        limits: Arc<dyn LimitInteractor>,
        simulation: SimulationSettings,
    ) -> Self {
        Self {
            repository,
            chain_client,
            limits,
            simulation,
        }
    }

    fn validate_recipient(channel: Channel, recipient: &str) -> Result<()> {
        match channel {
            Channel::Algorand if !is_valid_algorand_address(recipient) => {
                Err(PayError::InvalidAddress.into())
            }
            Channel::MobileMoney | Channel::Bank if !is_valid_email(recipient) => {
                Err(PayError::InvalidEmail.into())
            }
            _ => Ok(()),
        }
    }

    async fn send_on_chain(
        &self,
        wallet: &Wallet,
        request: &PaymentRequest,
    ) -> Result<ChannelOutcome> {
        let chain_balance =
            algorand::get_algo_balance(self.chain_client.as_ref(), &wallet.algorand_address)
                .await?;
        if chain_balance < request.amount {
            return Err(PayError::InsufficientFunds.into());
        }

        let mnemonic = algo_wallet::reveal_mnemonic(&wallet.encrypted_mnemonic)?;
        let (signing_key, address) = algorand::account_from_mnemonic(&mnemonic)?;
        if address != wallet.algorand_address {
            return Err(anyhow!("Stored mnemonic does not match wallet address"));
        }

        let tx_id = algorand::send_algo(
            self.chain_client.as_ref(),
            &signing_key,
            &request.recipient,
            request.amount,
            request.note.as_deref(),
        )
        .await?;

        self.repository
            .adjust_wallet_balance(request.user_id, -request.amount)
            .await?;

        Ok(ChannelOutcome {
            external_id: tx_id,
            recipient_telegram_id: None,
        })
    }

    async fn send_simulated(
        &self,
        wallet: &Wallet,
        request: &PaymentRequest,
    ) -> Result<ChannelOutcome> {
        let settings = &self.simulation;
        let (min, max, failure_rate, prefix) = match request.channel {
            Channel::MobileMoney => (
                settings.mobile_money_min,
                settings.mobile_money_max,
                settings.mobile_money_failure_rate,
                "MM",
            ),
            Channel::Bank => (
                settings.bank_min,
                settings.bank_max,
                settings.bank_failure_rate,
                "BANK",
            ),
            Channel::Algorand => return Err(anyhow!("Algorand is not a simulated channel")),
        };

        if request.amount < min || request.amount > max {
            return Err(PayError::AmountOutOfRange { min, max }.into());
        }

        let recipient = self
            .repository
            .find_profile_by_email(&request.recipient)
            .await?
            .ok_or(PayError::RecipientNotFound)?;
        if recipient.id == request.user_id {
            return Err(anyhow!("Cannot send money to yourself"));
        }
        let recipient_wallet = self
            .repository
            .get_wallet(recipient.id)
            .await?
            .ok_or(PayError::RecipientNotFound)?;

        if wallet.balance < request.amount {
            return Err(PayError::InsufficientFunds.into());
        }

        let (delay_ms, failed) = {
            let mut rng = rand::rng();
            let low = settings.min_delay_ms.min(settings.max_delay_ms);
            (
                rng.random_range(low..=settings.max_delay_ms),
                rng.random_bool(failure_rate.clamp(0.0, 1.0)),
            )
        };
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        if failed {
            return Err(PayError::ChannelFailure(request.channel).into());
        }

        let reference = format!(
            "{}-{}",
            prefix,
            &Uuid::new_v4().simple().to_string()[..12].to_uppercase()
        );

        self.repository
            .adjust_wallet_balance(request.user_id, -request.amount)
            .await?;
        self.repository
            .insert_transaction(&NewTransaction {
                user_id: recipient.id,
                tx_type: TransactionType::Receive,
                amount: request.amount,
                currency: request.currency.clone(),
                channel: request.channel,
                to_address: Some(recipient_wallet.algorand_address.clone()),
                from_address: Some(wallet.algorand_address.clone()),
                algorand_tx_id: Some(reference.clone()),
                status: TransactionStatus::Completed,
                metadata: Some(json!({ "sender_id": request.user_id, "reference": reference })),
            })
            .await?;
        self.repository
            .adjust_wallet_balance(recipient.id, request.amount)
            .await?;

        Ok(ChannelOutcome {
            external_id: reference,
            recipient_telegram_id: Some(recipient.telegram_id),
        })
    }
}

#[async_trait]
impl PaymentInteractor for PaymentInteractorImpl {
    async fn send_payment(&self, request: PaymentRequest) -> Result<PaymentReceipt> {
        if !request.amount.is_finite() || request.amount <= 0.0 {
            return Err(PayError::InvalidAmount.into());
        }

        let check = self
            .limits
            .check_daily_limits(request.user_id, request.amount)
            .await?;
        if !check.can_send {
            return Err(PayError::DailyLimitExceeded {
                remaining: check.remaining,
            }
            .into());
        }

        Self::validate_recipient(request.channel, &request.recipient)?;

        let wallet = self
            .repository
            .get_wallet(request.user_id)
            .await?
            .ok_or(PayError::WalletNotFound)?;

        let pending = self
            .repository
            .insert_transaction(&NewTransaction {
                user_id: request.user_id,
                tx_type: TransactionType::Send,
                amount: request.amount,
                currency: request.currency.clone(),
                channel: request.channel,
                to_address: Some(request.recipient.clone()),
                from_address: Some(wallet.algorand_address.clone()),
                algorand_tx_id: None,
                status: TransactionStatus::Pending,
                metadata: request.note.as_ref().map(|note| json!({ "note": note })),
            })
            .await?;
        info!(
            "Payment {} pending: {} {} to {} via {}",
            pending.id,
            request.amount,
            request.currency,
            request.recipient,
            request.channel.as_str()
        );

        let outcome = match request.channel {
            Channel::Algorand => self.send_on_chain(&wallet, &request).await,
            Channel::MobileMoney | Channel::Bank => self.send_simulated(&wallet, &request).await,
        };

        match outcome {
            Ok(outcome) => {
                if let Err(e) = self
                    .repository
                    .update_transaction_status(
                        pending.id,
                        TransactionStatus::Completed,
                        Some(&outcome.external_id),
                    )
                    .await
                {
                    error!(
                        "Payment {} went through ({}) but could not be marked completed: {}",
                        pending.id, outcome.external_id, e
                    );
                    if let Err(db_err) = self
                        .repository
                        .update_transaction_status(
                            pending.id,
                            TransactionStatus::Failed,
                            Some(&outcome.external_id),
                        )
                        .await
                    {
                        error!("Failed to mark payment {} as failed: {}", pending.id, db_err);
                    }
                    return Err(e);
                }
                if let Err(e) = self
                    .limits
                    .update_daily_spent(request.user_id, request.amount)
                    .await
                {
                    error!("Failed to update daily spent for {}: {}", request.user_id, e);
                }
                info!("Payment {} completed ({})", pending.id, outcome.external_id);

                Ok(PaymentReceipt {
                    transaction_id: pending.id,
                    amount: request.amount,
                    currency: request.currency,
                    channel: request.channel,
                    recipient: request.recipient,
                    external_id: outcome.external_id,
                    recipient_telegram_id: outcome.recipient_telegram_id,
                })
            }
            Err(e) => {
                warn!("Payment {} failed: {}", pending.id, e);
                if let Err(db_err) = self
                    .repository
                    .update_transaction_status(pending.id, TransactionStatus::Failed, None)
                    .await
                {
                    error!("Failed to mark payment {} as failed: {}", pending.id, db_err);
                }
                Err(e)
            }
        }
    }

    async fn get_history(&self, user_id: Uuid, limit: i64) -> Result<Vec<Transaction>> {
        self.repository.get_user_transactions(user_id, limit).await
    }
}
