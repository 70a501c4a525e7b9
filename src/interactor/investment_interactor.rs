use crate::entity::{Investment, InvestmentStatus, PayError};
use crate::interactor::repository::PaymentRepository;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct InvestmentSummary {
    pub investment: Investment,
    pub days_held: i64,
    pub current_value: f64,
    pub earnings: f64,
}

impl InvestmentSummary {
    fn of(investment: Investment) -> Self {
        let now = Utc::now();
        Self {
            days_held: investment.days_held(now),
            current_value: investment.value_at(now),
            earnings: investment.earnings_at(now),
            investment,
        }
    }
}

#[async_trait]
pub trait InvestmentInteractor: Send + Sync {
    async fn invest(&self, user_id: Uuid, amount: f64) -> Result<Investment>;
    /// Active investments with their value recomputed as of now
    async fn list_investments(&self, user_id: Uuid) -> Result<Vec<InvestmentSummary>>;
    /// Closes the investment and credits its value back to the wallet
    async fn withdraw(&self, user_id: Uuid, investment_id: Uuid) -> Result<InvestmentSummary>;
    fn apy_rate(&self) -> f64;
}

pub struct InvestmentInteractorImpl {
    repository: Arc<dyn PaymentRepository>,
    apy_rate: f64,
}

impl InvestmentInteractorImpl {
    pub fn new(repository: Arc<dyn PaymentRepository>, apy_rate: f64) -> Self {
        Self {
            repository,
            apy_rate,
        }
    }
}

#[async_trait]
impl InvestmentInteractor for InvestmentInteractorImpl {
    async fn invest(&self, user_id: Uuid, amount: f64) -> Result<Investment> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(PayError::InvalidAmount.into());
        }

        let wallet = self
            .repository
            .get_wallet(user_id)
            .await?
            .ok_or(PayError::WalletNotFound)?;
        if wallet.balance < amount {
            return Err(PayError::InsufficientFunds.into());
        }

        self.repository.adjust_wallet_balance(user_id, -amount).await?;
        let investment = self
            .repository
            .create_investment(user_id, amount, self.apy_rate)
            .await?;
        info!(
            "User {} invested {} at {}% APY ({})",
            user_id, amount, self.apy_rate, investment.id
        );

        Ok(investment)
    }

    async fn list_investments(&self, user_id: Uuid) -> Result<Vec<InvestmentSummary>> {
        let investments = self
            .repository
            .get_user_investments(user_id, InvestmentStatus::Active)
            .await?;

        let mut summaries = Vec::with_capacity(investments.len());
        for investment in investments {
            let summary = InvestmentSummary::of(investment);
            if summary.current_value != summary.investment.current_value {
                self.repository
                    .update_investment(
                        summary.investment.id,
                        summary.current_value,
                        InvestmentStatus::Active,
                    )
                    .await?;
            }
            summaries.push(summary);
        }

        Ok(summaries)
    }

    async fn withdraw(&self, user_id: Uuid, investment_id: Uuid) -> Result<InvestmentSummary> {
        let investment = self
            .repository
            .get_investment(investment_id)
            .await?
            .filter(|i| i.user_id == user_id && i.status == InvestmentStatus::Active)
            .ok_or(PayError::InvestmentNotFound)?;

        let mut summary = InvestmentSummary::of(investment);
        self.repository
            .update_investment(
                investment_id,
                summary.current_value,
                InvestmentStatus::Withdrawn,
            )
            .await?;
        self.repository
            .adjust_wallet_balance(user_id, summary.current_value)
            .await?;
        summary.investment.status = InvestmentStatus::Withdrawn;
        summary.investment.current_value = summary.current_value;
        info!(
            "User {} withdrew investment {} worth {}",
            user_id, investment_id, summary.current_value
        );

        Ok(summary)
    }

    fn apy_rate(&self) -> f64 {
        self.apy_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactor::memory_repository::MemoryRepository;

    async fn funded_user(repository: &MemoryRepository, balance: f64) -> Uuid {
        let user_id = Uuid::new_v4();
        repository
            .create_wallet(user_id, "ADDR", "b2JmdXNjYXRlZA==")
            .await
            .unwrap();
        repository.set_wallet_balance(user_id, balance).await.unwrap();
        user_id
    }

    #[tokio::test]
    async fn test_invest_moves_balance_into_investment() {
        let repository = Arc::new(MemoryRepository::new());
        let investments = InvestmentInteractorImpl::new(repository.clone(), 5.0);
        let user_id = funded_user(&repository, 100.0).await;

        let investment = investments.invest(user_id, 40.0).await.unwrap();
        assert_eq!(investment.amount_invested, 40.0);
        assert_eq!(investment.apy_rate, 5.0);
        assert_eq!(investment.status, InvestmentStatus::Active);
        assert_eq!(repository.wallet(user_id).unwrap().balance, 60.0);
    }

    #[tokio::test]
    async fn test_invest_more_than_balance() {
        let repository = Arc::new(MemoryRepository::new());
        let investments = InvestmentInteractorImpl::new(repository.clone(), 5.0);
        let user_id = funded_user(&repository, 10.0).await;

        let err = investments.invest(user_id, 40.0).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PayError>(),
            Some(PayError::InsufficientFunds)
        ));
        assert_eq!(repository.wallet(user_id).unwrap().balance, 10.0);
    }

    #[tokio::test]
    async fn test_withdraw_returns_funds_and_closes() {
        let repository = Arc::new(MemoryRepository::new());
        let investments = InvestmentInteractorImpl::new(repository.clone(), 5.0);
        let user_id = funded_user(&repository, 100.0).await;

        let investment = investments.invest(user_id, 40.0).await.unwrap();
        assert_eq!(investments.list_investments(user_id).await.unwrap().len(), 1);

        let summary = investments.withdraw(user_id, investment.id).await.unwrap();
        // same-day withdrawal earns nothing
        assert_eq!(summary.current_value, 40.0);
        assert_eq!(summary.earnings, 0.0);
        assert_eq!(summary.investment.status, InvestmentStatus::Withdrawn);
        assert_eq!(repository.wallet(user_id).unwrap().balance, 100.0);
        assert!(investments.list_investments(user_id).await.unwrap().is_empty());

        let err = investments.withdraw(user_id, investment.id).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PayError>(),
            Some(PayError::InvestmentNotFound)
        ));
    }

    #[tokio::test]
    async fn test_cannot_withdraw_someone_elses_investment() {
        let repository = Arc::new(MemoryRepository::new());
        let investments = InvestmentInteractorImpl::new(repository.clone(), 5.0);
        let owner = funded_user(&repository, 100.0).await;
        let other = funded_user(&repository, 0.0).await;

        let investment = investments.invest(owner, 40.0).await.unwrap();
        assert!(investments.withdraw(other, investment.id).await.is_err());
        assert_eq!(repository.wallet(other).unwrap().balance, 0.0);
    }
}
