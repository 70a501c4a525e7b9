use crate::config::LimitSettings;
use crate::entity::{LimitCheck, UserLimits};
use crate::interactor::repository::PaymentRepository;
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait LimitInteractor: Send + Sync {
    async fn check_daily_limits(&self, user_id: Uuid, amount: f64) -> Result<LimitCheck>;
    async fn update_daily_spent(&self, user_id: Uuid, amount: f64) -> Result<UserLimits>;
    async fn get_limits(&self, user_id: Uuid) -> Result<UserLimits>;
    async fn upgrade_to_pro(&self, user_id: Uuid) -> Result<UserLimits>;
}

pub struct LimitInteractorImpl {
    repository: Arc<dyn PaymentRepository>,
    settings: LimitSettings,
}

impl LimitInteractorImpl {
    pub fn new(repository: Arc<dyn PaymentRepository>, settings: LimitSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    // Load the row, creating it on first use and resetting it on a new UTC day
    async fn load(&self, user_id: Uuid) -> Result<UserLimits> {
        let today = Utc::now().date_naive();

        match self.repository.get_user_limits(user_id).await? {
            Some(mut limits) => {
                if limits.roll_over(today) {
                    debug!("Daily limit reset for user {}", user_id);
                    self.repository.save_user_limits(&limits).await?;
                }
                Ok(limits)
            }
            None => {
                let limits = UserLimits::new(user_id, self.settings.free_daily_limit, today);
                self.repository.save_user_limits(&limits).await?;
                Ok(limits)
            }
        }
    }
}

#[async_trait]
impl LimitInteractor for LimitInteractorImpl {
    async fn check_daily_limits(&self, user_id: Uuid, amount: f64) -> Result<LimitCheck> {
        Ok(self.load(user_id).await?.check(amount))
    }

    async fn update_daily_spent(&self, user_id: Uuid, amount: f64) -> Result<UserLimits> {
        let mut limits = self.load(user_id).await?;
        limits.daily_sent_amount += amount;
        self.repository.save_user_limits(&limits).await?;

        Ok(limits)
    }

    async fn get_limits(&self, user_id: Uuid) -> Result<UserLimits> {
        self.load(user_id).await
    }

    async fn upgrade_to_pro(&self, user_id: Uuid) -> Result<UserLimits> {
        let mut limits = self.load(user_id).await?;
        limits.is_pro = true;
        limits.daily_send_limit = limits.daily_send_limit.max(self.settings.pro_daily_limit);
        self.repository.save_user_limits(&limits).await?;
        info!("User {} upgraded to pro", user_id);

        Ok(limits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactor::memory_repository::MemoryRepository;
    use chrono::Duration;

    fn interactor(repository: Arc<MemoryRepository>) -> LimitInteractorImpl {
        LimitInteractorImpl::new(
            repository,
            LimitSettings {
                free_daily_limit: 100.0,
                pro_daily_limit: 1_000.0,
            },
        )
    }

    #[tokio::test]
    async fn test_first_check_creates_free_tier_row() {
        let repository = Arc::new(MemoryRepository::new());
        let limits = interactor(repository.clone());
        let user_id = Uuid::new_v4();

        let check = limits.check_daily_limits(user_id, 100.0).await.unwrap();
        assert!(check.can_send);
        assert_eq!(check.remaining, 100.0);
        assert_eq!(repository.limits(user_id).unwrap().daily_send_limit, 100.0);
    }

    #[tokio::test]
    async fn test_spent_amount_counts_against_limit() {
        let repository = Arc::new(MemoryRepository::new());
        let limits = interactor(repository);
        let user_id = Uuid::new_v4();

        limits.update_daily_spent(user_id, 70.0).await.unwrap();
        assert!(limits.check_daily_limits(user_id, 30.0).await.unwrap().can_send);
        assert!(!limits.check_daily_limits(user_id, 31.0).await.unwrap().can_send);
    }

    #[tokio::test]
    async fn test_counter_resets_on_new_day() {
        let repository = Arc::new(MemoryRepository::new());
        let limits = interactor(repository.clone());
        let user_id = Uuid::new_v4();

        let mut stale = UserLimits::new(user_id, 100.0, Utc::now().date_naive() - Duration::days(1));
        stale.daily_sent_amount = 100.0;
        repository.save_user_limits(&stale).await.unwrap();

        let check = limits.check_daily_limits(user_id, 50.0).await.unwrap();
        assert!(check.can_send);
        assert_eq!(check.sent, 0.0);
        assert_eq!(
            repository.limits(user_id).unwrap().last_reset_date,
            Utc::now().date_naive()
        );
    }

    #[tokio::test]
    async fn test_upgrade_raises_limit() {
        let repository = Arc::new(MemoryRepository::new());
        let limits = interactor(repository);
        let user_id = Uuid::new_v4();

        let upgraded = limits.upgrade_to_pro(user_id).await.unwrap();
        assert!(upgraded.is_pro);
        assert_eq!(upgraded.daily_send_limit, 1_000.0);
        assert!(limits.check_daily_limits(user_id, 500.0).await.unwrap().can_send);
    }
}
