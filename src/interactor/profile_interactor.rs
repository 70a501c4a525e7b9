use crate::entity::{PayError, Profile};
use crate::interactor::repository::PaymentRepository;
use crate::utils::{is_valid_email, is_valid_phone};
use anyhow::Result;
use async_trait::async_trait;
use log::info;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait ProfileInteractor: Send + Sync {
    /// Returns the profile and whether it was created by this call
    async fn register(&self, telegram_id: i64, username: Option<String>) -> Result<(Profile, bool)>;
    async fn get_profile(&self, telegram_id: i64) -> Result<Profile>;
    async fn set_email(&self, user_id: Uuid, email: &str) -> Result<()>;
    async fn set_phone(&self, user_id: Uuid, phone: &str) -> Result<()>;
}

pub struct ProfileInteractorImpl {
    repository: Arc<dyn PaymentRepository>,
}

impl ProfileInteractorImpl {
    pub fn new(repository: Arc<dyn PaymentRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProfileInteractor for ProfileInteractorImpl {
    async fn register(&self, telegram_id: i64, username: Option<String>) -> Result<(Profile, bool)> {
        if let Some(profile) = self.repository.get_profile_by_telegram_id(telegram_id).await? {
            return Ok((profile, false));
        }

        let profile = self.repository.create_profile(telegram_id, username).await?;
        info!("Registered Telegram ID {} as {}", telegram_id, profile.id);

        Ok((profile, true))
    }

    async fn get_profile(&self, telegram_id: i64) -> Result<Profile> {
        self.repository
            .get_profile_by_telegram_id(telegram_id)
            .await?
            .ok_or_else(|| PayError::ProfileNotFound.into())
    }

    async fn set_email(&self, user_id: Uuid, email: &str) -> Result<()> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(PayError::InvalidEmail.into());
        }
        self.repository
            .update_profile_contact(user_id, Some(email), None)
            .await
    }

    async fn set_phone(&self, user_id: Uuid, phone: &str) -> Result<()> {
        let phone = phone.trim();
        if !is_valid_phone(phone) {
            return Err(PayError::InvalidPhone.into());
        }
        self.repository
            .update_profile_contact(user_id, None, Some(phone))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interactor::memory_repository::MemoryRepository;

    #[tokio::test]
    async fn test_register_is_idempotent() {
        let interactor = ProfileInteractorImpl::new(Arc::new(MemoryRepository::new()));

        let (first, created) = interactor.register(42, Some("alice".into())).await.unwrap();
        assert!(created);
        let (second, created) = interactor.register(42, None).await.unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_set_email_validates() {
        let repository = Arc::new(MemoryRepository::new());
        let interactor = ProfileInteractorImpl::new(repository.clone());
        let (profile, _) = interactor.register(7, None).await.unwrap();

        let err = interactor.set_email(profile.id, "not-an-email").await.unwrap_err();
        assert!(matches!(err.downcast_ref::<PayError>(), Some(PayError::InvalidEmail)));

        interactor.set_email(profile.id, " bob@example.com ").await.unwrap();
        let found = repository.find_profile_by_email("BOB@example.com").await.unwrap();
        assert_eq!(found.map(|p| p.id), Some(profile.id));
    }

    #[tokio::test]
    async fn test_get_unknown_profile() {
        let interactor = ProfileInteractorImpl::new(Arc::new(MemoryRepository::new()));
        let err = interactor.get_profile(1).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<PayError>(), Some(PayError::ProfileNotFound)));
    }
}
