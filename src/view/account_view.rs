use crate::entity::{Profile, UserLimits};
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, utils::html, Bot};

#[async_trait]
pub trait AccountView: Send + Sync {
    async fn display_profile(&self, profile: &Profile) -> Result<()>;
    async fn display_contact_saved(&self, field: &str, value: &str) -> Result<()>;
    async fn display_limits(&self, limits: &UserLimits) -> Result<()>;
    async fn display_upgraded(&self, limits: &UserLimits) -> Result<()>;
    async fn display_usage(&self, usage: &str) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramAccountView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramAccountView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send_html(&self, text: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

pub fn limits_text(limits: &UserLimits) -> String {
    let plan = if limits.is_pro { "Pro ⭐" } else { "Free" };
    let mut text = format!(
        "<b>Daily limits</b> ({})\n\n\
        Sent today: {:.2}\n\
        Daily limit: {:.2}\n\
        Remaining: {:.2}\n\
        Resets at midnight UTC.",
        plan,
        limits.daily_sent_amount,
        limits.daily_send_limit,
        limits.remaining()
    );
    if !limits.is_pro {
        text.push_str("\n\nUse /pro to raise your daily limit.");
    }
    text
}

pub fn profile_text(profile: &Profile) -> String {
    let field = |value: &Option<String>| {
        value
            .as_deref()
            .map(html::escape)
            .unwrap_or_else(|| "not set".to_string())
    };
    format!(
        "<b>Profile</b>\n\nEmail: {}\nPhone: {}\n\n\
        Other users send you mobile money and bank transfers using your email.\n\
        Update it with /email, and your phone with /phone.",
        field(&profile.email),
        field(&profile.phone)
    )
}

#[async_trait]
impl AccountView for TelegramAccountView {
    async fn display_profile(&self, profile: &Profile) -> Result<()> {
        self.send_html(profile_text(profile)).await
    }

    async fn display_contact_saved(&self, field: &str, value: &str) -> Result<()> {
        self.send_html(format!(
            "✅ Your {} is now <code>{}</code>.",
            field,
            html::escape(value)
        ))
        .await
    }

    async fn display_limits(&self, limits: &UserLimits) -> Result<()> {
        self.send_html(limits_text(limits)).await
    }

    async fn display_upgraded(&self, limits: &UserLimits) -> Result<()> {
        self.send_html(format!(
            "⭐ You are now on the Pro plan. Your daily limit is {:.2}.",
            limits.daily_send_limit
        ))
        .await
    }

    async fn display_usage(&self, usage: &str) -> Result<()> {
        self.bot.send_message(self.chat_id, usage).await?;
        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("❌ {}", error_message))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    #[test]
    fn test_free_plan_suggests_upgrade() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut limits = UserLimits::new(Uuid::new_v4(), 1000.0, today);
        limits.daily_sent_amount = 250.0;

        let text = limits_text(&limits);
        assert!(text.contains("Remaining: 750.00"));
        assert!(text.contains("/pro"));

        limits.is_pro = true;
        assert!(!limits_text(&limits).contains("/pro to raise"));
    }

    #[test]
    fn test_profile_shows_missing_fields() {
        let profile = Profile {
            id: Uuid::new_v4(),
            telegram_id: 1,
            username: None,
            email: Some("a@b.co".to_string()),
            phone: None,
            created_at: Utc::now(),
        };
        let text = profile_text(&profile);
        assert!(text.contains("Email: a@b.co"));
        assert!(text.contains("Phone: not set"));
    }
}
