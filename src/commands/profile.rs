use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{current_profile, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::view::account_view::{AccountView, TelegramAccountView};
use crate::view::error_message;

pub struct ProfileCommand;
pub struct EmailCommand;
pub struct PhoneCommand;
pub struct LimitsCommand;
pub struct ProCommand;

impl CommandHandler for ProfileCommand {
    fn command_name() -> &'static str {
        "profile"
    }

    fn description() -> &'static str {
        "show your contact details"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramAccountView::new(bot, msg.chat.id);

        match current_profile(&services, telegram_id).await {
            Ok(profile) => view.display_profile(&profile).await,
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}

impl CommandHandler for EmailCommand {
    fn command_name() -> &'static str {
        "email"
    }

    fn description() -> &'static str {
        "set the email others use to pay you"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramAccountView::new(bot, msg.chat.id);
        let email = args.trim();
        if email.is_empty() {
            return view.display_usage("Usage: /email you@example.com").await;
        }

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.profiles().set_email(profile.id, email).await
        }
        .await;

        match result {
            Ok(()) => {
                info!("Telegram ID {} updated email", telegram_id);
                view.display_contact_saved("email", email).await
            }
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}

impl CommandHandler for PhoneCommand {
    fn command_name() -> &'static str {
        "phone"
    }

    fn description() -> &'static str {
        "set your phone number"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramAccountView::new(bot, msg.chat.id);
        let phone = args.trim();
        if phone.is_empty() {
            return view.display_usage("Usage: /phone +15551234567").await;
        }

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.profiles().set_phone(profile.id, phone).await
        }
        .await;

        match result {
            Ok(()) => view.display_contact_saved("phone number", phone).await,
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}

impl CommandHandler for LimitsCommand {
    fn command_name() -> &'static str {
        "limits"
    }

    fn description() -> &'static str {
        "show your daily send limit"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramAccountView::new(bot, msg.chat.id);

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.limits().get_limits(profile.id).await
        }
        .await;

        match result {
            Ok(limits) => view.display_limits(&limits).await,
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}

impl CommandHandler for ProCommand {
    fn command_name() -> &'static str {
        "pro"
    }

    fn description() -> &'static str {
        "upgrade to the Pro plan"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramAccountView::new(bot, msg.chat.id);

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.limits().upgrade_to_pro(profile.id).await
        }
        .await;

        match result {
            Ok(limits) => view.display_upgraded(&limits).await,
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}
