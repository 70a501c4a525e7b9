use anyhow::{anyhow, Result};
use log::info;
use std::sync::Arc;
use teloxide::prelude::*;
use uuid::Uuid;

use super::{current_profile, is_confirmation, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::utils::parse_amount;
use crate::view::error_message;
use crate::view::investment_view::{InvestmentView, TelegramInvestmentView};

pub struct InvestCommand;
pub struct InvestmentsCommand;
pub struct WithdrawCommand;

/// Show the projection for `amount` and wait for a yes/no
pub async fn begin_investment(
    bot: Bot,
    chat_id: ChatId,
    dialogue: MyDialogue,
    amount: f64,
    services: &ServiceContainer,
) -> Result<()> {
    let view = TelegramInvestmentView::new(bot, chat_id);
    view.prompt_for_confirmation(amount, services.investments().apy_rate())
        .await?;
    dialogue
        .update(State::AwaitingInvestConfirmation { amount })
        .await?;
    Ok(())
}

impl CommandHandler for InvestCommand {
    fn command_name() -> &'static str {
        "invest"
    }

    fn description() -> &'static str {
        "invest an amount at the current APY"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        args: String,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let dialogue = dialogue.ok_or_else(|| anyhow!("Dialogue context not provided"))?;

        match parse_amount(&args) {
            Some(amount) => begin_investment(bot, msg.chat.id, dialogue, amount, &services).await,
            None => {
                TelegramInvestmentView::new(bot, msg.chat.id)
                    .prompt_for_amount(services.investments().apy_rate())
                    .await
            }
        }
    }
}

impl CommandHandler for InvestmentsCommand {
    fn command_name() -> &'static str {
        "investments"
    }

    fn description() -> &'static str {
        "list your active investments"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramInvestmentView::new(bot, msg.chat.id);

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.investments().list_investments(profile.id).await
        }
        .await;

        match result {
            Ok(summaries) => view.display_investments(&summaries).await,
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}

impl CommandHandler for WithdrawCommand {
    fn command_name() -> &'static str {
        "withdraw"
    }

    fn description() -> &'static str {
        "withdraw an investment by id"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramInvestmentView::new(bot, msg.chat.id);

        let Ok(investment_id) = Uuid::parse_str(args.trim()) else {
            return view
                .display_error("Usage: /withdraw <investment id>. See /investments.".to_string())
                .await;
        };

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services
                .investments()
                .withdraw(profile.id, investment_id)
                .await
        }
        .await;

        match result {
            Ok(summary) => view.display_withdrawn(&summary).await,
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}

/// Handles the yes/no reply to a pending investment
pub async fn receive_invest_confirmation(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingInvestConfirmation { amount } = state else {
        return Ok(());
    };

    dialogue.update(State::Start).await?;

    let view = TelegramInvestmentView::new(bot, msg.chat.id);
    if !msg.text().is_some_and(is_confirmation) {
        return view.display_cancelled().await;
    }

    let telegram_id = msg.from.as_ref().map_or(0, |user| user.id.0 as i64);
    let result = async {
        let profile = current_profile(&services, telegram_id).await?;
        services.investments().invest(profile.id, amount).await
    }
    .await;

    match result {
        Ok(investment) => {
            info!("Telegram ID {} opened investment {}", telegram_id, investment.id);
            view.display_invested(&investment).await
        }
        Err(e) => view.display_error(error_message(&e)).await,
    }
}
