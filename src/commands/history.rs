use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;

use super::{current_profile, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::view::error_message;
use crate::view::payment_view::{PaymentView, TelegramPaymentView};

const HISTORY_LIMIT: i64 = 10;

pub struct HistoryCommand;

impl CommandHandler for HistoryCommand {
    fn command_name() -> &'static str {
        "history"
    }

    fn description() -> &'static str {
        "show recent transactions"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramPaymentView::new(bot.clone(), msg.chat.id);

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.payments().get_history(profile.id, HISTORY_LIMIT).await
        }
        .await;

        match result {
            Ok(transactions) => view.display_history(&transactions).await,
            Err(e) => {
                bot.send_message(msg.chat.id, error_message(&e)).await?;
                Ok(())
            }
        }
    }
}
