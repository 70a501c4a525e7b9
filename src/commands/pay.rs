use anyhow::{anyhow, Result};
use log::{error, info, warn};
use std::sync::Arc;
use teloxide::prelude::*;

use super::{current_profile, is_confirmation, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::{Channel, State};
use crate::interactor::payment_interactor::PaymentRequest;
use crate::payment_uri::PaymentUri;
use crate::view::error_message;
use crate::view::payment_view::{PaymentView, TelegramPaymentView};

pub struct PayCommand;

/// Ask the user to confirm a payment and remember it in the dialogue
pub async fn begin_payment(
    bot: Bot,
    chat_id: ChatId,
    dialogue: MyDialogue,
    recipient: String,
    amount: f64,
    channel: Channel,
    note: Option<String>,
) -> Result<()> {
    let view = TelegramPaymentView::new(bot, chat_id);
    view.prompt_for_confirmation(&recipient, amount, channel, note.as_deref())
        .await?;

    dialogue
        .update(State::AwaitingPaymentConfirmation {
            recipient,
            amount,
            channel,
            note,
        })
        .await?;
    Ok(())
}

impl CommandHandler for PayCommand {
    fn command_name() -> &'static str {
        "pay"
    }

    fn description() -> &'static str {
        "pay an algorand:// payment link"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        args: String,
        dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let dialogue = dialogue.ok_or_else(|| anyhow!("Dialogue context not provided"))?;

        if args.trim().is_empty() {
            bot.send_message(
                msg.chat.id,
                "Usage: /pay algorand://ADDRESS?amount=MICROALGOS\n\
                Scan a payment QR code and paste its contents here.",
            )
            .await?;
            return Ok(());
        }

        let uri = match PaymentUri::parse(&args) {
            Ok(uri) => uri,
            Err(e) => {
                bot.send_message(msg.chat.id, format!("❌ {}", error_message(&e)))
                    .await?;
                return Ok(());
            }
        };

        match uri.amount {
            Some(amount) if amount > 0.0 => {
                begin_payment(
                    bot,
                    msg.chat.id,
                    dialogue,
                    uri.address,
                    amount,
                    Channel::Algorand,
                    uri.note,
                )
                .await
            }
            _ => {
                bot.send_message(
                    msg.chat.id,
                    format!(
                        "This payment link has no amount. Say \"send <amount> algos to {}\" instead.",
                        uri.address
                    ),
                )
                .await?;
                Ok(())
            }
        }
    }
}

/// Handles the yes/no reply to a pending payment
pub async fn receive_payment_confirmation(
    bot: Bot,
    msg: Message,
    state: State,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let State::AwaitingPaymentConfirmation {
        recipient,
        amount,
        channel,
        note,
    } = state
    else {
        return Ok(());
    };

    // Reset dialogue state
    dialogue.update(State::Start).await?;

    let view = TelegramPaymentView::new(bot, msg.chat.id);
    if !msg.text().is_some_and(is_confirmation) {
        return view.display_cancelled().await;
    }

    let telegram_id = msg.from.as_ref().map_or(0, |user| user.id.0 as i64);
    let processing = view.display_processing(channel).await?;

    let result = async {
        let profile = current_profile(&services, telegram_id).await?;
        let request =
            PaymentRequest::new(profile.id, amount, &recipient, channel).with_note(note);
        services.payments().send_payment(request).await
    }
    .await;

    match result {
        Ok(receipt) => {
            info!(
                "Telegram ID {} paid {} {} via {}",
                telegram_id,
                receipt.amount,
                receipt.currency,
                receipt.channel.as_str()
            );
            view.display_success(&receipt, processing).await?;

            if let Some(recipient_id) = receipt.recipient_telegram_id {
                if let Err(e) = view.notify_recipient(ChatId(recipient_id), &receipt).await {
                    warn!("Could not notify recipient {}: {}", recipient_id, e);
                }
            }
            Ok(())
        }
        Err(e) => {
            error!("Payment from Telegram ID {} failed: {}", telegram_id, e);
            view.display_failure(error_message(&e), processing).await
        }
    }
}
