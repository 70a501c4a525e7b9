//! Free-text messages are treated as voice transcripts.

use anyhow::Result;
use log::{debug, info};
use std::sync::Arc;
use teloxide::prelude::*;

use super::{history, invest, pay, wallet, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::{Channel, PayError, VoiceAction, VoiceCommand};
use crate::utils::{is_valid_algorand_address, is_valid_email};
use crate::view::error_message;
use crate::voice::{describe, parse_voice_command};

const NOT_UNDERSTOOD: &str = "Sorry, I didn't catch that. Try:\n\
    • send 5 algos to <address>\n\
    • send 20 dollars to bob@example.com via mobile money\n\
    • what's my balance\n\
    • show my history\n\
    • invest 10";

/// Recipient, amount and channel of a spoken send, with the recipient checked
/// against the format its channel expects
pub fn send_details(command: &VoiceCommand) -> Result<(String, f64, Channel), PayError> {
    let amount = command
        .amount
        .filter(|amount| *amount > 0.0)
        .ok_or(PayError::InvalidAmount)?;
    let recipient = command
        .recipient
        .clone()
        .ok_or(PayError::RecipientNotFound)?;
    let channel = command.channel.unwrap_or_default();

    match channel {
        Channel::Algorand if !is_valid_algorand_address(&recipient) => Err(PayError::InvalidAddress),
        Channel::MobileMoney | Channel::Bank if !is_valid_email(&recipient) => {
            Err(PayError::InvalidEmail)
        }
        _ => Ok((recipient, amount, channel)),
    }
}

pub async fn handle_voice_text(
    bot: Bot,
    msg: Message,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let Some(text) = msg.text() else {
        if msg.voice().is_some() {
            bot.send_message(
                msg.chat.id,
                "I can't transcribe audio yet. Please type what you said.",
            )
            .await?;
        }
        return Ok(());
    };

    let telegram_id = msg.from.as_ref().map_or(0, |user| user.id.0 as i64);
    let Some(command) = parse_voice_command(text) else {
        debug!("Unrecognised transcript from {}: {}", telegram_id, text);
        bot.send_message(msg.chat.id, NOT_UNDERSTOOD).await?;
        return Ok(());
    };
    info!("Voice command {} from Telegram ID {}", command.action, telegram_id);

    match command.action {
        VoiceAction::Send => match send_details(&command) {
            Ok((recipient, amount, channel)) => {
                pay::begin_payment(bot, msg.chat.id, dialogue, recipient, amount, channel, None)
                    .await
            }
            Err(e) => {
                let reply = format!("❌ {}", error_message(&anyhow::Error::from(e)));
                bot.send_message(msg.chat.id, reply).await?;
                Ok(())
            }
        },
        VoiceAction::Balance => {
            bot.send_message(msg.chat.id, describe(&command)).await?;
            wallet::BalanceCommand::execute(
                bot,
                msg,
                telegram_id,
                String::new(),
                Some(dialogue),
                services,
            )
            .await
        }
        VoiceAction::History => {
            bot.send_message(msg.chat.id, describe(&command)).await?;
            history::HistoryCommand::execute(
                bot,
                msg,
                telegram_id,
                String::new(),
                Some(dialogue),
                services,
            )
            .await
        }
        VoiceAction::Invest => match command.amount {
            Some(amount) if amount > 0.0 => {
                invest::begin_investment(bot, msg.chat.id, dialogue, amount, &services).await
            }
            _ => {
                invest::InvestCommand::execute(
                    bot,
                    msg,
                    telegram_id,
                    String::new(),
                    Some(dialogue),
                    services,
                )
                .await
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "7ZUECA7HFLZTXENRV24SHLU4AVPUTMTTDUFUBNBD64C73F3UHRTHAIOF6Q";

    #[test]
    fn test_send_to_address_on_chain() {
        let command = parse_voice_command(&format!("send 3 algos to {}", ADDRESS)).unwrap();
        let (recipient, amount, channel) = send_details(&command).unwrap();
        assert_eq!(recipient, ADDRESS);
        assert_eq!(amount, 3.0);
        assert_eq!(channel, Channel::Algorand);
    }

    #[test]
    fn test_send_to_name_on_chain_is_rejected() {
        let command = parse_voice_command("send 10 dollars to alice").unwrap();
        assert!(matches!(send_details(&command), Err(PayError::InvalidAddress)));
    }

    #[test]
    fn test_simulated_channel_needs_email() {
        let command = parse_voice_command("send 10 dollars to alice via bank").unwrap();
        assert!(matches!(send_details(&command), Err(PayError::InvalidEmail)));

        let command = parse_voice_command("send 10 dollars to alice@x.io via bank").unwrap();
        assert_eq!(send_details(&command).unwrap().2, Channel::Bank);
    }
}
