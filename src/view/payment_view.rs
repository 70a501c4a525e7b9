use crate::entity::{Channel, Transaction, TransactionStatus, TransactionType};
use crate::interactor::payment_interactor::PaymentReceipt;
use crate::utils::{format_amount, shorten_address};
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{
    prelude::*,
    types::{MessageId, ParseMode},
    utils::html,
    Bot,
};

#[async_trait]
pub trait PaymentView: Send + Sync {
    async fn prompt_for_confirmation(
        &self,
        recipient: &str,
        amount: f64,
        channel: Channel,
        note: Option<&str>,
    ) -> Result<()>;
    async fn display_processing(&self, channel: Channel) -> Result<MessageId>;
    async fn display_success(&self, receipt: &PaymentReceipt, message_id: MessageId)
        -> Result<()>;
    async fn display_failure(&self, error_message: String, message_id: MessageId) -> Result<()>;
    async fn display_cancelled(&self) -> Result<()>;
    async fn notify_recipient(&self, recipient_chat: ChatId, receipt: &PaymentReceipt)
        -> Result<()>;
    async fn display_history(&self, transactions: &[Transaction]) -> Result<()>;
}

pub struct TelegramPaymentView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramPaymentView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

fn currency_for(channel: Channel) -> &'static str {
    match channel {
        Channel::Algorand => "ALGO",
        Channel::MobileMoney | Channel::Bank => "USD",
    }
}

pub fn confirmation_text(
    recipient: &str,
    amount: f64,
    channel: Channel,
    note: Option<&str>,
) -> String {
    let mut text = format!(
        "Send <b>{}</b> to <code>{}</code> via {}?",
        format_amount(amount, currency_for(channel)),
        html::escape(recipient),
        channel
    );
    if let Some(note) = note {
        text.push_str(&format!("\nNote: {}", html::escape(note)));
    }
    text.push_str("\n\nReply <b>yes</b> to confirm or <b>no</b> to cancel.");
    text
}

pub fn receipt_text(receipt: &PaymentReceipt) -> String {
    let reference = match receipt.channel {
        Channel::Algorand => format!(
            "Tx: <a href=\"https://testnet.explorer.perawallet.app/tx/{0}\">{0}</a>",
            receipt.external_id
        ),
        Channel::MobileMoney | Channel::Bank => {
            format!("Reference: <code>{}</code>", receipt.external_id)
        }
    };
    format!(
        "✅ Sent {} to <code>{}</code> via {}.\n{}",
        format_amount(receipt.amount, &receipt.currency),
        html::escape(&receipt.recipient),
        receipt.channel,
        reference
    )
}

pub fn incoming_text(receipt: &PaymentReceipt) -> String {
    format!(
        "💸 You received {} via {}.\nReference: <code>{}</code>",
        format_amount(receipt.amount, &receipt.currency),
        receipt.channel,
        receipt.external_id
    )
}

pub fn history_text(transactions: &[Transaction]) -> String {
    if transactions.is_empty() {
        return "No transactions yet.".to_string();
    }

    let mut text = String::from("<b>Recent transactions</b>\n");
    for tx in transactions {
        let (arrow, counterparty) = match tx.tx_type {
            TransactionType::Send => ("➡️", tx.to_address.as_deref()),
            TransactionType::Receive => ("⬅️", tx.from_address.as_deref()),
        };
        let status = match tx.status {
            TransactionStatus::Completed => "",
            TransactionStatus::Pending => " ⏳",
            TransactionStatus::Failed => " ❌",
        };
        text.push_str(&format!(
            "\n{} {} {} {} via {}{}\n   {}",
            arrow,
            format_amount(tx.amount, &tx.currency),
            if tx.tx_type == TransactionType::Send { "to" } else { "from" },
            html::escape(&shorten_address(counterparty.unwrap_or("?"))),
            tx.channel,
            status,
            tx.created_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    text
}

#[async_trait]
impl PaymentView for TelegramPaymentView {
    async fn prompt_for_confirmation(
        &self,
        recipient: &str,
        amount: f64,
        channel: Channel,
        note: Option<&str>,
    ) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                confirmation_text(recipient, amount, channel, note),
            )
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_processing(&self, channel: Channel) -> Result<MessageId> {
        let text = match channel {
            Channel::Algorand => "Submitting transaction to the Algorand TestNet... Please wait.",
            Channel::MobileMoney => "Contacting the mobile money provider... Please wait.",
            Channel::Bank => "Processing bank transfer... Please wait.",
        };
        let message = self.bot.send_message(self.chat_id, text).await?;
        Ok(message.id)
    }

    async fn display_success(
        &self,
        receipt: &PaymentReceipt,
        message_id: MessageId,
    ) -> Result<()> {
        self.bot
            .edit_message_text(self.chat_id, message_id, receipt_text(receipt))
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_failure(&self, error_message: String, message_id: MessageId) -> Result<()> {
        self.bot
            .edit_message_text(
                self.chat_id,
                message_id,
                format!("❌ Payment failed: {}", error_message),
            )
            .await?;
        Ok(())
    }

    async fn display_cancelled(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Payment cancelled.")
            .await?;
        Ok(())
    }

    async fn notify_recipient(
        &self,
        recipient_chat: ChatId,
        receipt: &PaymentReceipt,
    ) -> Result<()> {
        self.bot
            .send_message(recipient_chat, incoming_text(receipt))
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn display_history(&self, transactions: &[Transaction]) -> Result<()> {
        self.bot
            .send_message(self.chat_id, history_text(transactions))
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn receipt(channel: Channel, external_id: &str) -> PaymentReceipt {
        PaymentReceipt {
            transaction_id: Uuid::new_v4(),
            amount: 25.0,
            currency: "USD".to_string(),
            channel,
            recipient: "bob@example.com".to_string(),
            external_id: external_id.to_string(),
            recipient_telegram_id: Some(7),
        }
    }

    fn transaction(tx_type: TransactionType, status: TransactionStatus) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            tx_type,
            amount: 3.0,
            currency: "ALGO".to_string(),
            channel: Channel::Algorand,
            to_address: Some("7ZUECA7HFLZTXENRV24SHLU4AVPUTMTTDUFUBNBD64C73F3UHRTHAIOF6Q".into()),
            from_address: Some("25NJQAMCWEFLPVKL73J4SZAHHIHOC4XT3KTCGJNPAINGR5YHKENMEF5QTE".into()),
            algorand_tx_id: None,
            status,
            metadata: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_confirmation_escapes_recipient() {
        let text = confirmation_text("<b>@x.com", 5.0, Channel::Bank, Some("rent & food"));
        assert!(text.contains("&lt;b&gt;@x.com"));
        assert!(text.contains("5.00 USD"));
        assert!(text.contains("rent &amp; food"));
    }

    #[test]
    fn test_receipt_shows_reference_for_simulated_channels() {
        let text = receipt_text(&receipt(Channel::MobileMoney, "MM-ABC"));
        assert!(text.contains("Reference: <code>MM-ABC</code>"));
        assert!(text.contains("Mobile money"));

        let text = receipt_text(&receipt(Channel::Algorand, "TXID"));
        assert!(text.contains("/tx/TXID"));
    }

    #[test]
    fn test_history_lists_direction_and_status() {
        let text = history_text(&[
            transaction(TransactionType::Send, TransactionStatus::Failed),
            transaction(TransactionType::Receive, TransactionStatus::Completed),
        ]);
        assert!(text.contains("➡️ 3.000000 ALGO to 7ZUEC...IOF6Q via Algorand ❌"));
        assert!(text.contains("⬅️ 3.000000 ALGO from 25NJQ...F5QTE via Algorand"));
    }

    #[test]
    fn test_empty_history() {
        assert_eq!(history_text(&[]), "No transactions yet.");
    }
}
