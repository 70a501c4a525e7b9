use crate::entity::Wallet;
use crate::payment_uri::PaymentUri;
use crate::utils::format_amount;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, utils::html, Bot};

#[async_trait]
pub trait WalletView: Send + Sync {
    async fn display_welcome(&self, is_new_user: bool) -> Result<()>;
    async fn display_wallet_created(&self, address: &str, mnemonic: &str) -> Result<()>;
    async fn display_wallet(&self, wallet: &Wallet) -> Result<()>;
    async fn display_balance(&self, wallet: &Wallet, balance: f64, is_live: bool) -> Result<()>;
    async fn display_backup(&self, mnemonic: &str) -> Result<()>;
    async fn display_funded(&self, tx_id: &str, amount: f64) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramWalletView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramWalletView {
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

pub fn welcome_text(is_new_user: bool) -> String {
    let greeting = if is_new_user {
        "<b>Welcome to VoicePay!</b> You have been successfully registered."
    } else {
        "<b>Welcome back to VoicePay!</b>"
    };

    format!(
        "{}\n\n\
        Type a command the way you would say it, for example:\n\
        • <i>send 5 algos to ADDRESS</i>\n\
        • <i>send 20 dollars to bob@example.com via mobile money</i>\n\
        • <i>what's my balance</i>\n\
        • <i>show my history</i>\n\
        • <i>invest 10</i>\n\n\
        Use /help to see every command.",
        greeting
    )
}

pub fn wallet_created_text(address: &str, mnemonic: &str) -> String {
    format!(
        "Your Algorand TestNet wallet has been created!\n\n\
        Address: <code>{}</code>\n\n\
        Recovery phrase: <tg-spoiler>{}</tg-spoiler>\n\n\
        <b>Important:</b> write the 25 words down. They are the only way to recover the wallet.\n\
        Use /fund to get free TestNet ALGO.",
        address, mnemonic
    )
}

pub fn wallet_text(wallet: &Wallet) -> String {
    let uri = PaymentUri::new(&wallet.algorand_address, None).to_uri();
    format!(
        "<b>Your wallet</b>\n\n\
        Address: <code>{}</code>\n\
        Cached balance: {}\n\n\
        Payment link (encode it in a QR code to get paid):\n<code>{}</code>",
        wallet.algorand_address,
        format_amount(wallet.balance, "ALGO"),
        html::escape(&uri)
    )
}

pub fn balance_text(wallet: &Wallet, balance: f64, is_live: bool) -> String {
    let suffix = if is_live {
        ""
    } else {
        "\n<i>The network is unreachable, showing the last known balance.</i>"
    };
    format!(
        "💰 <b>Balance:</b> {}\nAddress: <code>{}</code>{}",
        format_amount(balance, "ALGO"),
        wallet.algorand_address,
        suffix
    )
}

#[async_trait]
impl WalletView for TelegramWalletView {
    async fn display_welcome(&self, is_new_user: bool) -> Result<()> {
        self.send_html(welcome_text(is_new_user)).await
    }

    async fn display_wallet_created(&self, address: &str, mnemonic: &str) -> Result<()> {
        self.send_html(wallet_created_text(address, mnemonic)).await
    }

    async fn display_wallet(&self, wallet: &Wallet) -> Result<()> {
        self.send_html(wallet_text(wallet)).await
    }

    async fn display_balance(&self, wallet: &Wallet, balance: f64, is_live: bool) -> Result<()> {
        self.send_html(balance_text(wallet, balance, is_live)).await
    }

    async fn display_backup(&self, mnemonic: &str) -> Result<()> {
        self.send_html(format!(
            "🔐 Your recovery phrase:\n\n<tg-spoiler>{}</tg-spoiler>\n\n\
            Never share it with anyone. Delete this message once it is saved.",
            mnemonic
        ))
        .await
    }

    async fn display_funded(&self, tx_id: &str, amount: f64) -> Result<()> {
        self.send_html(format!(
            "✅ Received {} from the TestNet faucet.\nTx: <code>{}</code>",
            format_amount(amount, "ALGO"),
            tx_id
        ))
        .await
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("❌ {}", error_message))
            .await?;
        Ok(())
    }
}
