use anyhow::Result;
use log::{info, warn};
use std::sync::Arc;
use teloxide::prelude::*;
use uuid::Uuid;

use super::{current_profile, CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::view::error_message;
use crate::view::wallet_view::{TelegramWalletView, WalletView};

pub struct WalletCommand;
pub struct BalanceCommand;
pub struct BackupCommand;
pub struct FundCommand;

/// Live balance from algod, falling back to the cached one when the node is unreachable
pub async fn show_balance(
    services: &ServiceContainer,
    view: &dyn WalletView,
    user_id: Uuid,
) -> Result<()> {
    let wallet = services.wallets().get_wallet(user_id).await?;

    match services.wallets().refresh_balance(user_id).await {
        Ok(balance) => view.display_balance(&wallet, balance, true).await,
        Err(e) => {
            warn!("Balance refresh failed for {}: {}", wallet.algorand_address, e);
            view.display_balance(&wallet, wallet.balance, false).await
        }
    }
}

impl CommandHandler for WalletCommand {
    fn command_name() -> &'static str {
        "wallet"
    }

    fn description() -> &'static str {
        "show your wallet address and payment link"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramWalletView::new(bot, msg.chat.id);

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.wallets().get_wallet(profile.id).await
        }
        .await;

        match result {
            Ok(wallet) => view.display_wallet(&wallet).await,
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}

impl CommandHandler for BalanceCommand {
    fn command_name() -> &'static str {
        "balance"
    }

    fn description() -> &'static str {
        "check your ALGO balance"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramWalletView::new(bot, msg.chat.id);

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            show_balance(&services, &view, profile.id).await
        }
        .await;

        if let Err(e) = result {
            view.display_error(error_message(&e)).await?;
        }
        Ok(())
    }
}

impl CommandHandler for BackupCommand {
    fn command_name() -> &'static str {
        "backup"
    }

    fn description() -> &'static str {
        "show your 25-word recovery phrase"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramWalletView::new(bot, msg.chat.id);

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.wallets().reveal_mnemonic(profile.id).await
        }
        .await;

        match result {
            Ok(mnemonic) => {
                info!("Recovery phrase shown to Telegram ID {}", telegram_id);
                view.display_backup(&mnemonic).await
            }
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}

impl CommandHandler for FundCommand {
    fn command_name() -> &'static str {
        "fund"
    }

    fn description() -> &'static str {
        "get free TestNet ALGO"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let view = TelegramWalletView::new(bot, msg.chat.id);

        let result = async {
            let profile = current_profile(&services, telegram_id).await?;
            services.wallets().fund_from_faucet(profile.id).await
        }
        .await;

        match result {
            Ok((tx_id, amount)) => {
                info!("Faucet sent {} ALGO to Telegram ID {}", amount, telegram_id);
                view.display_funded(&tx_id, amount).await
            }
            Err(e) => view.display_error(error_message(&e)).await,
        }
    }
}
