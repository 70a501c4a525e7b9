use anyhow::Result;
use log::{error, info};
use std::sync::Arc;
use teloxide::prelude::*;

use super::{CommandHandler, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;
use crate::view::error_message;
use crate::view::wallet_view::{TelegramWalletView, WalletView};

pub struct StartCommand;

impl CommandHandler for StartCommand {
    fn command_name() -> &'static str {
        "start"
    }

    fn description() -> &'static str {
        "register and create your Algorand wallet"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        _args: String,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()> {
        let username = msg.from.as_ref().and_then(|user| user.username.clone());
        let view = TelegramWalletView::new(bot, msg.chat.id);

        info!("Start command received from Telegram ID: {}", telegram_id);

        // Drop any half-finished confirmation
        if let Some(dialogue) = dialogue {
            dialogue.update(State::Start).await?;
        }

        let (profile, created) = services.profiles().register(telegram_id, username).await?;
        view.display_welcome(created).await?;

        // Check if user has a wallet and create one if not
        match services.wallets().get_or_create_wallet(profile.id).await {
            Ok((wallet, true)) => {
                let mnemonic = services.wallets().reveal_mnemonic(profile.id).await?;
                view.display_wallet_created(&wallet.algorand_address, &mnemonic)
                    .await?;
            }
            Ok((wallet, false)) => view.display_wallet(&wallet).await?,
            Err(e) => {
                error!("Failed to create wallet for {}: {}", telegram_id, e);
                view.display_error(error_message(&e)).await?;
            }
        }

        Ok(())
    }
}
