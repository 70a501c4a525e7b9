use anyhow::Result;
use log::info;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, prelude::*};

use crate::di::ServiceContainer;
use crate::entity::{Profile, State};
use teloxide::dispatching::dialogue::Dialogue;

pub mod help;
pub mod history;
pub mod invest;
pub mod pay;
pub mod profile;
pub mod start;
pub mod voice;
pub mod wallet;

pub type MyDialogue = Dialogue<State, InMemStorage<State>>;

/// Trait that defines a command handler
pub trait CommandHandler {
    /// The command name in lowercase
    fn command_name() -> &'static str;

    /// The command description for help
    fn description() -> &'static str;

    /// Execute the command. `args` is the text after the command, empty if none.
    async fn execute(
        bot: Bot,
        msg: Message,
        telegram_id: i64,
        args: String,
        dialogue: Option<MyDialogue>,
        services: Arc<ServiceContainer>,
    ) -> Result<()>;
}

/// Register all command handlers in the command system
pub fn register_commands() -> Vec<(&'static str, &'static str)> {
    vec![
        (
            start::StartCommand::command_name(),
            start::StartCommand::description(),
        ),
        (
            wallet::WalletCommand::command_name(),
            wallet::WalletCommand::description(),
        ),
        (
            wallet::BalanceCommand::command_name(),
            wallet::BalanceCommand::description(),
        ),
        (
            history::HistoryCommand::command_name(),
            history::HistoryCommand::description(),
        ),
        (
            pay::PayCommand::command_name(),
            pay::PayCommand::description(),
        ),
        (
            invest::InvestCommand::command_name(),
            invest::InvestCommand::description(),
        ),
        (
            invest::InvestmentsCommand::command_name(),
            invest::InvestmentsCommand::description(),
        ),
        (
            invest::WithdrawCommand::command_name(),
            invest::WithdrawCommand::description(),
        ),
        (
            wallet::FundCommand::command_name(),
            wallet::FundCommand::description(),
        ),
        (
            wallet::BackupCommand::command_name(),
            wallet::BackupCommand::description(),
        ),
        (
            profile::ProfileCommand::command_name(),
            profile::ProfileCommand::description(),
        ),
        (
            profile::EmailCommand::command_name(),
            profile::EmailCommand::description(),
        ),
        (
            profile::PhoneCommand::command_name(),
            profile::PhoneCommand::description(),
        ),
        (
            profile::LimitsCommand::command_name(),
            profile::LimitsCommand::description(),
        ),
        (
            profile::ProCommand::command_name(),
            profile::ProCommand::description(),
        ),
        (
            help::HelpCommand::command_name(),
            help::HelpCommand::description(),
        ),
    ]
}

/// Bot Commands enum for teloxide command filter
#[derive(teloxide::utils::command::BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum BotCommands {
    #[command(description = "register and create your Algorand wallet")]
    Start,
    #[command(description = "show your wallet address and payment link")]
    Wallet,
    #[command(description = "check your ALGO balance")]
    Balance,
    #[command(description = "show recent transactions")]
    History,
    #[command(description = "pay an algorand:// payment link")]
    Pay(String),
    #[command(description = "invest an amount at the current APY")]
    Invest(String),
    #[command(description = "list your active investments")]
    Investments,
    #[command(description = "withdraw an investment by id")]
    Withdraw(String),
    #[command(description = "get free TestNet ALGO")]
    Fund,
    #[command(description = "show your 25-word recovery phrase")]
    Backup,
    #[command(description = "show your contact details")]
    Profile,
    #[command(description = "set the email others use to pay you")]
    Email(String),
    #[command(description = "set your phone number")]
    Phone(String),
    #[command(description = "show your daily send limit")]
    Limits,
    #[command(description = "upgrade to the Pro plan")]
    Pro,
    #[command(description = "display this help message")]
    Help,
}

/// Route a parsed command to its handler
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    command: BotCommands,
    dialogue: MyDialogue,
    services: Arc<ServiceContainer>,
) -> Result<()> {
    let telegram_id = msg.from.as_ref().map_or(0, |user| user.id.0 as i64);
    info!("Command {:?} from Telegram ID {}", command, telegram_id);

    let dialogue = Some(dialogue);
    let none = String::new;
    match command {
        BotCommands::Start => {
            start::StartCommand::execute(bot, msg, telegram_id, none(), dialogue, services).await
        }
        BotCommands::Wallet => {
            wallet::WalletCommand::execute(bot, msg, telegram_id, none(), dialogue, services).await
        }
        BotCommands::Balance => {
            wallet::BalanceCommand::execute(bot, msg, telegram_id, none(), dialogue, services)
                .await
        }
        BotCommands::History => {
            history::HistoryCommand::execute(bot, msg, telegram_id, none(), dialogue, services)
                .await
        }
        BotCommands::Pay(uri) => {
            pay::PayCommand::execute(bot, msg, telegram_id, uri, dialogue, services).await
        }
        BotCommands::Invest(amount) => {
            invest::InvestCommand::execute(bot, msg, telegram_id, amount, dialogue, services).await
        }
        BotCommands::Investments => {
            invest::InvestmentsCommand::execute(bot, msg, telegram_id, none(), dialogue, services)
                .await
        }
        BotCommands::Withdraw(id) => {
            invest::WithdrawCommand::execute(bot, msg, telegram_id, id, dialogue, services).await
        }
        BotCommands::Fund => {
            wallet::FundCommand::execute(bot, msg, telegram_id, none(), dialogue, services).await
        }
        BotCommands::Backup => {
            wallet::BackupCommand::execute(bot, msg, telegram_id, none(), dialogue, services).await
        }
        BotCommands::Profile => {
            profile::ProfileCommand::execute(bot, msg, telegram_id, none(), dialogue, services)
                .await
        }
        BotCommands::Email(email) => {
            profile::EmailCommand::execute(bot, msg, telegram_id, email, dialogue, services).await
        }
        BotCommands::Phone(phone) => {
            profile::PhoneCommand::execute(bot, msg, telegram_id, phone, dialogue, services).await
        }
        BotCommands::Limits => {
            profile::LimitsCommand::execute(bot, msg, telegram_id, none(), dialogue, services)
                .await
        }
        BotCommands::Pro => {
            profile::ProCommand::execute(bot, msg, telegram_id, none(), dialogue, services).await
        }
        BotCommands::Help => {
            help::HelpCommand::execute(bot, msg, telegram_id, none(), dialogue, services).await
        }
    }
}

/// Profile of the sender, or `ProfileNotFound` if they never used /start
pub(crate) async fn current_profile(
    services: &ServiceContainer,
    telegram_id: i64,
) -> Result<Profile> {
    services.profiles().get_profile(telegram_id).await
}

pub(crate) fn is_confirmation(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "yes" | "y" | "confirm" | "ok"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use teloxide::utils::command::BotCommands as _;

    #[test]
    fn test_confirmation_words() {
        assert!(is_confirmation("Yes"));
        assert!(is_confirmation(" y "));
        assert!(!is_confirmation("no"));
        assert!(!is_confirmation("yes please send"));
    }

    #[test]
    fn test_commands_parse_arguments() {
        let parsed = BotCommands::parse("/email bob@example.com", "voicepay_bot").unwrap();
        assert!(matches!(parsed, BotCommands::Email(ref e) if e == "bob@example.com"));

        let parsed = BotCommands::parse("/balance", "voicepay_bot").unwrap();
        assert!(matches!(parsed, BotCommands::Balance));
    }

    #[test]
    fn test_every_command_is_registered() {
        let registered = register_commands();
        for command in BotCommands::bot_commands() {
            assert!(
                registered
                    .iter()
                    .any(|(name, _)| *name == command.command.trim_start_matches('/')),
                "{} missing",
                command.command
            );
        }
    }
}
