use super::{CommandHandler, MyDialogue};
use crate::commands::BotCommands;
use crate::di::ServiceContainer;
use anyhow::Result;
use std::sync::Arc;
use teloxide::{prelude::*, utils::command::BotCommands as _};

pub struct HelpCommand;

pub fn help_text() -> String {
    format!(
        "{}\n\n\
        You can also just type what you want, for example:\n\
        send 5 algos to <address>\n\
        send 20 dollars to bob@example.com via mobile money\n\
        send 50 usd to carol@example.com using bank\n\
        what's my balance / show my history / invest 10",
        BotCommands::descriptions()
    )
}

impl CommandHandler for HelpCommand {
    fn command_name() -> &'static str {
        "help"
    }

    fn description() -> &'static str {
        "display this help message"
    }

    async fn execute(
        bot: Bot,
        msg: Message,
        _telegram_id: i64,
        _args: String,
        _dialogue: Option<MyDialogue>,
        _services: Arc<ServiceContainer>,
    ) -> Result<()> {
        bot.send_message(msg.chat.id, help_text()).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_commands_and_examples() {
        let text = help_text();
        assert!(text.contains("/balance"));
        assert!(text.contains("/withdraw"));
        assert!(text.contains("via mobile money"));
    }
}
