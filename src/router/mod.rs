use async_trait::async_trait;
use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, dispatching::UpdateHandler, prelude::*};

use crate::commands::{self, BotCommands, MyDialogue};
use crate::di::ServiceContainer;
use crate::entity::State;

// Base router trait
#[async_trait]
pub trait Router: Send + Sync {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error>;
}

// Command router implementation
pub struct TelegramRouter {
    services: Arc<ServiceContainer>,
}

impl TelegramRouter {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl Router for TelegramRouter {
    fn setup_handlers(&self) -> UpdateHandler<anyhow::Error> {
        use dptree::case;

        let services_for_commands = self.services.clone();
        let services_for_payment = self.services.clone();
        let services_for_invest = self.services.clone();
        let services_for_voice = self.services.clone();

        // Commands win over any pending confirmation
        let command_handler = teloxide::filter_command::<BotCommands, _>().endpoint(
            move |bot: Bot, msg: Message, command: BotCommands, dialogue: MyDialogue| {
                let services = services_for_commands.clone();
                async move { commands::handle_command(bot, msg, command, dialogue, services).await }
            },
        );

        let message_handler = Update::filter_message().branch(command_handler).branch(
            dptree::entry()
                .branch(
                    case![State::AwaitingPaymentConfirmation {
                        recipient,
                        amount,
                        channel,
                        note
                    }]
                    .endpoint(
                        move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                            let services = services_for_payment.clone();
                            async move {
                                commands::pay::receive_payment_confirmation(
                                    bot, msg, state, dialogue, services,
                                )
                                .await
                            }
                        },
                    ),
                )
                .branch(case![State::AwaitingInvestConfirmation { amount }].endpoint(
                    move |bot: Bot, msg: Message, state: State, dialogue: MyDialogue| {
                        let services = services_for_invest.clone();
                        async move {
                            commands::invest::receive_invest_confirmation(
                                bot, msg, state, dialogue, services,
                            )
                            .await
                        }
                    },
                ))
                .branch(case![State::Start].endpoint(
                    move |bot: Bot, msg: Message, dialogue: MyDialogue| {
                        let services = services_for_voice.clone();
                        async move {
                            commands::voice::handle_voice_text(bot, msg, dialogue, services).await
                        }
                    },
                )),
        );

        teloxide::dispatching::dialogue::enter::<Update, InMemStorage<State>, State, _>()
            .branch(message_handler)
    }
}
