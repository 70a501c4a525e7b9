use crate::entity::Channel;

/// Dialogue state for the bot conversation
#[derive(Clone, Default, Debug)]
pub enum State {
    #[default]
    Start,
    AwaitingPaymentConfirmation {
        recipient: String,
        amount: f64,
        channel: Channel,
        note: Option<String>,
    },
    AwaitingInvestConfirmation {
        amount: f64,
    },
}
