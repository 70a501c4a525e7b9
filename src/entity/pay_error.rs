use crate::entity::Channel;

#[derive(Debug, thiserror::Error)]
pub enum PayError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Algod client error: {0}")]
    AlgodClient(String),

    #[error("Faucet error: {0}")]
    Faucet(String),

    #[error("Telegram API error: {0}")]
    TelegramApi(#[from] teloxide::RequestError),

    #[error("Wallet not found")]
    WalletNotFound,

    #[error("Profile not found")]
    ProfileNotFound,

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Invalid address")]
    InvalidAddress,

    #[error("Invalid email")]
    InvalidEmail,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Daily limit exceeded, {remaining:.2} left for today")]
    DailyLimitExceeded { remaining: f64 },

    #[error("Recipient not found")]
    RecipientNotFound,

    #[error("Amount must be between {min} and {max}")]
    AmountOutOfRange { min: f64, max: f64 },

    #[error("{0} transfer failed, please try again")]
    ChannelFailure(Channel),

    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("Investment not found")]
    InvestmentNotFound,

    #[error("Failed to create wallet: {0}")]
    WalletCreationError(String),
}
