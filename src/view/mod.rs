use crate::entity::PayError;

pub mod account_view;
pub mod investment_view;
pub mod payment_view;
pub mod wallet_view;

/// Reply text for a failed operation. Domain errors are shown as-is,
/// anything else is reported generically.
pub fn error_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<PayError>() {
        Some(PayError::Database(_)) | Some(PayError::TelegramApi(_)) => {
            "Something went wrong on our side. Please try again later.".to_string()
        }
        Some(PayError::WalletNotFound) => {
            "You don't have a wallet yet. Use /start to create one.".to_string()
        }
        Some(PayError::ProfileNotFound) => "Please use /start to register first.".to_string(),
        Some(PayError::RecipientNotFound) => {
            "No VoicePay user with a wallet is registered under that email.".to_string()
        }
        Some(PayError::InvalidAddress) => {
            "That is not a valid Algorand address (58 characters, A-Z and 2-7).".to_string()
        }
        Some(pay_error) => pay_error.to_string(),
        None => format!("Error: {}", err),
    }
}
