mod investment;
mod pay_error;
mod profile;
mod state;
mod transaction;
mod user_limits;
mod voice_command;
mod wallet;

pub use investment::{Investment, InvestmentStatus};
pub use pay_error::PayError;
pub use profile::Profile;
pub use state::State;
pub use transaction::{Channel, NewTransaction, Transaction, TransactionStatus, TransactionType};
pub use user_limits::{LimitCheck, UserLimits};
pub use voice_command::{VoiceAction, VoiceCommand};
pub use wallet::Wallet;
