pub mod client;
#[cfg(test)]
pub mod fake_client;
pub mod faucet;
pub mod payment;
pub mod transaction;
pub mod utils;
pub mod wallet;

// Re-export commonly used items
pub use client::{AlgodClient, ChainClient};
pub use faucet::{DispenserFaucet, Faucet};
pub use payment::{get_algo_balance, send_algo};
pub use transaction::{PaymentTransaction, SignedTransaction, SuggestedParams};
pub use utils::{algos_to_microalgos, microalgos_to_algos};
pub use wallet::{account_from_mnemonic, decode_address, encode_address, generate_wallet};
