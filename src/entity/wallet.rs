use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's Algorand wallet. `balance` is a cached mirror of the chain
/// balance in ALGO and is only as fresh as the last refresh or local adjustment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: Uuid,
    pub algorand_address: String,
    /// Base64 of the mnemonic. Obfuscated, not encrypted.
    pub encrypted_mnemonic: String,
    pub balance: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
