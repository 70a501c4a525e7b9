use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Direction of a transaction from the owning user's point of view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Send,
    Receive,
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Send => write!(f, "send"),
            TransactionType::Receive => write!(f, "receive"),
        }
    }
}

impl FromStr for TransactionType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "send" => Ok(TransactionType::Send),
            "receive" => Ok(TransactionType::Receive),
            other => Err(anyhow!("Unknown transaction type: {}", other)),
        }
    }
}

/// Lifecycle of a payment: created pending, moved once to a terminal status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Pending => write!(f, "pending"),
            TransactionStatus::Completed => write!(f, "completed"),
            TransactionStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(anyhow!("Unknown transaction status: {}", other)),
        }
    }
}

/// Payment rail
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    #[default]
    Algorand,
    MobileMoney,
    Bank,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Algorand => "algorand",
            Channel::MobileMoney => "mobile_money",
            Channel::Bank => "bank",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Channel::Algorand => write!(f, "Algorand"),
            Channel::MobileMoney => write!(f, "Mobile money"),
            Channel::Bank => write!(f, "Bank"),
        }
    }
}

impl FromStr for Channel {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(' ', "_").as_str() {
            "algorand" => Ok(Channel::Algorand),
            "mobile_money" => Ok(Channel::MobileMoney),
            "bank" => Ok(Channel::Bank),
            other => Err(anyhow!("Unknown channel: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub tx_type: TransactionType,
    pub amount: f64,
    pub currency: String,
    pub channel: Channel,
    pub to_address: Option<String>,
    pub from_address: Option<String>,
    pub algorand_tx_id: Option<String>,
    pub status: TransactionStatus,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Values needed to insert a transaction row
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub tx_type: TransactionType,
    pub amount: f64,
    pub currency: String,
    pub channel: Channel,
    pub to_address: Option<String>,
    pub from_address: Option<String>,
    pub algorand_tx_id: Option<String>,
    pub status: TransactionStatus,
    pub metadata: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_spoken_form() {
        assert_eq!("mobile money".parse::<Channel>().unwrap(), Channel::MobileMoney);
        assert_eq!("Bank".parse::<Channel>().unwrap(), Channel::Bank);
        assert_eq!("algorand".parse::<Channel>().unwrap(), Channel::Algorand);
        assert!("carrier pigeon".parse::<Channel>().is_err());
    }

    #[test]
    fn test_status_text_matches_stored_form() {
        for status in [
            TransactionStatus::Pending,
            TransactionStatus::Completed,
            TransactionStatus::Failed,
        ] {
            assert_eq!(status.to_string().parse::<TransactionStatus>().unwrap(), status);
        }
    }
}
