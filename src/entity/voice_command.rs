use crate::entity::Channel;
use serde::{Deserialize, Serialize};

/// Intent recognised in a transcript
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VoiceAction {
    Send,
    Balance,
    History,
    Invest,
}

impl std::fmt::Display for VoiceAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VoiceAction::Send => write!(f, "send"),
            VoiceAction::Balance => write!(f, "balance"),
            VoiceAction::History => write!(f, "history"),
            VoiceAction::Invest => write!(f, "invest"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VoiceCommand {
    pub action: VoiceAction,
    pub amount: Option<f64>,
    pub recipient: Option<String>,
    pub channel: Option<Channel>,
}

impl VoiceCommand {
    pub fn action(action: VoiceAction) -> Self {
        Self {
            action,
            amount: None,
            recipient: None,
            channel: None,
        }
    }
}
