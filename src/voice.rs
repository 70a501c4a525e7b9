//! Rule-based interpretation of spoken payment commands.
//!
//! A transcript is matched against the send pattern first, then the balance,
//! history and invest keywords. The first rule that matches wins.

use crate::entity::{Channel, VoiceAction, VoiceCommand};
use crate::utils::format_amount;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

lazy_static! {
    static ref SEND_RE: Regex = Regex::new(
        r"(?i)send\s+(\d+(?:\.\d+)?)\s*(?:dollars?|algos?|usd)?\s+to\s+(.+?)(?:\s+(?:via|using)\s+(mobile money|bank|algorand))?\s*$"
    )
    .unwrap();
    static ref INVEST_AMOUNT_RE: Regex = Regex::new(r"(?i)invest\s+(\d+(?:\.\d+)?)").unwrap();
}

/// Map a free-text transcript to a command, or `None` if nothing matches.
pub fn parse_voice_command(transcript: &str) -> Option<VoiceCommand> {
    let text = transcript.trim();
    let lowered = text.to_lowercase();

    if let Some(cap) = SEND_RE.captures(text) {
        let amount = cap.get(1)?.as_str().parse::<f64>().ok()?;
        let recipient = cap.get(2)?.as_str().trim().to_string();
        let channel = match cap.get(3) {
            Some(m) => m.as_str().parse::<Channel>().ok()?,
            None => Channel::Algorand,
        };

        debug!("Parsed send command: {} to {} via {}", amount, recipient, channel.as_str());
        return Some(VoiceCommand {
            action: VoiceAction::Send,
            amount: Some(amount),
            recipient: Some(recipient),
            channel: Some(channel),
        });
    }

    if lowered.contains("balance") || lowered.contains("how much") {
        return Some(VoiceCommand::action(VoiceAction::Balance));
    }

    if lowered.contains("history") || lowered.contains("transactions") {
        return Some(VoiceCommand::action(VoiceAction::History));
    }

    if lowered.contains("invest") {
        let amount = INVEST_AMOUNT_RE
            .captures(text)
            .and_then(|cap| cap.get(1)?.as_str().parse::<f64>().ok());
        return Some(VoiceCommand {
            amount,
            ..VoiceCommand::action(VoiceAction::Invest)
        });
    }

    None
}

/// Sentence read back to the user before a command is carried out
pub fn describe(command: &VoiceCommand) -> String {
    match command.action {
        VoiceAction::Send => {
            let channel = command.channel.unwrap_or_default();
            let currency = if channel == Channel::Algorand { "ALGO" } else { "USD" };
            format!(
                "Send {} to {} via {}?",
                format_amount(command.amount.unwrap_or_default(), currency),
                command.recipient.as_deref().unwrap_or("unknown recipient"),
                channel
            )
        }
        VoiceAction::Balance => "Checking your balance.".to_string(),
        VoiceAction::History => "Fetching your recent transactions.".to_string(),
        VoiceAction::Invest => match command.amount {
            Some(amount) => format!("Invest {}?", format_amount(amount, "ALGO")),
            None => "How much would you like to invest?".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_with_unit_defaults_to_algorand() {
        let command = parse_voice_command("send 10 dollars to alice").unwrap();
        assert_eq!(
            command,
            VoiceCommand {
                action: VoiceAction::Send,
                amount: Some(10.0),
                recipient: Some("alice".to_string()),
                channel: Some(Channel::Algorand),
            }
        );
    }

    #[test]
    fn test_send_without_unit() {
        let command = parse_voice_command("send 2.5 to bob").unwrap();
        assert_eq!(command.amount, Some(2.5));
        assert_eq!(command.recipient.as_deref(), Some("bob"));
    }

    #[test]
    fn test_send_via_mobile_money() {
        let command =
            parse_voice_command("send 50 usd to carol@example.com via mobile money").unwrap();
        assert_eq!(command.recipient.as_deref(), Some("carol@example.com"));
        assert_eq!(command.channel, Some(Channel::MobileMoney));
    }

    #[test]
    fn test_send_using_bank() {
        let command = parse_voice_command("Send 100 algos to dave@bank.io using bank").unwrap();
        assert_eq!(command.amount, Some(100.0));
        assert_eq!(command.channel, Some(Channel::Bank));
    }

    #[test]
    fn test_send_keeps_recipient_case() {
        let address = "7ZUECA7HFLZTXENRV24SHLU4AVPUTMTTDUFUBNBD64C73F3UHRTHAIOF6Q";
        let command = parse_voice_command(&format!("send 1 algo to {}", address)).unwrap();
        assert_eq!(command.recipient.as_deref(), Some(address));
    }

    #[test]
    fn test_recipient_is_trimmed() {
        let command = parse_voice_command("send 3 to   erin   ").unwrap();
        assert_eq!(command.recipient.as_deref(), Some("erin"));
    }

    #[test]
    fn test_balance_phrases() {
        for text in ["check my balance", "How much do I have"] {
            let command = parse_voice_command(text).unwrap();
            assert_eq!(command, VoiceCommand::action(VoiceAction::Balance));
        }
    }

    #[test]
    fn test_history_phrases() {
        for text in ["show history", "list my transactions"] {
            assert_eq!(
                parse_voice_command(text).unwrap().action,
                VoiceAction::History
            );
        }
    }

    #[test]
    fn test_invest_with_and_without_amount() {
        assert_eq!(parse_voice_command("invest 25").unwrap().amount, Some(25.0));

        let command = parse_voice_command("I want to invest").unwrap();
        assert_eq!(command.action, VoiceAction::Invest);
        assert_eq!(command.amount, None);
    }

    #[test]
    fn test_first_rule_wins() {
        // balance is checked before history
        assert_eq!(
            parse_voice_command("balance and history").unwrap().action,
            VoiceAction::Balance
        );
        // not a well-formed send, falls through to invest
        assert_eq!(
            parse_voice_command("send and invest").unwrap().action,
            VoiceAction::Invest
        );
    }

    #[test]
    fn test_unknown_transcript() {
        assert!(parse_voice_command("what's the weather").is_none());
        assert!(parse_voice_command("").is_none());
    }

    #[test]
    fn test_describe_send() {
        let command = parse_voice_command("send 5 to frank@x.com via bank").unwrap();
        assert_eq!(describe(&command), "Send 5.00 USD to frank@x.com via Bank?");
    }
}
