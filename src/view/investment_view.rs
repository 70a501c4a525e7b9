use crate::entity::Investment;
use crate::interactor::investment_interactor::InvestmentSummary;
use crate::utils::format_amount;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, Bot};

#[async_trait]
pub trait InvestmentView: Send + Sync {
    async fn prompt_for_confirmation(&self, amount: f64, apy_rate: f64) -> Result<()>;
    async fn prompt_for_amount(&self, apy_rate: f64) -> Result<()>;
    async fn display_invested(&self, investment: &Investment) -> Result<()>;
    async fn display_investments(&self, summaries: &[InvestmentSummary]) -> Result<()>;
    async fn display_withdrawn(&self, summary: &InvestmentSummary) -> Result<()>;
    async fn display_cancelled(&self) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramInvestmentView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramInvestmentView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send_html(&self, text: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

/// Projected value after one year, shown before the user commits
pub fn projection_text(amount: f64, apy_rate: f64) -> String {
    format!(
        "Invest <b>{}</b> at {:.2}% APY?\nIn one year it would be worth about {}.\n\n\
        Reply <b>yes</b> to confirm or <b>no</b> to cancel.",
        format_amount(amount, "ALGO"),
        apy_rate,
        format_amount(Investment::compound_value(amount, apy_rate, 365), "ALGO")
    )
}

pub fn investments_text(summaries: &[InvestmentSummary]) -> String {
    if summaries.is_empty() {
        return "You have no active investments. Try <i>invest 10</i>.".to_string();
    }

    let mut text = String::from("<b>Active investments</b>\n");
    for summary in summaries {
        text.push_str(&format!(
            "\n• {} at {:.2}% APY, {} day(s)\n  Value: {} (+{})\n  /withdraw {}",
            format_amount(summary.investment.amount_invested, "ALGO"),
            summary.investment.apy_rate,
            summary.days_held,
            format_amount(summary.current_value, "ALGO"),
            format_amount(summary.earnings, "ALGO"),
            summary.investment.id
        ));
    }
    text
}

#[async_trait]
impl InvestmentView for TelegramInvestmentView {
    async fn prompt_for_confirmation(&self, amount: f64, apy_rate: f64) -> Result<()> {
        self.send_html(projection_text(amount, apy_rate)).await
    }

    async fn prompt_for_amount(&self, apy_rate: f64) -> Result<()> {
        self.send_html(format!(
            "How much would you like to invest? Current APY is {:.2}%.\n\
            Say <i>invest 10</i> or use /invest 10.",
            apy_rate
        ))
        .await
    }

    async fn display_invested(&self, investment: &Investment) -> Result<()> {
        self.send_html(format!(
            "📈 Invested {} at {:.2}% APY.\nUse /investments to follow its value.",
            format_amount(investment.amount_invested, "ALGO"),
            investment.apy_rate
        ))
        .await
    }

    async fn display_investments(&self, summaries: &[InvestmentSummary]) -> Result<()> {
        self.send_html(investments_text(summaries)).await
    }

    async fn display_withdrawn(&self, summary: &InvestmentSummary) -> Result<()> {
        self.send_html(format!(
            "✅ Withdrew {} (earned {}). The funds are back in your balance.",
            format_amount(summary.current_value, "ALGO"),
            format_amount(summary.earnings, "ALGO")
        ))
        .await
    }

    async fn display_cancelled(&self) -> Result<()> {
        self.bot
            .send_message(self.chat_id, "Investment cancelled.")
            .await?;
        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("❌ {}", error_message))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::InvestmentStatus;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_projection_uses_compound_formula() {
        let text = projection_text(100.0, 5.0);
        assert!(text.contains("105.000000 ALGO"));
        assert!(text.contains("5.00% APY"));
    }

    #[test]
    fn test_investments_list_offers_withdraw() {
        let investment = Investment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount_invested: 10.0,
            apy_rate: 5.0,
            start_date: Utc::now(),
            current_value: 10.0,
            status: InvestmentStatus::Active,
        };
        let id = investment.id;
        let summary = InvestmentSummary {
            investment,
            days_held: 0,
            current_value: 10.0,
            earnings: 0.0,
        };

        let text = investments_text(&[summary]);
        assert!(text.contains(&format!("/withdraw {}", id)));
        assert!(text.contains("0 day(s)"));
    }
}
