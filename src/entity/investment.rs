use anyhow::anyhow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    Active,
    Withdrawn,
}

impl std::fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvestmentStatus::Active => write!(f, "active"),
            InvestmentStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

impl FromStr for InvestmentStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(InvestmentStatus::Active),
            "withdrawn" => Ok(InvestmentStatus::Withdrawn),
            other => Err(anyhow!("Unknown investment status: {}", other)),
        }
    }
}

/// Simulated investment. No funds leave the wallet except through the cached balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount_invested: f64,
    pub apy_rate: f64,
    pub start_date: DateTime<Utc>,
    pub current_value: f64,
    pub status: InvestmentStatus,
}

impl Investment {
    /// Compound growth: `amount * (1 + apy/100)^(days/365)`
    pub fn compound_value(amount: f64, apy_rate: f64, days: i64) -> f64 {
        let days = days.max(0) as f64;
        amount * (1.0 + apy_rate / 100.0).powf(days / 365.0)
    }

    /// Whole days elapsed since `start_date`
    pub fn days_held(&self, now: DateTime<Utc>) -> i64 {
        (now - self.start_date).num_days().max(0)
    }

    pub fn value_at(&self, now: DateTime<Utc>) -> f64 {
        Self::compound_value(self.amount_invested, self.apy_rate, self.days_held(now))
    }

    pub fn earnings_at(&self, now: DateTime<Utc>) -> f64 {
        self.value_at(now) - self.amount_invested
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_value_after_one_year() {
        let value = Investment::compound_value(1000.0, 5.0, 365);
        assert!((value - 1050.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_on_day_zero_is_principal() {
        assert_eq!(Investment::compound_value(250.0, 8.0, 0), 250.0);
    }

    #[test]
    fn test_value_non_decreasing_in_days() {
        let mut previous = 0.0;
        for days in 0..800 {
            let value = Investment::compound_value(100.0, 4.5, days);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn test_value_at_uses_whole_days() {
        let now = Utc::now();
        let investment = Investment {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount_invested: 100.0,
            apy_rate: 10.0,
            start_date: now - Duration::hours(47),
            current_value: 100.0,
            status: InvestmentStatus::Active,
        };
        assert_eq!(investment.days_held(now), 1);
        assert_eq!(
            investment.value_at(now),
            Investment::compound_value(100.0, 10.0, 1)
        );
    }
}
