use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Per-user daily send quota
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserLimits {
    pub user_id: Uuid,
    pub daily_send_limit: f64,
    pub daily_sent_amount: f64,
    pub is_pro: bool,
    pub last_reset_date: NaiveDate,
}

/// Result of a daily limit check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimitCheck {
    pub can_send: bool,
    pub limit: f64,
    pub sent: f64,
    pub remaining: f64,
}

impl UserLimits {
    pub fn new(user_id: Uuid, daily_send_limit: f64, today: NaiveDate) -> Self {
        Self {
            user_id,
            daily_send_limit,
            daily_sent_amount: 0.0,
            is_pro: false,
            last_reset_date: today,
        }
    }

    /// Zero the counter when the stored date is not `today`.
    /// Returns true if a reset happened.
    pub fn roll_over(&mut self, today: NaiveDate) -> bool {
        if self.last_reset_date != today {
            self.daily_sent_amount = 0.0;
            self.last_reset_date = today;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.daily_send_limit - self.daily_sent_amount).max(0.0)
    }

    pub fn check(&self, amount: f64) -> LimitCheck {
        LimitCheck {
            can_send: self.daily_sent_amount + amount <= self.daily_send_limit,
            limit: self.daily_send_limit,
            sent: self.daily_sent_amount,
            remaining: self.remaining(),
        }
    }
}
