use serde::{Deserialize, Serialize};

use crate::constants::MAX_LOGIN_FAILURES_PER_DAY;
use crate::error::{AppError, Result};

/// Failed-login counter for one user, reset when the day rolls over
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginLimit {
    /// Day start (milliseconds) the counter belongs to
    pub date: i64,
    /// Failed attempts on that day
    pub count: u32,
}

impl LoginLimit {
    pub fn new(today: i64) -> Self {
        Self {
            date: today,
            count: 0,
        }
    }

    /// Reset the counter if it belongs to an earlier day
    fn roll(&mut self, today: i64) {
        if self.date != today {
            self.date = today;
            self.count = 0;
        }
    }

    /// Returns Err(LoginLimitExceeded) once today's failures reach the limit
    pub fn check(&mut self, today: i64) -> Result<()> {
        self.roll(today);

        if self.count >= MAX_LOGIN_FAILURES_PER_DAY {
            tracing::warn!(
                "Daily login limit reached: {}/{}",
                self.count,
                MAX_LOGIN_FAILURES_PER_DAY
            );
            return Err(AppError::LoginLimitExceeded);
        }

        Ok(())
    }

    pub fn record_failure(&mut self, today: i64) {
        self.roll(today);
        self.count = self.count.saturating_add(1);
    }
}
