use chrono::NaiveDate;

use crate::constants::{ERR_INVALID_DAY, ERR_INVALID_MONTH, ERR_INVALID_PASSWORD, ERR_INVALID_USERNAME};
use crate::dates::{parse_day, parse_month};
use crate::error::AppError;
use crate::models::{Credentials, User};

/// `YYYYMM` path segment to the first day of that month
pub fn month_param(raw: &str) -> Result<NaiveDate, AppError> {
    parse_month(raw).ok_or_else(|| AppError::InvalidInput(ERR_INVALID_MONTH.to_string()))
}

/// `YYYY-MM-DD` (or `YYYYMMDD`) path segment
pub fn day_param(raw: &str) -> Result<NaiveDate, AppError> {
    parse_day(raw).ok_or_else(|| AppError::InvalidInput(ERR_INVALID_DAY.to_string()))
}

/// Format checks for a new account
pub fn validate_credentials(credentials: &Credentials) -> Result<(), AppError> {
    if !User::validate_username(&credentials.username) {
        tracing::warn!("Invalid username format: {:?}", credentials.username);
        return Err(AppError::InvalidInput(ERR_INVALID_USERNAME.to_string()));
    }

    if !User::validate_password(&credentials.password) {
        return Err(AppError::InvalidInput(ERR_INVALID_PASSWORD.to_string()));
    }

    Ok(())
}
