//! Field-level validation helpers
//!
//! Checks return `Option<String>` so callers can collect every violated
//! rule into a single `LedgerError::Validation` instead of stopping at the
//! first failure.

use bigdecimal::BigDecimal;

use crate::types::{AccountNature, AccountType, LedgerError, LedgerResult};

/// Account codes are numeric strings
pub fn check_code_numeric(code: &str) -> Option<String> {
    if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("account code '{code}' must be a numeric string"))
    } else {
        None
    }
}

/// Account names need at least two characters
pub fn check_name_length(name: &str) -> Option<String> {
    if name.trim().chars().count() < 2 {
        Some(format!(
            "account name '{}' must be at least 2 characters",
            name.trim()
        ))
    } else {
        None
    }
}

/// A declared nature must agree with the account type
pub fn check_nature_matches(account_type: AccountType, nature: AccountNature) -> Option<String> {
    if account_type.nature() != nature {
        Some(format!(
            "nature {:?} does not match account type {:?}",
            nature, account_type
        ))
    } else {
        None
    }
}

/// Journal amounts must be strictly positive
pub fn check_positive_amount(amount: &BigDecimal) -> Option<String> {
    if *amount <= BigDecimal::from(0) {
        Some(format!("amount {amount} must be positive"))
    } else {
        None
    }
}

/// Turn collected violations into a result
pub fn into_result(violations: Vec<String>) -> LedgerResult<()> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::Validation(violations))
    }
}
