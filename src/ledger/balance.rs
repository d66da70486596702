//! Balance computation from the journal
//!
//! Balances are always derived: an account's balance is its opening
//! balance folded with every journal entry that touches it, honoring its
//! debit/credit nature. Nothing in the system stores a running balance.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::traits::{AccountStore, JournalStore};
use crate::types::*;

/// Fold an account's balance from its opening balance and a set of entries.
///
/// Where the account is the debit side, the amount is added under a Debit
/// nature and subtracted under a Credit nature; the credit side is the
/// inverse. Entries match on the account's code or its name (legacy records
/// stored names). The fold is pure and order-insensitive: any permutation
/// of the same entry set yields the same balance.
pub fn account_balance(account: &Account, entries: &[JournalEntry]) -> BigDecimal {
    let mut balance = account.opening_balance.clone();
    for entry in entries {
        if account.matches(&entry.debit_account) {
            match account.nature {
                AccountNature::Debit => balance += &entry.amount,
                AccountNature::Credit => balance -= &entry.amount,
            }
        }
        if account.matches(&entry.credit_account) {
            match account.nature {
                AccountNature::Debit => balance -= &entry.amount,
                AccountNature::Credit => balance += &entry.amount,
            }
        }
    }
    balance
}

/// Read-side engine answering balance queries over the stores
pub struct BalanceEngine<S> {
    storage: S,
}

impl<S: AccountStore + JournalStore> BalanceEngine<S> {
    /// Create an engine over the given storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Balance of the account with `code`, optionally as of a date
    pub async fn account_balance(
        &self,
        code: &str,
        as_of: Option<NaiveDate>,
    ) -> LedgerResult<BigDecimal> {
        let account = self
            .storage
            .account_by_code(code)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(code.to_string()))?;
        let entries = match as_of {
            Some(date) => self.storage.entries_up_to(date).await?,
            None => self.storage.all_entries().await?,
        };
        Ok(account_balance(&account, &entries))
    }

    /// Trial balance over all active non-root accounts as of a date.
    ///
    /// Each balance lands in the debit or credit column according to its
    /// sign and the account's nature; `difference` reports
    /// `total_debit - total_credit` without asserting it is zero.
    pub async fn trial_balance(&self, as_of: NaiveDate) -> LedgerResult<TrialBalance> {
        let entries = self.storage.entries_up_to(as_of).await?;
        let mut accounts: Vec<Account> = self
            .storage
            .list_accounts(false)
            .await?
            .into_iter()
            .filter(|account| account.level > 0)
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let zero = BigDecimal::from(0);
        let mut rows = Vec::with_capacity(accounts.len());
        let mut total_debit = BigDecimal::from(0);
        let mut total_credit = BigDecimal::from(0);

        for account in accounts {
            let balance = account_balance(&account, &entries);
            let row = match account.nature {
                AccountNature::Debit => {
                    if balance >= zero {
                        total_debit += &balance;
                        TrialBalanceRow {
                            account,
                            debit: Some(balance),
                            credit: None,
                        }
                    } else {
                        total_credit += balance.abs();
                        TrialBalanceRow {
                            account,
                            debit: None,
                            credit: Some(balance.abs()),
                        }
                    }
                }
                AccountNature::Credit => {
                    if balance >= zero {
                        total_credit += &balance;
                        TrialBalanceRow {
                            account,
                            debit: None,
                            credit: Some(balance),
                        }
                    } else {
                        total_debit += balance.abs();
                        TrialBalanceRow {
                            account,
                            debit: Some(balance.abs()),
                            credit: None,
                        }
                    }
                }
            };
            rows.push(row);
        }

        let difference = &total_debit - &total_credit;
        Ok(TrialBalance {
            as_of_date: as_of,
            rows,
            total_debit,
            total_credit,
            difference,
        })
    }
}
