//! Append-only journal management
//!
//! The journal is write-once: entries are validated, appended, and never
//! mutated afterwards. Cancelling an entry is a status concern handled by
//! the caller with a compensating entry; the manager offers no update or
//! delete path.

use chrono::NaiveDate;
use tracing::debug;

use crate::traits::{AccountStore, JournalStore};
use crate::types::*;
use crate::utils::validation;

/// Manager for the append-only journal of elementary entries
pub struct JournalManager<S> {
    storage: S,
}

impl<S: JournalStore + AccountStore> JournalManager<S> {
    /// Create a manager over the given storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Append a single entry
    pub async fn append(&mut self, entry: JournalEntry) -> LedgerResult<()> {
        self.append_batch(vec![entry]).await
    }

    /// Append a batch of entries as one atomic unit.
    ///
    /// The whole batch is validated before anything is written; a failed
    /// validation leaves the journal untouched, so a multi-leg business
    /// event is never observed partially applied.
    pub async fn append_batch(&mut self, entries: Vec<JournalEntry>) -> LedgerResult<()> {
        let mut violations = Vec::new();
        for entry in &entries {
            if let Some(v) = validation::check_positive_amount(&entry.amount) {
                violations.push(format!("entry '{}': {v}", entry.reference));
            }
        }
        validation::into_result(violations)?;

        for entry in &entries {
            for reference in [&entry.debit_account, &entry.credit_account] {
                if !self.account_exists(reference).await? {
                    return Err(LedgerError::AccountNotFound(reference.clone()));
                }
            }
        }

        let count = entries.len();
        let reference = entries.first().map(|entry| entry.reference.clone());
        self.storage.append_entries(&entries).await?;
        debug!(count, reference = reference.as_deref(), "journal batch appended");

        Ok(())
    }

    /// Get an entry by id
    pub async fn entry(&self, id: &str) -> LedgerResult<Option<JournalEntry>> {
        self.storage.entry(id).await
    }

    /// Get an entry by id, erroring when unknown
    pub async fn entry_required(&self, id: &str) -> LedgerResult<JournalEntry> {
        self.storage
            .entry(id)
            .await?
            .ok_or_else(|| LedgerError::EntryNotFound(id.to_string()))
    }

    /// All entries in the ledger
    pub async fn all_entries(&self) -> LedgerResult<Vec<JournalEntry>> {
        self.storage.all_entries().await
    }

    /// Entries dated on or before `date`
    pub async fn entries_up_to(&self, date: NaiveDate) -> LedgerResult<Vec<JournalEntry>> {
        self.storage.entries_up_to(date).await
    }

    /// Entries sharing a business document reference
    pub async fn entries_for_reference(&self, reference: &str) -> LedgerResult<Vec<JournalEntry>> {
        self.storage.entries_for_reference(reference).await
    }

    /// Entries touching an account, addressed by code or name, optionally
    /// narrowed to a date range
    pub async fn entries_for_account(
        &self,
        reference: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<Vec<JournalEntry>> {
        let account = self
            .lookup_account(reference)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(reference.to_string()))?;

        let entries = self.storage.all_entries().await?;
        Ok(entries
            .into_iter()
            .filter(|entry| {
                account.matches(&entry.debit_account) || account.matches(&entry.credit_account)
            })
            .filter(|entry| from.is_none_or(|d| entry.date >= d))
            .filter(|entry| to.is_none_or(|d| entry.date <= d))
            .collect())
    }

    async fn account_exists(&self, reference: &str) -> LedgerResult<bool> {
        Ok(self.lookup_account(reference).await?.is_some())
    }

    async fn lookup_account(&self, reference: &str) -> LedgerResult<Option<Account>> {
        if let Some(account) = self.storage.account_by_code(reference).await? {
            return Ok(Some(account));
        }
        let accounts = self.storage.list_accounts(true).await?;
        Ok(accounts.into_iter().find(|account| account.matches(reference)))
    }
}
