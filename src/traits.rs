//! Storage abstraction for the accounting core
//!
//! Each component owns its records through a dedicated trait: the chart of
//! accounts, the journal, and the cash drawers never touch each other's
//! keys. Any backend (PostgreSQL, SQLite, key-value, in-memory) can host
//! the core by implementing these traits.
//!
//! Atomicity contract: every mutating method is one atomic operation
//! against its key, with no interleaving of other writers to the same key.
//! `append_entries` applies a whole batch or nothing. Reads may run
//! concurrently with writes but must be served from a consistent snapshot.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::types::*;

/// Storage for the chart of accounts
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert or replace an account
    async fn save_account(&mut self, account: &Account) -> LedgerResult<()>;

    /// Get an account by id
    async fn account(&self, id: &str) -> LedgerResult<Option<Account>>;

    /// Get an account by code
    async fn account_by_code(&self, code: &str) -> LedgerResult<Option<Account>>;

    /// List accounts; inactive ones only when `include_inactive` is set
    async fn list_accounts(&self, include_inactive: bool) -> LedgerResult<Vec<Account>>;
}

/// Storage for the append-only journal
#[async_trait]
pub trait JournalStore: Send + Sync {
    /// Append a batch of entries as one atomic unit. A batch emitted for a
    /// multi-leg business event must never be observed partially applied.
    async fn append_entries(&mut self, entries: &[JournalEntry]) -> LedgerResult<()>;

    /// Get an entry by id
    async fn entry(&self, id: &str) -> LedgerResult<Option<JournalEntry>>;

    /// All entries in the ledger
    async fn all_entries(&self) -> LedgerResult<Vec<JournalEntry>>;

    /// Entries dated on or before `date`
    async fn entries_up_to(&self, date: NaiveDate) -> LedgerResult<Vec<JournalEntry>>;

    /// Entries sharing a business document reference
    async fn entries_for_reference(&self, reference: &str) -> LedgerResult<Vec<JournalEntry>>;
}

/// Storage for cash drawers, their reconciliations and transaction logs
#[async_trait]
pub trait DrawerStore: Send + Sync {
    /// Insert or replace a drawer record
    async fn save_drawer(&mut self, drawer: &CashDrawer) -> LedgerResult<()>;

    /// Get a drawer by terminal id
    async fn drawer(&self, pos_id: &str) -> LedgerResult<Option<CashDrawer>>;

    /// All configured drawers
    async fn list_drawers(&self) -> LedgerResult<Vec<CashDrawer>>;

    /// Record an end-of-day reconciliation
    async fn save_reconciliation(&mut self, rec: &DrawerReconciliation) -> LedgerResult<()>;

    /// Reconciliation history for a terminal
    async fn reconciliations_for(&self, pos_id: &str) -> LedgerResult<Vec<DrawerReconciliation>>;

    /// Append to a drawer's immutable transaction log
    async fn append_drawer_transaction(&mut self, txn: &DrawerTransaction) -> LedgerResult<()>;

    /// Transaction log for a terminal, optionally narrowed to one day
    async fn drawer_transactions(
        &self,
        pos_id: &str,
        date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<DrawerTransaction>>;
}

/// Source of the current business date.
///
/// The drawer state machine rolls over on calendar-day boundaries; tests
/// inject a fixed clock to drive the rollover.
pub trait Clock: Send + Sync {
    /// Today's date
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the system time (UTC)
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Utc::now().date_naive()
    }
}

/// Clock pinned to a settable date, for tests driving day rollover
#[derive(Debug, Clone)]
pub struct ManualClock {
    today: std::sync::Arc<std::sync::RwLock<NaiveDate>>,
}

impl ManualClock {
    /// Clock starting at `today`
    pub fn new(today: NaiveDate) -> Self {
        Self {
            today: std::sync::Arc::new(std::sync::RwLock::new(today)),
        }
    }

    /// Move the clock to a new date
    pub fn set_today(&self, today: NaiveDate) {
        *self.today.write().unwrap() = today;
    }
}

impl Clock for ManualClock {
    fn today(&self) -> NaiveDate {
        *self.today.read().unwrap()
    }
}
