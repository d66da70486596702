//! Core types and data structures for the retail accounting system

use bigdecimal::BigDecimal;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Account types following standard accounting principles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Assets - what the business owns (Cash, Inventory, Receivables, etc.)
    Asset,
    /// Liabilities - what the business owes (Payables, Loans, etc.)
    Liability,
    /// Equity - owner's interest in the business
    Equity,
    /// Revenue - money earned by the business
    Revenue,
    /// Expenses - costs incurred by the business
    Expense,
}

impl AccountType {
    /// Returns the nature (normal balance side) for this account type.
    /// Assets and Expenses carry debit balances; Liabilities, Equity and
    /// Revenue carry credit balances.
    pub fn nature(&self) -> AccountNature {
        match self {
            AccountType::Asset | AccountType::Expense => AccountNature::Debit,
            AccountType::Liability | AccountType::Equity | AccountType::Revenue => {
                AccountNature::Credit
            }
        }
    }
}

/// Which side of a transaction increases an account's balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountNature {
    /// Debit entries increase the account
    Debit,
    /// Credit entries increase the account
    Credit,
}

/// A node in the chart of accounts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier for the account
    pub id: String,
    /// Numeric account code, unique across active and inactive accounts
    pub code: String,
    /// Human-readable account name
    pub name: String,
    /// Optional parent account for the hierarchical chart
    pub parent_id: Option<String>,
    /// Type of account (Asset, Liability, etc.)
    pub account_type: AccountType,
    /// Normal balance side, always derived from `account_type`
    pub nature: AccountNature,
    /// Depth in the chart tree (0 = root)
    pub level: u8,
    /// Deactivated accounts stay on record; journal entries may still
    /// reference them
    pub is_active: bool,
    /// Balance brought in when the account was opened
    pub opening_balance: BigDecimal,
    /// Free-form description
    pub description: Option<String>,
    /// When the account was created
    pub created_at: NaiveDateTime,
    /// When the account was last updated
    pub updated_at: NaiveDateTime,
}

impl Account {
    /// Create a new account with a generated id and derived nature
    pub fn new(
        code: String,
        name: String,
        account_type: AccountType,
        parent_id: Option<String>,
        level: u8,
        opening_balance: BigDecimal,
        description: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code,
            name,
            parent_id,
            account_type,
            nature: account_type.nature(),
            level,
            is_active: true,
            opening_balance,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `reference` addresses this account, by code or by name.
    /// Name matching is kept for legacy records that stored names
    /// instead of codes.
    pub fn matches(&self, reference: &str) -> bool {
        self.code == reference || self.name == reference
    }
}

/// Review status of a journal entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryStatus {
    /// Entry is final
    Approved,
    /// Entry awaits review
    UnderReview,
    /// Entry is flagged cancelled; reversal is the caller's responsibility
    Cancelled,
}

/// How a journal entry came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryKind {
    /// Keyed in by a user
    Manual,
    /// Emitted by an entry generator
    Auto,
}

/// Business operation a journal entry belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    Sale,
    Purchase,
    Receipt,
    Payment,
    StockReceipt,
    StockIssue,
    StockAdjustment,
    OpeningStock,
    SalesReturn,
    PurchaseReturn,
    Opening,
}

/// One elementary debit/credit record in the ledger.
///
/// Every entry names exactly one debit account, one credit account and a
/// single positive amount, so each entry is balanced on its own. Multi-leg
/// business events (a mixed-tender sale, revenue plus cost recognition) are
/// several entries sharing the same `reference`. Entries are appended once
/// and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique identifier for the entry
    pub id: String,
    /// Date the entry takes effect
    pub date: NaiveDate,
    /// Description of the entry
    pub description: String,
    /// Canonical code of the debited account
    pub debit_account: String,
    /// Canonical code of the credited account
    pub credit_account: String,
    /// Amount, always positive
    pub amount: BigDecimal,
    /// Business document number tying related entries together
    pub reference: String,
    /// Review status
    pub status: EntryStatus,
    /// Manual or generated
    pub kind: EntryKind,
    /// Business operation tag
    pub operation: OperationType,
    /// Reference of the originating document, if different from `reference`
    pub source_reference: Option<String>,
    /// When the entry was recorded
    pub created_at: NaiveDateTime,
}

impl JournalEntry {
    /// Create an entry emitted by a generator
    pub fn auto(
        date: NaiveDate,
        description: String,
        debit_account: String,
        credit_account: String,
        amount: BigDecimal,
        reference: String,
        operation: OperationType,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            description,
            debit_account,
            credit_account,
            amount,
            source_reference: Some(reference.clone()),
            reference,
            status: EntryStatus::Approved,
            kind: EntryKind::Auto,
            operation,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }

    /// Create a manually keyed entry
    pub fn manual(
        date: NaiveDate,
        description: String,
        debit_account: String,
        credit_account: String,
        amount: BigDecimal,
        reference: String,
        operation: OperationType,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date,
            description,
            debit_account,
            credit_account,
            amount,
            reference,
            source_reference: None,
            status: EntryStatus::Approved,
            kind: EntryKind::Manual,
            operation,
            created_at: chrono::Utc::now().naive_utc(),
        }
    }
}

/// One account's line in a trial balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalanceRow {
    /// Account the row reports on
    pub account: Account,
    /// Balance shown in the debit column, if any
    pub debit: Option<BigDecimal>,
    /// Balance shown in the credit column, if any
    pub credit: Option<BigDecimal>,
}

impl TrialBalanceRow {
    /// The reported balance regardless of column
    pub fn balance_amount(&self) -> BigDecimal {
        self.debit
            .clone()
            .or_else(|| self.credit.clone())
            .unwrap_or_else(|| BigDecimal::from(0))
    }
}

/// Trial balance report as of a date.
///
/// `difference` is a diagnostic: zero for a fully balanced ledger, but the
/// elementary-entry model does not structurally guarantee it, so the value
/// is reported rather than asserted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialBalance {
    /// Date the report was drawn for
    pub as_of_date: NaiveDate,
    /// One row per active non-root account, ordered by code
    pub rows: Vec<TrialBalanceRow>,
    /// Sum of the debit column
    pub total_debit: BigDecimal,
    /// Sum of the credit column
    pub total_credit: BigDecimal,
    /// `total_debit - total_credit`
    pub difference: BigDecimal,
}

/// Whether a drawer is taking transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawerStatus {
    Open,
    Closed,
}

/// Per-terminal cash drawer state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashDrawer {
    /// Terminal identifier, unique per drawer
    pub pos_id: String,
    /// Branch the terminal belongs to
    pub branch_id: String,
    /// Branch display name
    pub branch_name: String,
    /// Employee currently assigned to the terminal
    pub employee_id: Option<String>,
    /// Cash currently in the drawer
    pub current_balance: BigDecimal,
    /// Cash the drawer started the day with
    pub opening_balance: BigDecimal,
    /// Day of the last open/close transition
    pub last_reconciliation_date: NaiveDate,
    /// Reconciliation written by the most recent close
    pub last_reconciliation_id: Option<String>,
    /// Open or closed for the day
    pub status: DrawerStatus,
}

/// Outcome of an end-of-day drawer count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReconciliationStatus {
    /// Counted cash matched the expectation
    Closed,
    /// Counted cash differed; a reason was recorded
    Discrepancy,
}

/// End-of-day comparison of expected vs. counted cash for a terminal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawerReconciliation {
    /// Unique identifier for the reconciliation
    pub id: String,
    /// Terminal the count was taken on
    pub pos_id: String,
    /// Day the drawer was closed
    pub date: NaiveDate,
    /// Cash the drawer started the day with
    pub opening_balance: BigDecimal,
    /// Net cash movement over the day
    pub sales_cash: BigDecimal,
    /// `opening_balance + sales_cash`
    pub expected_balance: BigDecimal,
    /// Cash physically counted at close
    pub actual_counted: BigDecimal,
    /// `actual_counted - expected_balance`
    pub discrepancy: BigDecimal,
    /// Explanation, required whenever `discrepancy` is non-zero
    pub discrepancy_reason: Option<String>,
    /// User who performed the close
    pub closed_by: String,
    /// Clean close or recorded discrepancy
    pub status: ReconciliationStatus,
}

/// Kind of cash movement logged against a drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrawerTransactionKind {
    /// Day-open snapshot of the carried-forward float
    Opening,
    /// Cash taken for a sale
    Sale,
    /// Cash refunded for a return
    Return,
    /// Cash added outside a sale
    ManualAdd,
    /// Cash removed outside a return
    ManualDeduct,
    /// Day-close removal of the counted cash
    Closing,
}

impl DrawerTransactionKind {
    /// Whether this movement counts toward the intraday delta.
    /// Opening snapshots move `opening_balance` itself, so they sit outside
    /// the `current == opening + sum` invariant.
    pub fn counts_toward_delta(&self) -> bool {
        !matches!(self, DrawerTransactionKind::Opening)
    }
}

/// Immutable log entry for one drawer cash movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawerTransaction {
    /// Unique identifier for the log entry
    pub id: String,
    /// Terminal the movement happened on
    pub pos_id: String,
    /// What kind of movement this was
    pub kind: DrawerTransactionKind,
    /// Signed amount: positive into the drawer, negative out
    pub amount: BigDecimal,
    /// Day of the movement
    pub date: NaiveDate,
    /// User responsible for the movement
    pub user_id: String,
}

/// Errors that can occur in the accounting core
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("account not found: {0}")]
    AccountNotFound(String),
    #[error("journal entry not found: {0}")]
    EntryNotFound(String),
    #[error("cash drawer not found: {0}")]
    DrawerNotFound(String),
    #[error("account {0} has active child accounts")]
    HasChildren(String),
    #[error("insufficient drawer balance: available {available}, requested {requested}")]
    InsufficientBalance {
        available: BigDecimal,
        requested: BigDecimal,
    },
    #[error("drawer count is off by {discrepancy}; a reason is required")]
    ReasonRequired { discrepancy: BigDecimal },
    #[error("cash drawer {0} is already closed for the day")]
    DrawerClosed(String),
}

/// Result type for accounting operations
pub type LedgerResult<T> = Result<T, LedgerError>;
