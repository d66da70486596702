//! # Retail Accounting Core
//!
//! The accounting core of a retail/point-of-sale management system:
//! a hierarchical chart of accounts, an append-only journal of elementary
//! balanced entries, derived account and trial balances, mixed-payment
//! entry generation for business events, and a per-terminal cash drawer
//! reconciliation lifecycle.
//!
//! ## Features
//!
//! - **Chart of accounts**: typed accounts with derived debit/credit
//!   nature, code suggestions, and soft deactivation
//! - **Journal ledger**: write-once elementary entries, appended in atomic
//!   batches keyed by business reference
//! - **Balance engine**: pure, order-insensitive balance folds and trial
//!   balance reports with a drift diagnostic
//! - **Entry generators**: pure translations of sales, purchases, returns,
//!   vouchers and opening stock into journal entries
//! - **Cash drawers**: daily open/close state machine with balance
//!   carry-over and discrepancy-reasoned reconciliation
//! - **Storage abstraction**: database-agnostic design with trait-based
//!   stores per component
//!
//! ## Quick Start
//!
//! ```rust
//! use retail_accounting_core::{AccountingCore, MemoryStore};
//!
//! # async fn demo() -> retail_accounting_core::LedgerResult<()> {
//! let mut core = AccountingCore::new(MemoryStore::new());
//! let accounts = core.setup_standard_chart().await?;
//! assert!(accounts.contains_key("cash"));
//! # Ok(())
//! # }
//! ```

pub mod drawer;
pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use drawer::*;
pub use ledger::*;
pub use traits::*;
pub use types::*;
pub use utils::memory_store::MemoryStore;

// Re-export the entry generators for convenience
pub use ledger::generators;
