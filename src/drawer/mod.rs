//! Cash drawer lifecycle for POS terminals
//!
//! Each terminal owns one drawer that cycles daily: open, trading, closed.
//! Closing reconciles the physically counted cash against the expectation
//! derived from the day's transaction log. A drawer closes at most once per
//! day and re-enters the open state automatically on the next calendar
//! day's first operation, carrying its balance forward as the new opening
//! float.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::traits::{Clock, DrawerStore, SystemClock};
use crate::types::*;

/// Cash movements that add to the drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerCredit {
    /// Opening float put into the drawer; also raises the opening balance
    Opening,
    /// Cash taken for a sale
    Sale,
    /// Cash added outside a sale
    ManualAdd,
}

impl DrawerCredit {
    fn kind(self) -> DrawerTransactionKind {
        match self {
            DrawerCredit::Opening => DrawerTransactionKind::Opening,
            DrawerCredit::Sale => DrawerTransactionKind::Sale,
            DrawerCredit::ManualAdd => DrawerTransactionKind::ManualAdd,
        }
    }
}

/// Cash movements that take from the drawer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawerDebit {
    /// Cash refunded for a return
    Return,
    /// Cash removed outside a return
    ManualDeduct,
}

impl DrawerDebit {
    fn kind(self) -> DrawerTransactionKind {
        match self {
            DrawerDebit::Return => DrawerTransactionKind::Return,
            DrawerDebit::ManualDeduct => DrawerTransactionKind::ManualDeduct,
        }
    }
}

/// Per-terminal drawer state machine over an injected store
pub struct CashDrawerManager<S: DrawerStore> {
    storage: S,
    clock: Arc<dyn Clock>,
}

impl<S: DrawerStore> CashDrawerManager<S> {
    /// Manager on the system clock
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Manager on an injected clock
    pub fn with_clock(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self { storage, clock }
    }

    /// Create or reassign a drawer. Idempotent: an existing drawer keeps
    /// its balances and status and only the assignment fields change.
    pub async fn configure(
        &mut self,
        pos_id: &str,
        branch_id: &str,
        branch_name: &str,
        employee_id: Option<String>,
    ) -> LedgerResult<CashDrawer> {
        let drawer = match self.storage.drawer(pos_id).await? {
            Some(mut drawer) => {
                drawer.branch_id = branch_id.to_string();
                drawer.branch_name = branch_name.to_string();
                drawer.employee_id = employee_id;
                drawer
            }
            None => {
                info!(pos_id, branch_id, "cash drawer created");
                CashDrawer {
                    pos_id: pos_id.to_string(),
                    branch_id: branch_id.to_string(),
                    branch_name: branch_name.to_string(),
                    employee_id,
                    current_balance: BigDecimal::from(0),
                    opening_balance: BigDecimal::from(0),
                    last_reconciliation_date: self.clock.today(),
                    last_reconciliation_id: None,
                    status: DrawerStatus::Open,
                }
            }
        };
        self.storage.save_drawer(&drawer).await?;
        Ok(drawer)
    }

    /// Roll a drawer closed on a prior day into a fresh open day, carrying
    /// `current_balance` forward as the new opening float. No-op for a
    /// drawer that is already open or was closed today.
    pub async fn ensure_open_for_today(&mut self, pos_id: &str) -> LedgerResult<CashDrawer> {
        let mut drawer = self.drawer_required(pos_id).await?;
        let today = self.clock.today();

        if drawer.status == DrawerStatus::Closed && today > drawer.last_reconciliation_date {
            drawer.opening_balance = drawer.current_balance.clone();
            drawer.status = DrawerStatus::Open;
            drawer.last_reconciliation_date = today;
            self.storage.save_drawer(&drawer).await?;

            let user = drawer
                .employee_id
                .clone()
                .unwrap_or_else(|| "system".to_string());
            self.log(pos_id, DrawerTransactionKind::Opening, drawer.current_balance.clone(), &user)
                .await?;
            info!(pos_id, %today, "cash drawer reopened for new day");
        }

        Ok(drawer)
    }

    /// Add cash to the drawer
    pub async fn credit(
        &mut self,
        pos_id: &str,
        amount: BigDecimal,
        credit: DrawerCredit,
        user_id: &str,
    ) -> LedgerResult<CashDrawer> {
        let mut drawer = self.ensure_open_for_today(pos_id).await?;

        drawer.current_balance += &amount;
        if credit == DrawerCredit::Opening {
            drawer.opening_balance += &amount;
        }
        self.storage.save_drawer(&drawer).await?;
        self.log(pos_id, credit.kind(), amount, user_id).await?;
        debug!(pos_id, ?credit, "drawer credited");

        Ok(drawer)
    }

    /// Take cash from the drawer. Fails without effect when the drawer
    /// holds less than the requested amount.
    pub async fn debit(
        &mut self,
        pos_id: &str,
        amount: BigDecimal,
        debit: DrawerDebit,
        user_id: &str,
    ) -> LedgerResult<CashDrawer> {
        let mut drawer = self.ensure_open_for_today(pos_id).await?;

        if amount > drawer.current_balance {
            return Err(LedgerError::InsufficientBalance {
                available: drawer.current_balance,
                requested: amount,
            });
        }

        drawer.current_balance -= &amount;
        self.storage.save_drawer(&drawer).await?;
        self.log(pos_id, debit.kind(), -amount, user_id).await?;
        debug!(pos_id, ?debit, "drawer debited");

        Ok(drawer)
    }

    /// Close the drawer for the day against a physical cash count.
    ///
    /// A non-zero discrepancy between the count and the expected balance
    /// requires a reason; the close is aborted without one. On success the
    /// reconciliation is recorded, both balances reset to zero, and the
    /// drawer stays closed until the next calendar day.
    pub async fn close(
        &mut self,
        pos_id: &str,
        actual_counted: BigDecimal,
        user_id: &str,
        reason: Option<String>,
    ) -> LedgerResult<DrawerReconciliation> {
        let mut drawer = self.ensure_open_for_today(pos_id).await?;
        if drawer.status == DrawerStatus::Closed {
            return Err(LedgerError::DrawerClosed(pos_id.to_string()));
        }

        let today = self.clock.today();
        let zero = BigDecimal::from(0);
        let sales_cash = &drawer.current_balance - &drawer.opening_balance;
        let expected_balance = &drawer.opening_balance + &sales_cash;
        let discrepancy = &actual_counted - &expected_balance;

        if discrepancy != zero && reason.is_none() {
            return Err(LedgerError::ReasonRequired { discrepancy });
        }

        let status = if discrepancy == zero {
            ReconciliationStatus::Closed
        } else {
            ReconciliationStatus::Discrepancy
        };
        let reconciliation = DrawerReconciliation {
            id: uuid::Uuid::new_v4().to_string(),
            pos_id: pos_id.to_string(),
            date: today,
            opening_balance: drawer.opening_balance.clone(),
            sales_cash,
            expected_balance,
            actual_counted: actual_counted.clone(),
            discrepancy: discrepancy.clone(),
            discrepancy_reason: reason,
            closed_by: user_id.to_string(),
            status,
        };
        self.storage.save_reconciliation(&reconciliation).await?;

        drawer.current_balance = BigDecimal::from(0);
        drawer.opening_balance = BigDecimal::from(0);
        drawer.status = DrawerStatus::Closed;
        drawer.last_reconciliation_date = today;
        drawer.last_reconciliation_id = Some(reconciliation.id.clone());
        self.storage.save_drawer(&drawer).await?;

        self.log(pos_id, DrawerTransactionKind::Closing, -actual_counted, user_id)
            .await?;

        if discrepancy != zero {
            warn!(pos_id, %discrepancy, "cash drawer closed with discrepancy");
        } else {
            info!(pos_id, "cash drawer closed clean");
        }

        Ok(reconciliation)
    }

    /// Current drawer state for a terminal
    pub async fn drawer(&self, pos_id: &str) -> LedgerResult<Option<CashDrawer>> {
        self.storage.drawer(pos_id).await
    }

    /// All configured drawers
    pub async fn list_drawers(&self) -> LedgerResult<Vec<CashDrawer>> {
        self.storage.list_drawers().await
    }

    /// Transaction log for a terminal, optionally narrowed to one day
    pub async fn transactions_for(
        &self,
        pos_id: &str,
        date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<DrawerTransaction>> {
        self.storage.drawer_transactions(pos_id, date).await
    }

    /// Reconciliation history for a terminal
    pub async fn reconciliations_for(
        &self,
        pos_id: &str,
    ) -> LedgerResult<Vec<DrawerReconciliation>> {
        self.storage.reconciliations_for(pos_id).await
    }

    async fn drawer_required(&self, pos_id: &str) -> LedgerResult<CashDrawer> {
        self.storage
            .drawer(pos_id)
            .await?
            .ok_or_else(|| LedgerError::DrawerNotFound(pos_id.to_string()))
    }

    async fn log(
        &mut self,
        pos_id: &str,
        kind: DrawerTransactionKind,
        amount: BigDecimal,
        user_id: &str,
    ) -> LedgerResult<()> {
        let txn = DrawerTransaction {
            id: uuid::Uuid::new_v4().to_string(),
            pos_id: pos_id.to_string(),
            kind,
            amount,
            date: self.clock.today(),
            user_id: user_id.to_string(),
        };
        self.storage.append_drawer_transaction(&txn).await
    }
}
