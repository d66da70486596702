//! Accounting core facade coordinating the chart, journal, balances and
//! cash drawers

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use crate::drawer::{CashDrawerManager, DrawerCredit, DrawerDebit};
use crate::ledger::balance::BalanceEngine;
use crate::ledger::chart::{seed, AccountPatch, AccountSpec, ChartOfAccounts};
use crate::ledger::generators::{self, BusinessEvent};
use crate::ledger::journal::JournalManager;
use crate::traits::*;
use crate::types::*;

/// One entry point over the whole accounting core.
///
/// The UI/CRUD layer talks to this facade; each sub-manager works against
/// its own slice of the injected store and never touches another's records.
pub struct AccountingCore<S>
where
    S: AccountStore + JournalStore + DrawerStore + Clone,
{
    chart: ChartOfAccounts<S>,
    journal: JournalManager<S>,
    balance: BalanceEngine<S>,
    drawers: CashDrawerManager<S>,
}

impl<S> AccountingCore<S>
where
    S: AccountStore + JournalStore + DrawerStore + Clone,
{
    /// Core over the given storage backend, on the system clock
    pub fn new(storage: S) -> Self {
        Self::with_clock(storage, Arc::new(SystemClock))
    }

    /// Core with an injected clock for the drawer day rollover
    pub fn with_clock(storage: S, clock: Arc<dyn Clock>) -> Self {
        Self {
            chart: ChartOfAccounts::new(storage.clone()),
            journal: JournalManager::new(storage.clone()),
            balance: BalanceEngine::new(storage.clone()),
            drawers: CashDrawerManager::with_clock(storage, clock),
        }
    }

    // Account registry operations

    /// Create a new account
    pub async fn add_account(&mut self, spec: AccountSpec) -> LedgerResult<Account> {
        self.chart.add_account(spec).await
    }

    /// Apply a partial update to an account
    pub async fn update_account(&mut self, id: &str, patch: AccountPatch) -> LedgerResult<Account> {
        self.chart.update_account(id, patch).await
    }

    /// Soft-delete an account
    pub async fn deactivate_account(&mut self, id: &str) -> LedgerResult<Account> {
        self.chart.deactivate_account(id).await
    }

    /// Get an account by id
    pub async fn get_account(&self, id: &str) -> LedgerResult<Option<Account>> {
        self.chart.get_account(id).await
    }

    /// Get an account by code
    pub async fn get_by_code(&self, code: &str) -> LedgerResult<Option<Account>> {
        self.chart.get_by_code(code).await
    }

    /// All active accounts
    pub async fn list_active(&self) -> LedgerResult<Vec<Account>> {
        self.chart.list_active().await
    }

    /// Suggest the next free code under a parent
    pub async fn generate_next_code(&self, parent_id: Option<&str>) -> LedgerResult<String> {
        self.chart.generate_next_code(parent_id).await
    }

    /// Normalize a code-or-name reference to the canonical code
    pub async fn resolve(&self, reference: &str) -> LedgerResult<String> {
        self.chart.resolve(reference).await
    }

    /// Seed the standard retail chart of accounts
    pub async fn setup_standard_chart(&mut self) -> LedgerResult<HashMap<String, Account>> {
        seed::standard_retail_chart(&mut self.chart).await
    }

    // Journal operations

    /// Generate and append the entries for a business event as one atomic
    /// batch. Returns the appended entries.
    pub async fn record_event(&mut self, event: &BusinessEvent) -> LedgerResult<Vec<JournalEntry>> {
        let entries = generators::entries_for(event);
        self.journal.append_batch(entries.clone()).await?;
        Ok(entries)
    }

    /// Append a manual entry, normalizing its account references to
    /// canonical codes first
    pub async fn record_entry(&mut self, entry: JournalEntry) -> LedgerResult<JournalEntry> {
        let mut entries = self.record_entries(vec![entry]).await?;
        Ok(entries.remove(0))
    }

    /// Append a batch of manual entries as one atomic unit, normalizing
    /// account references to canonical codes first
    pub async fn record_entries(
        &mut self,
        mut entries: Vec<JournalEntry>,
    ) -> LedgerResult<Vec<JournalEntry>> {
        for entry in &mut entries {
            entry.debit_account = self.chart.resolve(&entry.debit_account).await?;
            entry.credit_account = self.chart.resolve(&entry.credit_account).await?;
        }
        self.journal.append_batch(entries.clone()).await?;
        Ok(entries)
    }

    /// All entries in the ledger
    pub async fn all_entries(&self) -> LedgerResult<Vec<JournalEntry>> {
        self.journal.all_entries().await
    }

    /// Entries dated on or before `date`
    pub async fn entries_up_to(&self, date: NaiveDate) -> LedgerResult<Vec<JournalEntry>> {
        self.journal.entries_up_to(date).await
    }

    /// Entries sharing a business document reference
    pub async fn entries_for_reference(&self, reference: &str) -> LedgerResult<Vec<JournalEntry>> {
        self.journal.entries_for_reference(reference).await
    }

    /// Entries touching an account within an optional date range
    pub async fn entries_for_account(
        &self,
        reference: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> LedgerResult<Vec<JournalEntry>> {
        self.journal.entries_for_account(reference, from, to).await
    }

    // Balance queries

    /// Balance of an account, optionally as of a date
    pub async fn account_balance(
        &self,
        code: &str,
        as_of: Option<NaiveDate>,
    ) -> LedgerResult<BigDecimal> {
        self.balance.account_balance(code, as_of).await
    }

    /// Trial balance as of a date
    pub async fn trial_balance(&self, as_of: NaiveDate) -> LedgerResult<TrialBalance> {
        self.balance.trial_balance(as_of).await
    }

    // Cash drawer operations

    /// Create or reassign a drawer
    pub async fn configure_drawer(
        &mut self,
        pos_id: &str,
        branch_id: &str,
        branch_name: &str,
        employee_id: Option<String>,
    ) -> LedgerResult<CashDrawer> {
        self.drawers
            .configure(pos_id, branch_id, branch_name, employee_id)
            .await
    }

    /// Add cash to a drawer
    pub async fn drawer_credit(
        &mut self,
        pos_id: &str,
        amount: BigDecimal,
        credit: DrawerCredit,
        user_id: &str,
    ) -> LedgerResult<CashDrawer> {
        self.drawers.credit(pos_id, amount, credit, user_id).await
    }

    /// Take cash from a drawer
    pub async fn drawer_debit(
        &mut self,
        pos_id: &str,
        amount: BigDecimal,
        debit: DrawerDebit,
        user_id: &str,
    ) -> LedgerResult<CashDrawer> {
        self.drawers.debit(pos_id, amount, debit, user_id).await
    }

    /// Close a drawer for the day against a physical count
    pub async fn close_drawer(
        &mut self,
        pos_id: &str,
        actual_counted: BigDecimal,
        user_id: &str,
        reason: Option<String>,
    ) -> LedgerResult<DrawerReconciliation> {
        self.drawers
            .close(pos_id, actual_counted, user_id, reason)
            .await
    }

    /// Current drawer state for a terminal
    pub async fn drawer(&self, pos_id: &str) -> LedgerResult<Option<CashDrawer>> {
        self.drawers.drawer(pos_id).await
    }

    /// All configured drawers
    pub async fn list_drawers(&self) -> LedgerResult<Vec<CashDrawer>> {
        self.drawers.list_drawers().await
    }

    /// Drawer transaction log, optionally narrowed to one day
    pub async fn drawer_transactions(
        &self,
        pos_id: &str,
        date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<DrawerTransaction>> {
        self.drawers.transactions_for(pos_id, date).await
    }

    /// Drawer reconciliation history
    pub async fn drawer_reconciliations(
        &self,
        pos_id: &str,
    ) -> LedgerResult<Vec<DrawerReconciliation>> {
        self.drawers.reconciliations_for(pos_id).await
    }
}
