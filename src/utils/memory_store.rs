//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory store backing all three storage traits.
///
/// Every method takes a single lock acquisition, so each mutation is atomic
/// and `append_entries` applies a batch all-or-nothing, satisfying the
/// contract in [`crate::traits`].
#[derive(Debug, Clone)]
pub struct MemoryStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
    entries: Arc<RwLock<Vec<JournalEntry>>>,
    drawers: Arc<RwLock<HashMap<String, CashDrawer>>>,
    reconciliations: Arc<RwLock<Vec<DrawerReconciliation>>>,
    drawer_log: Arc<RwLock<Vec<DrawerTransaction>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            accounts: Arc::new(RwLock::new(HashMap::new())),
            entries: Arc::new(RwLock::new(Vec::new())),
            drawers: Arc::new(RwLock::new(HashMap::new())),
            reconciliations: Arc::new(RwLock::new(Vec::new())),
            drawer_log: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.accounts.write().unwrap().clear();
        self.entries.write().unwrap().clear();
        self.drawers.write().unwrap().clear();
        self.reconciliations.write().unwrap().clear();
        self.drawer_log.write().unwrap().clear();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn save_account(&mut self, account: &Account) -> LedgerResult<()> {
        self.accounts
            .write()
            .unwrap()
            .insert(account.id.clone(), account.clone());
        Ok(())
    }

    async fn account(&self, id: &str) -> LedgerResult<Option<Account>> {
        Ok(self.accounts.read().unwrap().get(id).cloned())
    }

    async fn account_by_code(&self, code: &str) -> LedgerResult<Option<Account>> {
        Ok(self
            .accounts
            .read()
            .unwrap()
            .values()
            .find(|account| account.code == code)
            .cloned())
    }

    async fn list_accounts(&self, include_inactive: bool) -> LedgerResult<Vec<Account>> {
        let accounts = self.accounts.read().unwrap();
        Ok(accounts
            .values()
            .filter(|account| include_inactive || account.is_active)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl JournalStore for MemoryStore {
    async fn append_entries(&mut self, entries: &[JournalEntry]) -> LedgerResult<()> {
        self.entries.write().unwrap().extend_from_slice(entries);
        Ok(())
    }

    async fn entry(&self, id: &str) -> LedgerResult<Option<JournalEntry>> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .find(|entry| entry.id == id)
            .cloned())
    }

    async fn all_entries(&self) -> LedgerResult<Vec<JournalEntry>> {
        Ok(self.entries.read().unwrap().clone())
    }

    async fn entries_up_to(&self, date: NaiveDate) -> LedgerResult<Vec<JournalEntry>> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|entry| entry.date <= date)
            .cloned()
            .collect())
    }

    async fn entries_for_reference(&self, reference: &str) -> LedgerResult<Vec<JournalEntry>> {
        Ok(self
            .entries
            .read()
            .unwrap()
            .iter()
            .filter(|entry| entry.reference == reference)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl DrawerStore for MemoryStore {
    async fn save_drawer(&mut self, drawer: &CashDrawer) -> LedgerResult<()> {
        self.drawers
            .write()
            .unwrap()
            .insert(drawer.pos_id.clone(), drawer.clone());
        Ok(())
    }

    async fn drawer(&self, pos_id: &str) -> LedgerResult<Option<CashDrawer>> {
        Ok(self.drawers.read().unwrap().get(pos_id).cloned())
    }

    async fn list_drawers(&self) -> LedgerResult<Vec<CashDrawer>> {
        Ok(self.drawers.read().unwrap().values().cloned().collect())
    }

    async fn save_reconciliation(&mut self, rec: &DrawerReconciliation) -> LedgerResult<()> {
        self.reconciliations.write().unwrap().push(rec.clone());
        Ok(())
    }

    async fn reconciliations_for(&self, pos_id: &str) -> LedgerResult<Vec<DrawerReconciliation>> {
        Ok(self
            .reconciliations
            .read()
            .unwrap()
            .iter()
            .filter(|rec| rec.pos_id == pos_id)
            .cloned()
            .collect())
    }

    async fn append_drawer_transaction(&mut self, txn: &DrawerTransaction) -> LedgerResult<()> {
        self.drawer_log.write().unwrap().push(txn.clone());
        Ok(())
    }

    async fn drawer_transactions(
        &self,
        pos_id: &str,
        date: Option<NaiveDate>,
    ) -> LedgerResult<Vec<DrawerTransaction>> {
        Ok(self
            .drawer_log
            .read()
            .unwrap()
            .iter()
            .filter(|txn| txn.pos_id == pos_id && date.is_none_or(|d| txn.date == d))
            .cloned()
            .collect())
    }
}
