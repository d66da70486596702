//! Chart of accounts management

use bigdecimal::BigDecimal;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::traits::AccountStore;
use crate::types::*;
use crate::utils::validation;

/// Requested fields for a new account
#[derive(Debug, Clone)]
pub struct AccountSpec {
    /// Numeric code, unique across active and inactive accounts
    pub code: String,
    /// Display name, at least two characters
    pub name: String,
    /// Account type; the nature is derived from it
    pub account_type: AccountType,
    /// Optional declared nature, validated against the type
    pub nature: Option<AccountNature>,
    /// Parent account id; the parent must be a root
    pub parent_id: Option<String>,
    /// Balance brought in at creation
    pub opening_balance: BigDecimal,
    /// Free-form description
    pub description: Option<String>,
}

impl AccountSpec {
    /// Spec with no parent, zero opening balance and derived nature
    pub fn new(code: impl Into<String>, name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            account_type,
            nature: None,
            parent_id: None,
            opening_balance: BigDecimal::from(0),
            description: None,
        }
    }
}

/// Partial update for an existing account
#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    /// New code; re-validated for uniqueness
    pub code: Option<String>,
    /// New display name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
}

/// Account registry over the hierarchical chart of accounts.
///
/// Accounts are only ever soft-deleted: a deactivated account keeps its
/// record and its code stays reserved, since journal entries may still
/// reference it.
pub struct ChartOfAccounts<S: AccountStore> {
    storage: S,
}

impl<S: AccountStore> ChartOfAccounts<S> {
    /// Create a registry over the given storage backend
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Create a new account.
    ///
    /// All violated rules are collected and reported together in one
    /// `Validation` error, so a caller can surface the full list or abort
    /// on the first, as it prefers.
    pub async fn add_account(&mut self, spec: AccountSpec) -> LedgerResult<Account> {
        let mut violations = Vec::new();

        if let Some(v) = validation::check_code_numeric(&spec.code) {
            violations.push(v);
        }
        if let Some(v) = validation::check_name_length(&spec.name) {
            violations.push(v);
        }
        if let Some(nature) = spec.nature {
            if let Some(v) = validation::check_nature_matches(spec.account_type, nature) {
                violations.push(v);
            }
        }
        if self.storage.account_by_code(&spec.code).await?.is_some() {
            violations.push(format!("account code '{}' is already in use", spec.code));
        }

        let mut level = 0;
        if let Some(ref parent_id) = spec.parent_id {
            match self.storage.account(parent_id).await? {
                Some(parent) if parent.level == 0 => level = parent.level + 1,
                Some(parent) => violations.push(format!(
                    "parent account '{}' is itself a child; the chart allows one level of children",
                    parent.code
                )),
                None => violations.push(format!("parent account '{parent_id}' does not exist")),
            }
        }

        validation::into_result(violations)?;

        let account = Account::new(
            spec.code,
            spec.name,
            spec.account_type,
            spec.parent_id,
            level,
            spec.opening_balance,
            spec.description,
        );
        self.storage.save_account(&account).await?;
        info!(code = %account.code, name = %account.name, "account created");

        Ok(account)
    }

    /// Apply a partial update to an account.
    ///
    /// A changed code is re-validated for format and uniqueness.
    pub async fn update_account(&mut self, id: &str, patch: AccountPatch) -> LedgerResult<Account> {
        let mut account = self
            .storage
            .account(id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;

        let mut violations = Vec::new();

        if let Some(ref code) = patch.code {
            if *code != account.code {
                if let Some(v) = validation::check_code_numeric(code) {
                    violations.push(v);
                }
                if let Some(existing) = self.storage.account_by_code(code).await? {
                    if existing.id != account.id {
                        violations.push(format!("account code '{code}' is already in use"));
                    }
                }
            }
        }
        if let Some(ref name) = patch.name {
            if let Some(v) = validation::check_name_length(name) {
                violations.push(v);
            }
        }

        validation::into_result(violations)?;

        if let Some(code) = patch.code {
            account.code = code;
        }
        if let Some(name) = patch.name {
            account.name = name;
        }
        if let Some(description) = patch.description {
            account.description = Some(description);
        }
        account.updated_at = chrono::Utc::now().naive_utc();

        self.storage.save_account(&account).await?;
        debug!(code = %account.code, "account updated");

        Ok(account)
    }

    /// Soft-delete an account.
    ///
    /// Fails while active children exist; otherwise flips `is_active` and
    /// keeps the record in place.
    pub async fn deactivate_account(&mut self, id: &str) -> LedgerResult<Account> {
        let mut account = self
            .storage
            .account(id)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(id.to_string()))?;

        let has_active_children = self
            .storage
            .list_accounts(false)
            .await?
            .iter()
            .any(|candidate| candidate.parent_id.as_deref() == Some(id));
        if has_active_children {
            return Err(LedgerError::HasChildren(account.code));
        }

        account.is_active = false;
        account.updated_at = chrono::Utc::now().naive_utc();
        self.storage.save_account(&account).await?;
        info!(code = %account.code, "account deactivated");

        Ok(account)
    }

    /// Suggest the next free code under a parent.
    ///
    /// Roots get the next multiple of 1000 above the current maximum root
    /// code; children get the parent's highest child code plus 10, or the
    /// parent's own code when it has no children yet. The suggestion is
    /// not reserved or enforced.
    pub async fn generate_next_code(&self, parent_id: Option<&str>) -> LedgerResult<String> {
        let accounts = self.storage.list_accounts(true).await?;

        match parent_id {
            None => {
                let max_root = accounts
                    .iter()
                    .filter(|account| account.parent_id.is_none())
                    .filter_map(|account| account.code.parse::<u64>().ok())
                    .max()
                    .unwrap_or(0);
                Ok(((max_root / 1000 + 1) * 1000).to_string())
            }
            Some(parent_id) => {
                let parent = self
                    .storage
                    .account(parent_id)
                    .await?
                    .ok_or_else(|| LedgerError::AccountNotFound(parent_id.to_string()))?;
                let max_child = accounts
                    .iter()
                    .filter(|account| account.parent_id.as_deref() == Some(parent_id))
                    .filter_map(|account| account.code.parse::<u64>().ok())
                    .max();
                match max_child {
                    Some(max) => Ok((max + 10).to_string()),
                    None => Ok(parent.code),
                }
            }
        }
    }

    /// Normalize a code-or-name reference to the canonical account code.
    ///
    /// Exact code matches win; among name matches, active accounts win over
    /// deactivated ones. Legacy records stored names instead of codes, so
    /// both addressings resolve.
    pub async fn resolve(&self, reference: &str) -> LedgerResult<String> {
        if let Some(account) = self.storage.account_by_code(reference).await? {
            return Ok(account.code);
        }

        let accounts = self.storage.list_accounts(true).await?;
        let by_name = accounts
            .iter()
            .filter(|account| account.name == reference)
            .max_by_key(|account| account.is_active);
        match by_name {
            Some(account) => Ok(account.code.clone()),
            None => Err(LedgerError::AccountNotFound(reference.to_string())),
        }
    }

    /// Get an account by id
    pub async fn get_account(&self, id: &str) -> LedgerResult<Option<Account>> {
        self.storage.account(id).await
    }

    /// Get an account by code
    pub async fn get_by_code(&self, code: &str) -> LedgerResult<Option<Account>> {
        self.storage.account_by_code(code).await
    }

    /// All active accounts
    pub async fn list_active(&self) -> LedgerResult<Vec<Account>> {
        self.storage.list_accounts(false).await
    }

    /// Active children of a parent account
    pub async fn children_of(&self, parent_id: &str) -> LedgerResult<Vec<Account>> {
        let accounts = self.storage.list_accounts(false).await?;
        Ok(accounts
            .into_iter()
            .filter(|account| account.parent_id.as_deref() == Some(parent_id))
            .collect())
    }
}

/// Seed charts for new installations
pub mod seed {
    use super::*;

    /// Create the standard retail chart of accounts: one root per account
    /// type, postable leaf accounts underneath.
    ///
    /// Returns the created accounts keyed by role slug, for callers that
    /// wire generators to the seeded codes.
    pub async fn standard_retail_chart<S: AccountStore>(
        chart: &mut ChartOfAccounts<S>,
    ) -> LedgerResult<HashMap<String, Account>> {
        let mut accounts = HashMap::new();

        for (slug, code, name, account_type) in [
            ("assets", "1000", "Assets", AccountType::Asset),
            ("liabilities", "2000", "Liabilities", AccountType::Liability),
            ("equity", "3000", "Equity", AccountType::Equity),
            ("revenue", "4000", "Revenue", AccountType::Revenue),
            ("expenses", "5000", "Expenses", AccountType::Expense),
        ] {
            let account = chart
                .add_account(AccountSpec::new(code, name, account_type))
                .await?;
            accounts.insert(slug.to_string(), account);
        }

        for (slug, parent, code, name, account_type) in [
            ("cash", "assets", "1010", "Cash", AccountType::Asset),
            ("bank", "assets", "1020", "Bank", AccountType::Asset),
            ("receivables", "assets", "1030", "Accounts Receivable", AccountType::Asset),
            ("inventory", "assets", "1040", "Inventory", AccountType::Asset),
            ("payables", "liabilities", "2010", "Accounts Payable", AccountType::Liability),
            ("opening_stock_equity", "equity", "3010", "Opening Stock Equity", AccountType::Equity),
            ("owners_equity", "equity", "3020", "Owner's Equity", AccountType::Equity),
            ("sales_revenue", "revenue", "4010", "Sales Revenue", AccountType::Revenue),
            ("cogs", "expenses", "5010", "Cost of Goods Sold", AccountType::Expense),
        ] {
            let parent_id = accounts[parent].id.clone();
            let account = chart
                .add_account(AccountSpec {
                    parent_id: Some(parent_id),
                    ..AccountSpec::new(code, name, account_type)
                })
                .await?;
            accounts.insert(slug.to_string(), account);
        }

        Ok(accounts)
    }
}
