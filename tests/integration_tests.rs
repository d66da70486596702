//! Integration tests for retail-accounting-core

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use retail_accounting_core::{
    generators::{
        BusinessEvent, OpeningStockEvent, PurchaseAccounts, PurchaseEvent,
        PurchaseReturnAccounts, PurchaseReturnEvent, PurchaseSplit, RefundMethod, SaleAccounts,
        SaleEvent, SalesReturnAccounts, SalesReturnEvent, TenderSplit, VoucherEvent,
    },
    AccountSpec, AccountType, AccountingCore, DrawerCredit, DrawerStatus, JournalEntry,
    LedgerError, ManualClock, MemoryStore, OperationType, ReconciliationStatus,
};

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

fn sale_accounts(accounts: &std::collections::HashMap<String, retail_accounting_core::Account>) -> SaleAccounts {
    SaleAccounts {
        cash: accounts["cash"].code.clone(),
        bank: accounts["bank"].code.clone(),
        receivables: accounts["receivables"].code.clone(),
        revenue: accounts["sales_revenue"].code.clone(),
        cogs: accounts["cogs"].code.clone(),
        inventory: accounts["inventory"].code.clone(),
    }
}

#[tokio::test]
async fn complete_trading_day_workflow() {
    let mut core = AccountingCore::new(MemoryStore::new());
    let accounts = core.setup_standard_chart().await.unwrap();

    // opening inventory valuation
    core.record_event(&BusinessEvent::OpeningStock(OpeningStockEvent {
        date: date(1),
        reference: "OPEN-1".to_string(),
        description: "Opening inventory".to_string(),
        total_cost: BigDecimal::from(5000),
        inventory_account: accounts["inventory"].code.clone(),
        equity_account: accounts["opening_stock_equity"].code.clone(),
    }))
    .await
    .unwrap();

    // a mixed-tender sale with cost recognition
    core.record_event(&BusinessEvent::Sale(SaleEvent {
        date: date(2),
        reference: "INV-100".to_string(),
        description: "Counter sale".to_string(),
        tender: TenderSplit {
            cash: BigDecimal::from(40),
            card: BigDecimal::from(60),
            credit: BigDecimal::from(0),
        },
        cogs: BigDecimal::from(30),
        accounts: sale_accounts(&accounts),
    }))
    .await
    .unwrap();

    // restock partly on supplier credit
    core.record_event(&BusinessEvent::Purchase(PurchaseEvent {
        date: date(3),
        reference: "PO-7".to_string(),
        description: "Restock".to_string(),
        split: PurchaseSplit {
            cash: BigDecimal::from(150),
            credit: BigDecimal::from(350),
            bank: BigDecimal::from(0),
        },
        accounts: PurchaseAccounts {
            inventory: accounts["inventory"].code.clone(),
            cash: accounts["cash"].code.clone(),
            payables: accounts["payables"].code.clone(),
            bank: accounts["bank"].code.clone(),
        },
    }))
    .await
    .unwrap();

    // cash: +40 sale, -150 purchase
    let cash = core
        .account_balance(&accounts["cash"].code, None)
        .await
        .unwrap();
    assert_eq!(cash, BigDecimal::from(-110));

    // inventory: +5000 opening, -30 cogs, +500 purchase
    let inventory = core
        .account_balance(&accounts["inventory"].code, None)
        .await
        .unwrap();
    assert_eq!(inventory, BigDecimal::from(5470));

    let payables = core
        .account_balance(&accounts["payables"].code, None)
        .await
        .unwrap();
    assert_eq!(payables, BigDecimal::from(350));

    // the sale batch shares one reference: two tender legs plus the cost leg
    let legs = core.entries_for_reference("INV-100").await.unwrap();
    assert_eq!(legs.len(), 3);

    // every event emits elementary legs only, so the columns agree
    let report = core.trial_balance(date(31)).await.unwrap();
    assert_eq!(report.difference, BigDecimal::from(0));
    assert_eq!(report.total_debit, report.total_credit);

    // as-of filtering: before the purchase, payables are untouched
    let early = core
        .account_balance(&accounts["payables"].code, Some(date(2)))
        .await
        .unwrap();
    assert_eq!(early, BigDecimal::from(0));
}

#[tokio::test]
async fn trial_balance_is_stable_across_runs() {
    let mut core = AccountingCore::new(MemoryStore::new());
    let accounts = core.setup_standard_chart().await.unwrap();

    core.record_event(&BusinessEvent::Sale(SaleEvent {
        date: date(2),
        reference: "INV-1".to_string(),
        description: "Sale".to_string(),
        tender: TenderSplit::cash_only(BigDecimal::from(90)),
        cogs: BigDecimal::from(35),
        accounts: sale_accounts(&accounts),
    }))
    .await
    .unwrap();

    let first = core.trial_balance(date(28)).await.unwrap();
    let second = core.trial_balance(date(28)).await.unwrap();
    assert_eq!(first.difference, second.difference);
    assert_eq!(
        first
            .rows
            .iter()
            .map(|row| row.account.code.clone())
            .collect::<Vec<_>>(),
        second
            .rows
            .iter()
            .map(|row| row.account.code.clone())
            .collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn returns_reverse_revenue_and_inventory() {
    let mut core = AccountingCore::new(MemoryStore::new());
    let accounts = core.setup_standard_chart().await.unwrap();

    core.record_event(&BusinessEvent::Sale(SaleEvent {
        date: date(2),
        reference: "INV-9".to_string(),
        description: "Sale".to_string(),
        tender: TenderSplit::cash_only(BigDecimal::from(200)),
        cogs: BigDecimal::from(80),
        accounts: sale_accounts(&accounts),
    }))
    .await
    .unwrap();

    core.record_event(&BusinessEvent::SalesReturn(SalesReturnEvent {
        date: date(4),
        reference: "RET-9".to_string(),
        description: "Customer return".to_string(),
        amount: BigDecimal::from(200),
        cogs: BigDecimal::from(80),
        refund_account: accounts["cash"].code.clone(),
        accounts: SalesReturnAccounts {
            revenue: accounts["sales_revenue"].code.clone(),
            inventory: accounts["inventory"].code.clone(),
            cogs: accounts["cogs"].code.clone(),
        },
    }))
    .await
    .unwrap();

    // the return cancels the sale in every account it touched
    for slug in ["cash", "sales_revenue", "inventory", "cogs"] {
        let balance = core
            .account_balance(&accounts[slug].code, None)
            .await
            .unwrap();
        assert_eq!(balance, BigDecimal::from(0), "account {slug}");
    }

    // a cash purchase return is a single refund-against-inventory entry
    let entries = core
        .record_event(&BusinessEvent::PurchaseReturn(PurchaseReturnEvent {
            date: date(5),
            reference: "PRET-2".to_string(),
            description: "Supplier return".to_string(),
            amount: BigDecimal::from(230),
            refund_method: RefundMethod::Cash,
            accounts: PurchaseReturnAccounts {
                inventory: accounts["inventory"].code.clone(),
                cash: accounts["cash"].code.clone(),
                payables: accounts["payables"].code.clone(),
            },
        }))
        .await
        .unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].debit_account, accounts["cash"].code);
    assert_eq!(entries[0].credit_account, accounts["inventory"].code);
    assert_eq!(entries[0].amount, BigDecimal::from(230));
}

#[tokio::test]
async fn vouchers_settle_receivables_and_payables() {
    let mut core = AccountingCore::new(MemoryStore::new());
    let accounts = core.setup_standard_chart().await.unwrap();

    // credit sale builds up receivables
    core.record_event(&BusinessEvent::Sale(SaleEvent {
        date: date(2),
        reference: "INV-20".to_string(),
        description: "Credit sale".to_string(),
        tender: TenderSplit {
            cash: BigDecimal::from(0),
            card: BigDecimal::from(0),
            credit: BigDecimal::from(500),
        },
        cogs: BigDecimal::from(0),
        accounts: sale_accounts(&accounts),
    }))
    .await
    .unwrap();

    // the customer settles by bank transfer
    core.record_event(&BusinessEvent::Receipt(VoucherEvent {
        date: date(10),
        reference: "RCV-3".to_string(),
        description: "Invoice settled".to_string(),
        amount: BigDecimal::from(500),
        treasury_account: accounts["bank"].code.clone(),
        party_account: accounts["receivables"].code.clone(),
    }))
    .await
    .unwrap();

    let receivables = core
        .account_balance(&accounts["receivables"].code, None)
        .await
        .unwrap();
    assert_eq!(receivables, BigDecimal::from(0));
    let bank = core
        .account_balance(&accounts["bank"].code, None)
        .await
        .unwrap();
    assert_eq!(bank, BigDecimal::from(500));
}

#[tokio::test]
async fn manual_entries_accept_legacy_name_addressing() {
    let mut core = AccountingCore::new(MemoryStore::new());
    let accounts = core.setup_standard_chart().await.unwrap();

    let entry = core
        .record_entry(JournalEntry::manual(
            date(6),
            "Float moved to safe".to_string(),
            "Cash".to_string(),
            "Owner's Equity".to_string(),
            BigDecimal::from(100),
            "MAN-1".to_string(),
            OperationType::Opening,
        ))
        .await
        .unwrap();

    // references were normalized to canonical codes before the append
    assert_eq!(entry.debit_account, accounts["cash"].code);
    assert_eq!(entry.credit_account, accounts["owners_equity"].code);
}

#[tokio::test]
async fn duplicate_account_codes_are_rejected() {
    let mut core = AccountingCore::new(MemoryStore::new());
    core.add_account(AccountSpec::new("1010", "Cash", AccountType::Asset))
        .await
        .unwrap();

    let err = core
        .add_account(AccountSpec::new("1010", "Till Float", AccountType::Asset))
        .await
        .unwrap_err();
    match err {
        LedgerError::Validation(violations) => {
            assert!(violations.iter().any(|v| v.contains("already in use")));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[tokio::test]
async fn drawer_shortage_close_and_next_day_rollover() {
    let clock = ManualClock::new(date(1));
    let mut core = AccountingCore::with_clock(MemoryStore::new(), Arc::new(clock.clone()));

    core.configure_drawer("pos-1", "branch-1", "Main Street", Some("emp-7".to_string()))
        .await
        .unwrap();
    core.drawer_credit("pos-1", BigDecimal::from(500), DrawerCredit::Sale, "emp-7")
        .await
        .unwrap();

    let reconciliation = core
        .close_drawer(
            "pos-1",
            BigDecimal::from(480),
            "emp-7",
            Some("shortage".to_string()),
        )
        .await
        .unwrap();
    assert_eq!(reconciliation.expected_balance, BigDecimal::from(500));
    assert_eq!(reconciliation.actual_counted, BigDecimal::from(480));
    assert_eq!(reconciliation.discrepancy, BigDecimal::from(-20));
    assert_eq!(reconciliation.status, ReconciliationStatus::Discrepancy);

    // the next day's first credit reopens at a zeroed float
    clock.set_today(date(2));
    let drawer = core
        .drawer_credit("pos-1", BigDecimal::from(100), DrawerCredit::Sale, "emp-7")
        .await
        .unwrap();
    assert_eq!(drawer.status, DrawerStatus::Open);
    assert_eq!(drawer.opening_balance, BigDecimal::from(0));
    assert_eq!(drawer.current_balance, BigDecimal::from(100));

    let history = core.drawer_reconciliations("pos-1").await.unwrap();
    assert_eq!(history.len(), 1);
}

#[tokio::test]
async fn records_survive_json_round_trips() {
    let mut core = AccountingCore::new(MemoryStore::new());
    let accounts = core.setup_standard_chart().await.unwrap();

    core.record_event(&BusinessEvent::Sale(SaleEvent {
        date: date(2),
        reference: "INV-77".to_string(),
        description: "Sale".to_string(),
        tender: TenderSplit::cash_only(BigDecimal::from(55)),
        cogs: BigDecimal::from(0),
        accounts: sale_accounts(&accounts),
    }))
    .await
    .unwrap();

    // the UI layer ships these records as JSON
    let entries = core.all_entries().await.unwrap();
    let json = serde_json::to_string(&entries).unwrap();
    let parsed: Vec<JournalEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, entries);

    let report = core.trial_balance(date(28)).await.unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let parsed: retail_accounting_core::TrialBalance = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.difference, report.difference);
}

#[tokio::test]
async fn batch_failures_leave_the_journal_untouched() {
    let mut core = AccountingCore::new(MemoryStore::new());
    let accounts = core.setup_standard_chart().await.unwrap();

    // a sale naming an account that does not exist fails whole
    let err = core
        .record_event(&BusinessEvent::Sale(SaleEvent {
            date: date(2),
            reference: "INV-404".to_string(),
            description: "Broken sale".to_string(),
            tender: TenderSplit {
                cash: BigDecimal::from(40),
                card: BigDecimal::from(60),
                credit: BigDecimal::from(0),
            },
            cogs: BigDecimal::from(10),
            accounts: SaleAccounts {
                cash: accounts["cash"].code.clone(),
                bank: "9999".to_string(),
                receivables: accounts["receivables"].code.clone(),
                revenue: accounts["sales_revenue"].code.clone(),
                cogs: accounts["cogs"].code.clone(),
                inventory: accounts["inventory"].code.clone(),
            },
        }))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(_)));
    assert!(core.all_entries().await.unwrap().is_empty());
}
