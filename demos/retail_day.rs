//! A full trading day walkthrough: chart setup, opening stock, a
//! mixed-tender sale, a purchase, vouchers, trial balance, and the cash
//! drawer close

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use retail_accounting_core::generators::{
    BusinessEvent, OpeningStockEvent, PurchaseAccounts, PurchaseEvent, PurchaseSplit,
    SaleAccounts, SaleEvent, TenderSplit, VoucherEvent,
};
use retail_accounting_core::{AccountingCore, DrawerCredit, ManualClock, MemoryStore};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🧾 Retail Accounting Core - Trading Day Example\n");

    // pin the clock so the drawer day lines up with the narrated entries
    let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let mut core = AccountingCore::with_clock(MemoryStore::new(), Arc::new(ManualClock::new(today)));

    // 1. Chart of accounts
    println!("📊 Setting up Chart of Accounts...");
    let accounts = core.setup_standard_chart().await?;
    for account in accounts.values() {
        println!(
            "  ✓ {} - {} ({:?}, {:?})",
            account.code, account.name, account.account_type, account.nature
        );
    }

    // the registry can suggest the next free code under a parent
    let next_asset_code = core
        .generate_next_code(Some(&accounts["assets"].id))
        .await?;
    println!("  Next asset leaf code suggestion: {next_asset_code}\n");

    // 2. Cash drawer for terminal pos-1
    println!("💵 Configuring cash drawer...");
    core.configure_drawer("pos-1", "branch-1", "Main Street", Some("emp-7".to_string()))
        .await?;
    core.drawer_credit("pos-1", BigDecimal::from(200), DrawerCredit::Opening, "emp-7")
        .await?;
    println!("  ✓ Drawer pos-1 opened with a ₹200 float\n");

    // 3. Opening inventory valuation
    println!("📦 Valuing opening inventory...");
    core.record_event(&BusinessEvent::OpeningStock(OpeningStockEvent {
        date: today,
        reference: "OPEN-1".to_string(),
        description: "Opening inventory, main warehouse".to_string(),
        total_cost: BigDecimal::from(12000),
        inventory_account: accounts["inventory"].code.clone(),
        equity_account: accounts["opening_stock_equity"].code.clone(),
    }))
    .await?;
    println!("  ✓ Recorded opening stock of ₹12,000\n");

    // 4. A mixed-tender sale: ₹40 cash, ₹60 card, cost of goods ₹30
    println!("💰 Recording a mixed-tender sale...");
    let entries = core
        .record_event(&BusinessEvent::Sale(SaleEvent {
            date: today,
            reference: "INV-100".to_string(),
            description: "Counter sale".to_string(),
            tender: TenderSplit {
                cash: BigDecimal::from(40),
                card: BigDecimal::from(60),
                credit: BigDecimal::from(0),
            },
            cogs: BigDecimal::from(30),
            accounts: SaleAccounts {
                cash: accounts["cash"].code.clone(),
                bank: accounts["bank"].code.clone(),
                receivables: accounts["receivables"].code.clone(),
                revenue: accounts["sales_revenue"].code.clone(),
                cogs: accounts["cogs"].code.clone(),
                inventory: accounts["inventory"].code.clone(),
            },
        }))
        .await?;
    for entry in &entries {
        println!(
            "  ✓ {} | debit {} credit {} | ₹{}",
            entry.description, entry.debit_account, entry.credit_account, entry.amount
        );
    }
    // the cash leg also lands in the physical drawer
    core.drawer_credit("pos-1", BigDecimal::from(40), DrawerCredit::Sale, "emp-7")
        .await?;
    println!();

    // 5. Restock on supplier credit
    println!("🚚 Recording a purchase...");
    core.record_event(&BusinessEvent::Purchase(PurchaseEvent {
        date: today,
        reference: "PO-7".to_string(),
        description: "Restock".to_string(),
        split: PurchaseSplit {
            cash: BigDecimal::from(0),
            credit: BigDecimal::from(800),
            bank: BigDecimal::from(0),
        },
        accounts: PurchaseAccounts {
            inventory: accounts["inventory"].code.clone(),
            cash: accounts["cash"].code.clone(),
            payables: accounts["payables"].code.clone(),
            bank: accounts["bank"].code.clone(),
        },
    }))
    .await?;
    println!("  ✓ Recorded ₹800 restock on supplier credit");

    // settle part of it by bank payment voucher
    core.record_event(&BusinessEvent::Payment(VoucherEvent {
        date: today,
        reference: "PAY-1".to_string(),
        description: "Supplier part-payment".to_string(),
        amount: BigDecimal::from(300),
        treasury_account: accounts["bank"].code.clone(),
        party_account: accounts["payables"].code.clone(),
    }))
    .await?;
    println!("  ✓ Paid supplier ₹300 by bank voucher\n");

    // 6. Balances and trial balance
    println!("📈 Balances at end of day:");
    for slug in ["cash", "bank", "inventory", "payables", "sales_revenue", "cogs"] {
        let balance = core.account_balance(&accounts[slug].code, None).await?;
        println!("  {:<20} ₹{}", accounts[slug].name, balance);
    }

    let report = core.trial_balance(today).await?;
    println!("\n🔍 Trial Balance as of {today}:");
    println!("  Total Debits:  ₹{}", report.total_debit);
    println!("  Total Credits: ₹{}", report.total_credit);
    println!("  Difference:    ₹{}", report.difference);

    // 7. Close the drawer against the counted cash
    println!("\n💵 Closing the drawer...");
    let reconciliation = core
        .close_drawer(
            "pos-1",
            BigDecimal::from(235),
            "emp-7",
            Some("₹5 short, till error".to_string()),
        )
        .await?;
    println!("  Opening float: ₹{}", reconciliation.opening_balance);
    println!("  Sales cash:    ₹{}", reconciliation.sales_cash);
    println!("  Expected:      ₹{}", reconciliation.expected_balance);
    println!("  Counted:       ₹{}", reconciliation.actual_counted);
    println!(
        "  Discrepancy:   ₹{} ({:?})",
        reconciliation.discrepancy, reconciliation.status
    );

    println!("\n🎉 Example completed successfully!");
    Ok(())
}
