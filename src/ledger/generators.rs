//! Entry generation for business events
//!
//! Each generator is a pure function: given a business event it returns the
//! journal entries that record it, with no I/O and no appends. Persisting
//! the batch is the caller's job, as one atomic unit.
//!
//! Preconditions: callers pass validated, non-negative amounts and account
//! references already normalized to canonical codes (one `resolve` pass at
//! event construction). Generators do not re-check either.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::types::{JournalEntry, OperationType};

/// How a sale was settled across payment methods.
///
/// Zero buckets emit no entry; a single-method sale is just a split with
/// one non-zero bucket.
#[derive(Debug, Clone, Default)]
pub struct TenderSplit {
    /// Physical cash taken
    pub cash: BigDecimal,
    /// Card payments, settled into the bank account
    pub card: BigDecimal,
    /// Amount put on the customer's credit (receivables)
    pub credit: BigDecimal,
}

impl TenderSplit {
    /// A split settled entirely in cash
    pub fn cash_only(amount: BigDecimal) -> Self {
        Self {
            cash: amount,
            ..Self::default()
        }
    }

    /// Declared total across all buckets
    pub fn total(&self) -> BigDecimal {
        &self.cash + &self.card + &self.credit
    }
}

/// Canonical account codes a sale posts against
#[derive(Debug, Clone)]
pub struct SaleAccounts {
    pub cash: String,
    pub bank: String,
    pub receivables: String,
    pub revenue: String,
    pub cogs: String,
    pub inventory: String,
}

/// A completed sale checkout
#[derive(Debug, Clone)]
pub struct SaleEvent {
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub tender: TenderSplit,
    /// Cost of the goods sold; zero when cost tracking does not apply
    pub cogs: BigDecimal,
    pub accounts: SaleAccounts,
}

/// How a purchase was settled
#[derive(Debug, Clone, Default)]
pub struct PurchaseSplit {
    /// Paid in cash
    pub cash: BigDecimal,
    /// Taken on supplier credit (payables)
    pub credit: BigDecimal,
    /// Paid by bank withdrawal
    pub bank: BigDecimal,
}

/// Canonical account codes a purchase posts against
#[derive(Debug, Clone)]
pub struct PurchaseAccounts {
    pub inventory: String,
    pub cash: String,
    pub payables: String,
    pub bank: String,
}

/// A saved purchase order
#[derive(Debug, Clone)]
pub struct PurchaseEvent {
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub split: PurchaseSplit,
    pub accounts: PurchaseAccounts,
}

/// Canonical account codes a sales return posts against
#[derive(Debug, Clone)]
pub struct SalesReturnAccounts {
    pub revenue: String,
    pub inventory: String,
    pub cogs: String,
}

/// Goods returned by a customer
#[derive(Debug, Clone)]
pub struct SalesReturnEvent {
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    /// Revenue being reversed
    pub amount: BigDecimal,
    /// Cost being reversed back into inventory; zero when not applicable
    pub cogs: BigDecimal,
    /// Account the refund is paid from (cash, bank or receivables)
    pub refund_account: String,
    pub accounts: SalesReturnAccounts,
}

/// How a purchase return is refunded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefundMethod {
    /// Supplier refunds in cash
    Cash,
    /// The outstanding payable is reduced
    Payables,
}

/// Canonical account codes a purchase return posts against
#[derive(Debug, Clone)]
pub struct PurchaseReturnAccounts {
    pub inventory: String,
    pub cash: String,
    pub payables: String,
}

/// Goods returned to a supplier
#[derive(Debug, Clone)]
pub struct PurchaseReturnEvent {
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub amount: BigDecimal,
    pub refund_method: RefundMethod,
    pub accounts: PurchaseReturnAccounts,
}

/// A receipt or payment voucher: one movement between a treasury account
/// (cash or bank) and a party account (receivables or payables)
#[derive(Debug, Clone)]
pub struct VoucherEvent {
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub amount: BigDecimal,
    /// Cash or bank account code
    pub treasury_account: String,
    /// Receivables or payables account code
    pub party_account: String,
}

/// Opening inventory valuation for a warehouse
#[derive(Debug, Clone)]
pub struct OpeningStockEvent {
    pub date: NaiveDate,
    pub reference: String,
    pub description: String,
    pub total_cost: BigDecimal,
    /// Inventory account for the warehouse being valued
    pub inventory_account: String,
    /// Opening stock equity account
    pub equity_account: String,
}

/// A business event the ledger records entries for
#[derive(Debug, Clone)]
pub enum BusinessEvent {
    Sale(SaleEvent),
    Purchase(PurchaseEvent),
    SalesReturn(SalesReturnEvent),
    PurchaseReturn(PurchaseReturnEvent),
    Receipt(VoucherEvent),
    Payment(VoucherEvent),
    OpeningStock(OpeningStockEvent),
}

/// Dispatch an event to its generator
pub fn entries_for(event: &BusinessEvent) -> Vec<JournalEntry> {
    match event {
        BusinessEvent::Sale(sale) => sale_entries(sale),
        BusinessEvent::Purchase(purchase) => purchase_entries(purchase),
        BusinessEvent::SalesReturn(ret) => sales_return_entries(ret),
        BusinessEvent::PurchaseReturn(ret) => purchase_return_entries(ret),
        BusinessEvent::Receipt(voucher) => receipt_entries(voucher),
        BusinessEvent::Payment(voucher) => payment_entries(voucher),
        BusinessEvent::OpeningStock(stock) => opening_stock_entries(stock),
    }
}

/// Entries for a sale: one revenue leg per non-zero tender bucket, plus a
/// cost-of-goods-sold leg when a cost is declared
pub fn sale_entries(event: &SaleEvent) -> Vec<JournalEntry> {
    let zero = BigDecimal::from(0);
    let mut entries = Vec::new();

    let buckets = [
        (&event.tender.cash, &event.accounts.cash, "cash"),
        (&event.tender.card, &event.accounts.bank, "card"),
        (&event.tender.credit, &event.accounts.receivables, "credit"),
    ];
    for (amount, debit_account, method) in buckets {
        if *amount > zero {
            entries.push(JournalEntry::auto(
                event.date,
                format!("{} ({method})", event.description),
                debit_account.clone(),
                event.accounts.revenue.clone(),
                amount.clone(),
                event.reference.clone(),
                OperationType::Sale,
            ));
        }
    }

    if event.cogs > zero {
        entries.push(JournalEntry::auto(
            event.date,
            format!("{} (cost of goods sold)", event.description),
            event.accounts.cogs.clone(),
            event.accounts.inventory.clone(),
            event.cogs.clone(),
            event.reference.clone(),
            OperationType::Sale,
        ));
    }

    entries
}

/// Entries for a purchase: inventory debited once per non-zero settlement
/// bucket against cash, payables or bank
pub fn purchase_entries(event: &PurchaseEvent) -> Vec<JournalEntry> {
    let zero = BigDecimal::from(0);
    let mut entries = Vec::new();

    let buckets = [
        (&event.split.cash, &event.accounts.cash, "cash"),
        (&event.split.credit, &event.accounts.payables, "on credit"),
        (&event.split.bank, &event.accounts.bank, "bank"),
    ];
    for (amount, credit_account, method) in buckets {
        if *amount > zero {
            entries.push(JournalEntry::auto(
                event.date,
                format!("{} ({method})", event.description),
                event.accounts.inventory.clone(),
                credit_account.clone(),
                amount.clone(),
                event.reference.clone(),
                OperationType::Purchase,
            ));
        }
    }

    entries
}

/// Entries for a sales return: revenue reversed against the refund account,
/// plus a cost reversal back into inventory when a cost was recognized
pub fn sales_return_entries(event: &SalesReturnEvent) -> Vec<JournalEntry> {
    let zero = BigDecimal::from(0);
    let mut entries = vec![JournalEntry::auto(
        event.date,
        event.description.clone(),
        event.accounts.revenue.clone(),
        event.refund_account.clone(),
        event.amount.clone(),
        event.reference.clone(),
        OperationType::SalesReturn,
    )];

    if event.cogs > zero {
        entries.push(JournalEntry::auto(
            event.date,
            format!("{} (cost reversal)", event.description),
            event.accounts.inventory.clone(),
            event.accounts.cogs.clone(),
            event.cogs.clone(),
            event.reference.clone(),
            OperationType::SalesReturn,
        ));
    }

    entries
}

/// The single entry for a purchase return: the refund side debited against
/// inventory
pub fn purchase_return_entries(event: &PurchaseReturnEvent) -> Vec<JournalEntry> {
    let debit_account = match event.refund_method {
        RefundMethod::Cash => event.accounts.cash.clone(),
        RefundMethod::Payables => event.accounts.payables.clone(),
    };
    vec![JournalEntry::auto(
        event.date,
        event.description.clone(),
        debit_account,
        event.accounts.inventory.clone(),
        event.amount.clone(),
        event.reference.clone(),
        OperationType::PurchaseReturn,
    )]
}

/// The single entry for a receipt voucher: treasury debited, party credited
pub fn receipt_entries(event: &VoucherEvent) -> Vec<JournalEntry> {
    vec![JournalEntry::auto(
        event.date,
        event.description.clone(),
        event.treasury_account.clone(),
        event.party_account.clone(),
        event.amount.clone(),
        event.reference.clone(),
        OperationType::Receipt,
    )]
}

/// The single entry for a payment voucher: party debited, treasury credited
pub fn payment_entries(event: &VoucherEvent) -> Vec<JournalEntry> {
    vec![JournalEntry::auto(
        event.date,
        event.description.clone(),
        event.party_account.clone(),
        event.treasury_account.clone(),
        event.amount.clone(),
        event.reference.clone(),
        OperationType::Payment,
    )]
}

/// The single entry valuing opening inventory against opening stock equity
pub fn opening_stock_entries(event: &OpeningStockEvent) -> Vec<JournalEntry> {
    vec![JournalEntry::auto(
        event.date,
        event.description.clone(),
        event.inventory_account.clone(),
        event.equity_account.clone(),
        event.total_cost.clone(),
        event.reference.clone(),
        OperationType::OpeningStock,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntryKind;
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn sale_accounts() -> SaleAccounts {
        SaleAccounts {
            cash: "1010".to_string(),
            bank: "1020".to_string(),
            receivables: "1030".to_string(),
            revenue: "4010".to_string(),
            cogs: "5010".to_string(),
            inventory: "1040".to_string(),
        }
    }

    #[test]
    fn mixed_tender_sale_emits_one_leg_per_bucket_plus_cogs() {
        let event = SaleEvent {
            date: date(),
            reference: "INV-100".to_string(),
            description: "Counter sale".to_string(),
            tender: TenderSplit {
                cash: BigDecimal::from(40),
                card: BigDecimal::from(60),
                credit: BigDecimal::from(0),
            },
            cogs: BigDecimal::from(30),
            accounts: sale_accounts(),
        };

        let entries = sale_entries(&event);
        assert_eq!(entries.len(), 3);

        let revenue_total: BigDecimal = entries
            .iter()
            .filter(|entry| entry.credit_account == "4010")
            .map(|entry| entry.amount.clone())
            .sum();
        assert_eq!(revenue_total, event.tender.total());

        let cogs_leg = entries
            .iter()
            .find(|entry| entry.debit_account == "5010")
            .unwrap();
        assert_eq!(cogs_leg.credit_account, "1040");
        assert_eq!(cogs_leg.amount, BigDecimal::from(30));

        for entry in &entries {
            assert_eq!(entry.reference, "INV-100");
            assert_eq!(entry.kind, EntryKind::Auto);
            assert_eq!(entry.operation, OperationType::Sale);
        }
    }

    #[test]
    fn zero_cogs_sale_has_no_cost_leg() {
        let event = SaleEvent {
            date: date(),
            reference: "INV-101".to_string(),
            description: "Service sale".to_string(),
            tender: TenderSplit::cash_only(BigDecimal::from(100)),
            cogs: BigDecimal::from(0),
            accounts: sale_accounts(),
        };

        let entries = sale_entries(&event);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_account, "1010");
        assert_eq!(entries[0].credit_account, "4010");
        assert_eq!(entries[0].amount, BigDecimal::from(100));
    }

    #[test]
    fn purchase_split_emits_one_leg_per_bucket() {
        let event = PurchaseEvent {
            date: date(),
            reference: "PO-7".to_string(),
            description: "Stock replenishment".to_string(),
            split: PurchaseSplit {
                cash: BigDecimal::from(150),
                credit: BigDecimal::from(350),
                bank: BigDecimal::from(0),
            },
            accounts: PurchaseAccounts {
                inventory: "1040".to_string(),
                cash: "1010".to_string(),
                payables: "2010".to_string(),
                bank: "1020".to_string(),
            },
        };

        let entries = purchase_entries(&event);
        assert_eq!(entries.len(), 2);
        assert!(entries
            .iter()
            .all(|entry| entry.debit_account == "1040"
                && entry.operation == OperationType::Purchase));
        assert!(entries.iter().any(|entry| entry.credit_account == "1010"
            && entry.amount == BigDecimal::from(150)));
        assert!(entries.iter().any(|entry| entry.credit_account == "2010"
            && entry.amount == BigDecimal::from(350)));
    }

    #[test]
    fn sales_return_reverses_revenue_and_cost() {
        let event = SalesReturnEvent {
            date: date(),
            reference: "RET-3".to_string(),
            description: "Customer return".to_string(),
            amount: BigDecimal::from(80),
            cogs: BigDecimal::from(25),
            refund_account: "1010".to_string(),
            accounts: SalesReturnAccounts {
                revenue: "4010".to_string(),
                inventory: "1040".to_string(),
                cogs: "5010".to_string(),
            },
        };

        let entries = sales_return_entries(&event);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].debit_account, "4010");
        assert_eq!(entries[0].credit_account, "1010");
        assert_eq!(entries[1].debit_account, "1040");
        assert_eq!(entries[1].credit_account, "5010");
    }

    #[test]
    fn cash_purchase_return_is_a_single_entry() {
        let event = PurchaseReturnEvent {
            date: date(),
            reference: "PRET-1".to_string(),
            description: "Damaged goods returned".to_string(),
            amount: BigDecimal::from(230),
            refund_method: RefundMethod::Cash,
            accounts: PurchaseReturnAccounts {
                inventory: "1040".to_string(),
                cash: "1010".to_string(),
                payables: "2010".to_string(),
            },
        };

        let entries = purchase_return_entries(&event);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_account, "1010");
        assert_eq!(entries[0].credit_account, "1040");
        assert_eq!(entries[0].amount, BigDecimal::from(230));
        assert_eq!(entries[0].operation, OperationType::PurchaseReturn);
    }

    #[test]
    fn vouchers_move_between_treasury_and_party() {
        let receipt = VoucherEvent {
            date: date(),
            reference: "RCV-9".to_string(),
            description: "Customer settles invoice".to_string(),
            amount: BigDecimal::from(500),
            treasury_account: "1020".to_string(),
            party_account: "1030".to_string(),
        };
        let entries = receipt_entries(&receipt);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_account, "1020");
        assert_eq!(entries[0].credit_account, "1030");

        let payment = VoucherEvent {
            date: date(),
            reference: "PAY-4".to_string(),
            description: "Supplier paid".to_string(),
            amount: BigDecimal::from(350),
            treasury_account: "1010".to_string(),
            party_account: "2010".to_string(),
        };
        let entries = payment_entries(&payment);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_account, "2010");
        assert_eq!(entries[0].credit_account, "1010");
    }

    #[test]
    fn opening_stock_posts_against_equity() {
        let event = OpeningStockEvent {
            date: date(),
            reference: "OPEN-1".to_string(),
            description: "Opening inventory, main warehouse".to_string(),
            total_cost: BigDecimal::from(12000),
            inventory_account: "1040".to_string(),
            equity_account: "3010".to_string(),
        };

        let entries = opening_stock_entries(&event);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].debit_account, "1040");
        assert_eq!(entries[0].credit_account, "3010");
        assert_eq!(entries[0].operation, OperationType::OpeningStock);
    }

    #[test]
    fn dispatch_routes_by_variant() {
        let event = BusinessEvent::Sale(SaleEvent {
            date: date(),
            reference: "INV-102".to_string(),
            description: "Dispatch check".to_string(),
            tender: TenderSplit::cash_only(BigDecimal::from(10)),
            cogs: BigDecimal::from(0),
            accounts: sale_accounts(),
        });
        assert_eq!(entries_for(&event).len(), 1);
    }
}
