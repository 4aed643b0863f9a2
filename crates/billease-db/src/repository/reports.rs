//! # Reports Repository
//!
//! Reads the rows behind each Accounts+ report in one read section and
//! hands them to the pure functions in `billease_core::reports`.
//!
//! ```text
//! ledgers, income_heads, expense_heads ──► trial balance / balance sheet / P&L
//! pos_sales (+ items, entity name)     ──► sales report
//! pos_entities, pos_sales, pos_payments ──► aged receivables
//! pos_sale_items + items_master        ──► HSN summary
//! invento_items + invento_transactions ──► inventory valuation
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use billease_core::reports::{
    self, parse_date, BalanceSheet, DateRange, HsnLine, InventoryValuation, LedgerBalance,
    Movement, ProfitAndLoss, Receipt, Receivable, ReceivableLine, SaleFigures, SalesReport,
    SoldLine, StockItem, TrialBalance,
};
use billease_core::{LedgerType, Money, StockMovement};
use chrono::NaiveDate;
use tracing::debug;

use super::pos::{attach_entity_name, attach_lines};
use super::{Stamps, TableSpec};
use crate::error::DbResult;
use crate::row::{asc_by, desc_by, field_eq, number_field, row_id, text_field, Row};
use crate::store::{Store, Tables};

const LEDGERS: TableSpec = TableSpec::new("ledgers", "Ledger", Stamps::Created);
const INCOME_HEADS: TableSpec = TableSpec::new("income_heads", "Income head", Stamps::Created);
const EXPENSE_HEADS: TableSpec = TableSpec::new("expense_heads", "Expense head", Stamps::Created);
const SALES: TableSpec = TableSpec::new("pos_sales", "Sale", Stamps::Created);
const SALE_ITEMS: TableSpec = TableSpec::new("pos_sale_items", "Sale item", Stamps::None);
const PAYMENTS: TableSpec = TableSpec::new("pos_payments", "Payment", Stamps::Created);
const ENTITIES: TableSpec = TableSpec::new("pos_entities", "Entity", Stamps::CreatedUpdated);
const ITEMS_MASTER: TableSpec = TableSpec::new("items_master", "Item", Stamps::Created);
const STOCK_ITEMS: TableSpec = TableSpec::new("invento_items", "Item", Stamps::CreatedUpdated);
const MOVEMENTS: TableSpec =
    TableSpec::new("invento_transactions", "Transaction", Stamps::Created);

/// Repository for the Accounts+ reports. Read-only.
#[derive(Debug, Clone)]
pub struct ReportsRepository {
    store: Arc<Store>,
}

impl ReportsRepository {
    /// Creates a new ReportsRepository.
    pub fn new(store: Arc<Store>) -> Self {
        ReportsRepository { store }
    }

    // =========================================================================
    // Ledger Reports
    // =========================================================================

    pub fn trial_balance(&self) -> DbResult<TrialBalance> {
        self.store
            .read(|tables| Ok(reports::trial_balance(&ledger_balances(tables)?)))
    }

    pub fn balance_sheet(&self, as_on: NaiveDate) -> DbResult<BalanceSheet> {
        self.store
            .read(|tables| Ok(reports::balance_sheet(&ledger_balances(tables)?, as_on)))
    }

    /// Income and expenses through the heads' ledgers.
    ///
    /// `period` is echoed back; ledger balances carry no dates to filter.
    pub fn profit_and_loss(&self, period: DateRange) -> DbResult<ProfitAndLoss> {
        self.store.read(|tables| {
            let ledgers = ledger_balances(tables)?;
            let heads = |spec: TableSpec| -> DbResult<Vec<Option<String>>> {
                Ok(tables
                    .table(spec.name)?
                    .rows()
                    .iter()
                    .map(|row| text_field(row, "ledger").map(str::to_string))
                    .collect())
            };
            Ok(reports::profit_and_loss(
                &ledgers,
                &heads(INCOME_HEADS)?,
                &heads(EXPENSE_HEADS)?,
                period,
            ))
        })
    }

    // =========================================================================
    // Sales Reports
    // =========================================================================

    /// Sales dated inside `range`, latest first, with `entity_name` and
    /// `items` attached as in the sales list.
    pub fn sales(&self, range: DateRange) -> DbResult<SalesReport<Row>> {
        self.store.read(|tables| {
            let mut sales = tables.find_where(SALES.name, |_| true)?;
            sales.sort_by(|a, b| desc_by(a, b, "date", "created_at"));

            let mut figured = Vec::with_capacity(sales.len());
            for mut sale in sales {
                let tax = tables
                    .find_where(SALE_ITEMS.name, field_eq("sale_id", &row_id(&sale).into()))?
                    .iter()
                    .map(|line| Money::from_rupees(number_field(line, "tax")))
                    .sum::<Money>();
                let figures = SaleFigures {
                    date: text_field(&sale, "date").and_then(parse_date),
                    total: Money::from_rupees(number_field(&sale, "total")),
                    tax,
                };
                if range.contains(figures.date) {
                    attach_entity_name(tables, &mut sale)?;
                    attach_lines(tables, &mut sale, SALE_ITEMS, "sale_id")?;
                }
                figured.push((sale, figures));
            }

            let report = reports::sales_report(figured, range);
            debug!(count = report.count, "Sales report built");
            Ok(report)
        })
    }

    /// Outstanding sales per POS customer, aged against `today`.
    pub fn aged_receivables(&self, today: NaiveDate) -> DbResult<Vec<ReceivableLine>> {
        self.store.read(|tables| {
            let mut entities = tables.find_where(ENTITIES.name, |row| {
                text_field(row, "type").is_some_and(|t| t.eq_ignore_ascii_case("customer"))
            })?;
            entities.sort_by(|a, b| asc_by(a, b, "name"));
            let customers: Vec<(i64, String)> = entities
                .iter()
                .map(|e| (row_id(e), text_field(e, "name").unwrap_or_default().to_string()))
                .collect();

            let invoices: Vec<Receivable> = tables
                .table(SALES.name)?
                .rows()
                .iter()
                .map(|sale| Receivable {
                    entity_id: entity_id(sale),
                    date: text_field(sale, "date").and_then(parse_date),
                    total: Money::from_rupees(number_field(sale, "total")),
                    balance: Money::from_rupees(number_field(sale, "balance")),
                })
                .collect();
            let receipts: Vec<Receipt> = tables
                .table(PAYMENTS.name)?
                .rows()
                .iter()
                .map(|payment| Receipt {
                    entity_id: entity_id(payment),
                    amount: Money::from_rupees(number_field(payment, "amount")),
                })
                .collect();

            Ok(reports::aged_receivables(&customers, &invoices, &receipts, today))
        })
    }

    /// Sold quantities, values and tax grouped by HSN code.
    ///
    /// A line's code comes from the items master entry with the same
    /// name, else the Invento item with that name.
    pub fn hsn_summary(&self) -> DbResult<Vec<HsnLine>> {
        self.store.read(|tables| {
            let mut codes: HashMap<String, String> = HashMap::new();
            for (spec, column) in [(STOCK_ITEMS, "hsn_code"), (ITEMS_MASTER, "hsn")] {
                for row in tables.table(spec.name)?.rows() {
                    if let (Some(name), Some(code)) = (text_field(row, "name"), text_field(row, column)) {
                        codes.insert(name.to_string(), code.to_string());
                    }
                }
            }

            let lines: Vec<SoldLine> = tables
                .table(SALE_ITEMS.name)?
                .rows()
                .iter()
                .map(|line| {
                    let name = text_field(line, "product_name").unwrap_or_default();
                    SoldLine {
                        hsn: codes.get(name).cloned(),
                        name: name.to_string(),
                        quantity: number_field(line, "quantity") as i64,
                        price: Money::from_rupees(number_field(line, "price")),
                        tax: Money::from_rupees(number_field(line, "tax")),
                    }
                })
                .collect();

            Ok(reports::hsn_summary(&lines))
        })
    }

    // =========================================================================
    // Inventory
    // =========================================================================

    /// Every Invento item valued at its cost, alphabetical.
    pub fn inventory_valuation(&self) -> DbResult<InventoryValuation> {
        self.store.read(|tables| {
            let mut rows = tables.find_where(STOCK_ITEMS.name, |_| true)?;
            rows.sort_by(|a, b| asc_by(a, b, "name"));
            let items: Vec<StockItem> = rows
                .iter()
                .map(|row| StockItem {
                    id: row_id(row),
                    code: text_field(row, "sku").map(str::to_string),
                    name: text_field(row, "name").unwrap_or_default().to_string(),
                    quantity: number_field(row, "quantity") as i64,
                    cost: Money::from_rupees(number_field(row, "cost")),
                })
                .collect();

            let movements: Vec<Movement> = tables
                .table(MOVEMENTS.name)?
                .rows()
                .iter()
                .filter_map(|row| {
                    let kind: StockMovement = text_field(row, "type")?.parse().ok()?;
                    Some(Movement {
                        item_id: number_field(row, "item_id") as i64,
                        kind,
                        quantity: number_field(row, "quantity") as i64,
                    })
                })
                .collect();

            Ok(reports::inventory_valuation(&items, &movements))
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn ledger_balances(tables: &Tables) -> DbResult<Vec<LedgerBalance>> {
    Ok(tables
        .table(LEDGERS.name)?
        .rows()
        .iter()
        .map(|row| LedgerBalance {
            name: text_field(row, "name").unwrap_or_default().to_string(),
            kind: text_field(row, "type").and_then(|t| t.parse::<LedgerType>().ok()),
            balance: Money::from_rupees(number_field(row, "opening_balance")),
        })
        .collect())
}

fn entity_id(row: &Row) -> Option<i64> {
    let id = number_field(row, "entity_id") as i64;
    (id != 0).then_some(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use billease_core::models::{
        EntityInput, HeadInput, ItemInput, ItemMasterInput, LedgerInput, PaymentInput,
        SaleInput, StockMovementInput,
    };
    use billease_core::Validate;
    use serde::de::DeserializeOwned;
    use serde_json::{json, Value};

    fn input<T: DeserializeOwned + Validate>(v: Value) -> T {
        serde_json::from_value::<T>(v).unwrap().validated().unwrap()
    }

    fn day(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    fn chart(db: &Database) {
        let accounts = db.accounts();
        for (name, kind, balance) in [
            ("Cash", "Asset", 50_000.0),
            ("Loan", "Liability", -20_000.0),
            ("Capital", "Equity", 30_000.0),
            ("Sales", "Income", 75_000.0),
            ("Rent", "Expense", 15_000.0),
        ] {
            let ledger: LedgerInput =
                input(json!({ "name": name, "type": kind, "opening_balance": balance }));
            accounts.create_ledger(&ledger).unwrap();
        }
    }

    #[test]
    fn test_ledger_reports() {
        let db = Database::in_memory().unwrap();
        chart(&db);
        let reports = db.reports();

        let tb = reports.trial_balance().unwrap();
        assert_eq!(tb.lines.len(), 5);
        assert_eq!(tb.total_debit, 170_000.0);
        assert_eq!(tb.total_credit, 20_000.0);

        let sheet = reports.balance_sheet(day("2024-03-31")).unwrap();
        assert_eq!(sheet.assets, 50_000.0);
        assert_eq!(sheet.liabilities, -20_000.0);
        assert_eq!(sheet.equity, 30_000.0);
    }

    #[test]
    fn test_profit_and_loss_uses_head_ledgers() {
        let db = Database::in_memory().unwrap();
        chart(&db);
        let accounts = db.accounts();
        accounts
            .create_income_head(input::<HeadInput>(json!({ "name": "Counter sales", "ledger": "Sales" })))
            .unwrap();
        accounts
            .create_expense_head(input::<HeadInput>(json!({ "name": "Office rent", "ledger": "Rent" })))
            .unwrap();
        accounts
            .create_expense_head(input::<HeadInput>(json!({ "name": "Misc" })))
            .unwrap();

        let period = DateRange::parse(Some("2024-04-01"), Some("2025-03-31")).unwrap();
        let pl = db.reports().profit_and_loss(period).unwrap();
        assert_eq!(pl.income, 75_000.0);
        assert_eq!(pl.expenses, 15_000.0);
        assert_eq!(pl.net_profit, 60_000.0);
        assert_eq!(pl.to_date, Some(day("2025-03-31")));
    }

    fn sell(db: &Database, invoice: &str, date: &str, entity_id: i64, lines: Value) {
        let total: f64 = lines
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["quantity"].as_f64().unwrap() * l["price"].as_f64().unwrap())
            .sum();
        db.pos()
            .create_sale(&input::<SaleInput>(json!({
                "invoice_no": invoice, "date": date, "entity_id": entity_id,
                "total": total, "items": lines
            })))
            .unwrap();
    }

    fn customer(db: &Database, name: &str) -> i64 {
        let row = db
            .pos()
            .create_entity(&input::<EntityInput>(json!({ "name": name, "type": "customer" })))
            .unwrap();
        row_id(&row)
    }

    #[test]
    fn test_sales_report_in_range() {
        let db = Database::in_memory().unwrap();
        let acme = customer(&db, "Acme");
        sell(&db, "INV-1", "2024-01-10", acme, json!([
            { "product_name": "Pen", "quantity": 10, "price": 5, "tax": 9 }
        ]));
        sell(&db, "INV-2", "2024-02-10", acme, json!([
            { "product_name": "Book", "quantity": 1, "price": 100, "tax": 12 }
        ]));

        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        let report = db.reports().sales(range).unwrap();
        assert_eq!(report.count, 1);
        assert_eq!(report.total_sales, 50.0);
        assert_eq!(report.total_tax, 9.0);
        assert_eq!(report.sales[0]["invoice_no"], "INV-1");
        assert_eq!(report.sales[0]["entity_name"], "Acme");
        assert_eq!(report.sales[0]["items"].as_array().unwrap().len(), 1);

        let all = db.reports().sales(DateRange::default()).unwrap();
        assert_eq!(all.count, 2);
        assert_eq!(all.sales[0]["invoice_no"], "INV-2");
    }

    #[test]
    fn test_aged_receivables_per_customer() {
        let db = Database::in_memory().unwrap();
        let zen = customer(&db, "zen traders");
        let acme = customer(&db, "Acme");
        db.pos()
            .create_entity(&input::<EntityInput>(json!({ "name": "Paper Mill", "type": "supplier" })))
            .unwrap();
        sell(&db, "INV-1", "2024-06-20", acme, json!([
            { "product_name": "Pen", "quantity": 10, "price": 10 }
        ]));
        sell(&db, "INV-2", "2024-01-02", zen, json!([
            { "product_name": "Ink", "quantity": 1, "price": 40 }
        ]));
        db.pos()
            .create_payment(&input::<PaymentInput>(json!({
                "receipt_no": "R-1", "date": "2024-06-25", "entity_id": acme, "amount": 30
            })))
            .unwrap();

        let lines = db.reports().aged_receivables(day("2024-06-30")).unwrap();
        let names: Vec<_> = lines.iter().map(|l| l.customer.as_str()).collect();
        assert_eq!(names, vec!["Acme", "zen traders"]);
        assert_eq!(lines[0].outstanding, 70.0);
        assert_eq!(lines[0].aging.current, 100.0);
        assert_eq!(lines[1].aging.over90, 40.0);
    }

    #[test]
    fn test_hsn_summary_resolves_codes_by_name() {
        let db = Database::in_memory().unwrap();
        db.accounts()
            .create_master_item(&input::<ItemMasterInput>(
                json!({ "code": "P-1", "name": "Pen", "hsn": "9608" }),
            ))
            .unwrap();
        let acme = customer(&db, "Acme");
        sell(&db, "INV-1", "2024-01-10", acme, json!([
            { "product_name": "Pen", "quantity": 10, "price": 5, "tax": 9 },
            { "product_name": "Sticker", "quantity": 2, "price": 1 }
        ]));
        sell(&db, "INV-2", "2024-01-11", acme, json!([
            { "product_name": "Pen", "quantity": 2, "price": 5, "tax": 1.8 }
        ]));

        let summary = db.reports().hsn_summary().unwrap();
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].hsn, "9608");
        assert_eq!(summary[0].quantity, 12);
        assert_eq!(summary[0].value, 60.0);
        assert_eq!(summary[0].tax, 10.8);
        assert_eq!(summary[1].hsn, "N/A");
        assert_eq!(summary[1].description, "Sticker");
    }

    #[test]
    fn test_inventory_valuation_from_movements() {
        let db = Database::in_memory().unwrap();
        let inventory = db.inventory();
        inventory
            .create_item(&input::<ItemInput>(
                json!({ "name": "widget", "sku": "W-1", "quantity": 10, "cost": 2.5 }),
            ))
            .unwrap();
        inventory
            .create_item(&input::<ItemInput>(json!({ "name": "Anvil", "quantity": 1, "cost": 900 })))
            .unwrap();
        for (kind, qty) in [("in", 5), ("out", 3)] {
            let movement: StockMovementInput = serde_json::from_value(
                json!({ "item_id": 1, "type": kind, "quantity": qty, "date": "2024-01-01" }),
            )
            .unwrap();
            inventory.record_movement(movement).unwrap();
        }

        let valuation = db.reports().inventory_valuation().unwrap();
        assert_eq!(valuation.items[0].name, "Anvil");
        let widget = &valuation.items[1];
        assert_eq!(widget.code.as_deref(), Some("W-1"));
        assert_eq!(widget.opening_stock, 10);
        assert_eq!(widget.closing_stock, 12);
        assert_eq!(widget.stock_value, 30.0);
        assert_eq!(valuation.total_value, 930.0);
    }

    #[test]
    fn test_reports_on_empty_store() {
        let db = Database::in_memory().unwrap();
        let reports = db.reports();
        assert!(reports.trial_balance().unwrap().lines.is_empty());
        assert!(reports.hsn_summary().unwrap().is_empty());
        assert!(reports.aged_receivables(day("2024-01-01")).unwrap().is_empty());
        assert_eq!(reports.inventory_valuation().unwrap().total_value, 0.0);
    }
}
