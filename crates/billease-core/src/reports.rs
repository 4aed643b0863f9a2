//! # Reports Module
//!
//! Accounting and trading reports for Accounts+, computed from rows the
//! storage layer has already read.
//!
//! ## Report Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ledgers ───────────────┬──► trial_balance     (debit / credit split)  │
//! │                         ├──► balance_sheet     (Asset/Liability/Equity)│
//! │  income/expense heads ──┴──► profit_and_loss   (head → ledger balance) │
//! │                                                                         │
//! │  pos_sales ─────────────┬──► sales_report      (date range, tax)       │
//! │  pos_payments ──────────┴──► aged_receivables  (30/60/90/120 buckets)  │
//! │                                                                         │
//! │  pos_sale_items ────────────► hsn_summary      (grouped by HSN code)   │
//! │  invento_items + moves ─────► inventory_valuation                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A ledger's balance is its `opening_balance`; no journal postings
//! exist yet to move it. Totals are summed in paise via [`Money`].

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{LedgerType, StockMovement};
use crate::validation::{is_blank, ValidationResult};

/// HSN bucket for sold lines whose item has no code.
pub const UNCLASSIFIED_HSN: &str = "N/A";

// =============================================================================
// Dates
// =============================================================================

/// Reads the `YYYY-MM-DD` prefix of a stored date or timestamp.
///
/// ## Example
/// ```rust
/// use billease_core::reports::parse_date;
///
/// assert!(parse_date("2024-03-01").is_some());
/// assert!(parse_date("2024-03-01T10:00:00.000Z").is_some());
/// assert!(parse_date("soon").is_none());
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let day = text.get(..10).unwrap_or(text);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// An inclusive date range; a missing end is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    /// Parses `?from=&to=` query values. Blank values leave that end open.
    pub fn parse(from: Option<&str>, to: Option<&str>) -> ValidationResult<Self> {
        Ok(Self {
            from: optional_date(from, "from date")?,
            to: optional_date(to, "to date")?,
        })
    }

    /// True when `date` is known and inside the range.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        let Some(date) = date else {
            return false;
        };
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Parses an optional `YYYY-MM-DD` query value.
pub fn optional_date(raw: Option<&str>, label: &str) -> ValidationResult<Option<NaiveDate>> {
    if is_blank(raw) {
        return Ok(None);
    }
    raw.and_then(parse_date)
        .map(Some)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: label.to_string(),
        })
}

// =============================================================================
// Ledger Reports
// =============================================================================

/// One ledger as the ledger reports see it.
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerBalance {
    pub name: String,
    pub kind: Option<LedgerType>,
    pub balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrialBalanceLine {
    pub name: String,
    pub debit: f64,
    pub credit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TrialBalance {
    pub lines: Vec<TrialBalanceLine>,
    pub total_debit: f64,
    pub total_credit: f64,
}

/// Positive balances are debits, negative balances credits.
///
/// ## Example
/// ```rust
/// use billease_core::money::Money;
/// use billease_core::reports::{trial_balance, LedgerBalance};
///
/// let ledgers = [
///     LedgerBalance { name: "Cash".into(), kind: None, balance: Money::from_rupees(500.0) },
///     LedgerBalance { name: "Loan".into(), kind: None, balance: Money::from_rupees(-200.0) },
/// ];
/// let tb = trial_balance(&ledgers);
/// assert_eq!(tb.total_debit, 500.0);
/// assert_eq!(tb.lines[1].credit, 200.0);
/// ```
pub fn trial_balance(ledgers: &[LedgerBalance]) -> TrialBalance {
    let (mut debit_total, mut credit_total) = (Money::zero(), Money::zero());
    let lines = ledgers
        .iter()
        .map(|ledger| {
            let debit = ledger.balance.floor_zero();
            let credit = (Money::zero() - ledger.balance).floor_zero();
            debit_total += debit;
            credit_total += credit;
            TrialBalanceLine {
                name: ledger.name.clone(),
                debit: debit.to_rupees(),
                credit: credit.to_rupees(),
            }
        })
        .collect();

    TrialBalance {
        lines,
        total_debit: debit_total.to_rupees(),
        total_credit: credit_total.to_rupees(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheet {
    pub assets: f64,
    pub liabilities: f64,
    pub equity: f64,
    /// Equals `assets`.
    pub total: f64,
    #[ts(as = "String")]
    pub as_on_date: NaiveDate,
}

fn total_of(ledgers: &[LedgerBalance], kind: LedgerType) -> Money {
    ledgers
        .iter()
        .filter(|l| l.kind == Some(kind))
        .map(|l| l.balance)
        .sum()
}

pub fn balance_sheet(ledgers: &[LedgerBalance], as_on_date: NaiveDate) -> BalanceSheet {
    let assets = total_of(ledgers, LedgerType::Asset);
    BalanceSheet {
        assets: assets.to_rupees(),
        liabilities: total_of(ledgers, LedgerType::Liability).to_rupees(),
        equity: total_of(ledgers, LedgerType::Equity).to_rupees(),
        total: assets.to_rupees(),
        as_on_date,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProfitAndLoss {
    pub income: f64,
    pub expenses: f64,
    pub net_profit: f64,
    #[ts(as = "Option<String>")]
    pub from_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub to_date: Option<NaiveDate>,
}

/// Sums, per head, the balance of the first ledger named by the head.
///
/// `income_heads` and `expense_heads` hold each head's `ledger` column;
/// a head without a ledger, or naming no ledger, adds nothing.
pub fn profit_and_loss(
    ledgers: &[LedgerBalance],
    income_heads: &[Option<String>],
    expense_heads: &[Option<String>],
    period: DateRange,
) -> ProfitAndLoss {
    let through_heads = |heads: &[Option<String>]| -> Money {
        heads
            .iter()
            .filter_map(|head| {
                let name = head.as_deref()?;
                ledgers.iter().find(|l| l.name == name).map(|l| l.balance)
            })
            .sum()
    };
    let income = through_heads(income_heads);
    let expenses = through_heads(expense_heads);

    ProfitAndLoss {
        income: income.to_rupees(),
        expenses: expenses.to_rupees(),
        net_profit: (income - expenses).to_rupees(),
        from_date: period.from,
        to_date: period.to,
    }
}

// =============================================================================
// Sales Reports
// =============================================================================

/// Figures of one sale invoice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaleFigures {
    pub date: Option<NaiveDate>,
    pub total: Money,
    /// Sum of the tax amounts on the invoice lines.
    pub tax: Money,
}

/// Sales inside a date range. `S` is the sale as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport<S> {
    pub sales: Vec<S>,
    pub total_sales: f64,
    pub total_tax: f64,
    pub count: usize,
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
}

pub fn sales_report<S>(
    sales: impl IntoIterator<Item = (S, SaleFigures)>,
    range: DateRange,
) -> SalesReport<S> {
    let (mut total, mut tax) = (Money::zero(), Money::zero());
    let sales: Vec<S> = sales
        .into_iter()
        .filter(|(_, figures)| range.contains(figures.date))
        .map(|(sale, figures)| {
            total += figures.total;
            tax += figures.tax;
            sale
        })
        .collect();

    SalesReport {
        count: sales.len(),
        sales,
        total_sales: total.to_rupees(),
        total_tax: tax.to_rupees(),
        from_date: range.from,
        to_date: range.to,
    }
}

/// An invoice counted against a customer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Receivable {
    pub entity_id: Option<i64>,
    pub date: Option<NaiveDate>,
    pub total: Money,
    pub balance: Money,
}

/// A payment received from a customer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Receipt {
    pub entity_id: Option<i64>,
    pub amount: Money,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AgingBuckets {
    /// 0-30 days (and future-dated invoices).
    pub current: f64,
    pub days30: f64,
    pub days60: f64,
    pub days90: f64,
    /// Over 120 days, or an unreadable invoice date.
    pub over90: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableLine {
    pub customer_id: i64,
    pub customer: String,
    pub total_sales: f64,
    pub total_payments: f64,
    pub outstanding: f64,
    pub aging: AgingBuckets,
}

/// Bucket index by invoice age in days.
///
/// ```text
/// ≤30 current │ ≤60 days30 │ ≤90 days60 │ ≤120 days90 │ else over90
/// ```
fn aging_bucket(age_days: Option<i64>) -> usize {
    match age_days {
        Some(d) if d <= 30 => 0,
        Some(d) if d <= 60 => 1,
        Some(d) if d <= 90 => 2,
        Some(d) if d <= 120 => 3,
        _ => 4,
    }
}

/// Outstanding amounts per customer, aged against `today`.
///
/// An invoice ages its `balance`, or its `total` when the balance is
/// zero.
pub fn aged_receivables(
    customers: &[(i64, String)],
    invoices: &[Receivable],
    receipts: &[Receipt],
    today: NaiveDate,
) -> Vec<ReceivableLine> {
    customers
        .iter()
        .map(|(id, name)| {
            let mine = invoices.iter().filter(|inv| inv.entity_id == Some(*id));
            let paid: Money = receipts
                .iter()
                .filter(|r| r.entity_id == Some(*id))
                .map(|r| r.amount)
                .sum();

            let mut sales = Money::zero();
            let mut buckets = [Money::zero(); 5];
            for invoice in mine {
                sales += invoice.total;
                let open = if invoice.balance.is_zero() {
                    invoice.total
                } else {
                    invoice.balance
                };
                let age = invoice.date.map(|d| (today - d).num_days());
                buckets[aging_bucket(age)] += open;
            }

            ReceivableLine {
                customer_id: *id,
                customer: name.clone(),
                total_sales: sales.to_rupees(),
                total_payments: paid.to_rupees(),
                outstanding: (sales - paid).to_rupees(),
                aging: AgingBuckets {
                    current: buckets[0].to_rupees(),
                    days30: buckets[1].to_rupees(),
                    days60: buckets[2].to_rupees(),
                    days90: buckets[3].to_rupees(),
                    over90: buckets[4].to_rupees(),
                },
            }
        })
        .collect()
}

// =============================================================================
// HSN Summary
// =============================================================================

/// One sold invoice line with its resolved HSN code.
#[derive(Debug, Clone, PartialEq)]
pub struct SoldLine {
    pub hsn: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub price: Money,
    pub tax: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HsnLine {
    pub hsn: String,
    /// Name of the first line seen under this code.
    pub description: String,
    pub quantity: i64,
    pub value: f64,
    pub tax: f64,
}

/// Numeric codes (`"8471"`) in ascending order, then the rest in the
/// order first seen.
fn hsn_order(code: &str) -> (u8, u32) {
    match code.parse::<u32>() {
        Ok(n) if n != u32::MAX && n.to_string() == code => (0, n),
        _ => (1, 0),
    }
}

/// Groups sold lines by HSN code; value is `quantity × price`.
pub fn hsn_summary(lines: &[SoldLine]) -> Vec<HsnLine> {
    let mut totals: Vec<(HsnLine, Money, Money)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in lines {
        let code = match line.hsn.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => UNCLASSIFIED_HSN.to_string(),
        };
        let slot = *index.entry(code.clone()).or_insert_with(|| {
            totals.push((
                HsnLine {
                    hsn: code,
                    description: line.name.clone(),
                    quantity: 0,
                    value: 0.0,
                    tax: 0.0,
                },
                Money::zero(),
                Money::zero(),
            ));
            totals.len() - 1
        });
        let (entry, value, tax) = &mut totals[slot];
        entry.quantity = entry.quantity.saturating_add(line.quantity);
        *value += line.price * line.quantity;
        *tax += line.tax;
    }

    let mut out: Vec<HsnLine> = totals
        .into_iter()
        .map(|(mut line, value, tax)| {
            line.value = value.to_rupees();
            line.tax = tax.to_rupees();
            line
        })
        .collect();
    out.sort_by_key(|line| hsn_order(&line.hsn));
    out
}

// =============================================================================
// Inventory Valuation
// =============================================================================

/// An Invento item with its current quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct StockItem {
    pub id: i64,
    pub code: Option<String>,
    pub name: String,
    pub quantity: i64,
    pub cost: Money,
}

/// One recorded stock movement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Movement {
    pub item_id: i64,
    pub kind: StockMovement,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ValuationLine {
    pub item_id: i64,
    pub code: Option<String>,
    pub name: String,
    pub opening_stock: i64,
    pub stock_in: i64,
    pub stock_out: i64,
    pub closing_stock: i64,
    pub cost_price: f64,
    pub stock_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InventoryValuation {
    pub items: Vec<ValuationLine>,
    pub total_value: f64,
}

/// Values every item at `quantity × cost`.
///
/// The item's quantity already includes its movements, so the opening
/// stock is worked back as `closing − in + out`.
pub fn inventory_valuation(items: &[StockItem], movements: &[Movement]) -> InventoryValuation {
    let mut total = Money::zero();
    let lines = items
        .iter()
        .map(|item| {
            let (mut stock_in, mut stock_out) = (0i64, 0i64);
            for m in movements.iter().filter(|m| m.item_id == item.id) {
                match m.kind {
                    StockMovement::In => stock_in = stock_in.saturating_add(m.quantity),
                    StockMovement::Out => stock_out = stock_out.saturating_add(m.quantity),
                }
            }
            let value = item.cost * item.quantity;
            total += value;

            ValuationLine {
                item_id: item.id,
                code: item.code.clone(),
                name: item.name.clone(),
                opening_stock: item.quantity.saturating_sub(stock_in).saturating_add(stock_out),
                stock_in,
                stock_out,
                closing_stock: item.quantity,
                cost_price: item.cost.to_rupees(),
                stock_value: value.to_rupees(),
            }
        })
        .collect();

    InventoryValuation {
        items: lines,
        total_value: total.to_rupees(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(r: f64) -> Money {
        Money::from_rupees(r)
    }

    fn day(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    fn ledger(name: &str, kind: LedgerType, balance: f64) -> LedgerBalance {
        LedgerBalance {
            name: name.to_string(),
            kind: Some(kind),
            balance: rupees(balance),
        }
    }

    fn chart() -> Vec<LedgerBalance> {
        vec![
            ledger("Cash", LedgerType::Asset, 50_000.0),
            ledger("Bank", LedgerType::Asset, 25_000.5),
            ledger("Loan", LedgerType::Liability, -30_000.0),
            ledger("Capital", LedgerType::Equity, 45_000.5),
            ledger("Sales", LedgerType::Income, 80_000.0),
            ledger("Rent", LedgerType::Expense, 12_000.0),
        ]
    }

    #[test]
    fn test_trial_balance_splits_debit_and_credit() {
        let tb = trial_balance(&chart());
        assert_eq!(tb.lines.len(), 6);
        assert_eq!(tb.lines[2].name, "Loan");
        assert_eq!(tb.lines[2].debit, 0.0);
        assert_eq!(tb.lines[2].credit, 30_000.0);
        assert_eq!(tb.total_credit, 30_000.0);
        assert_eq!(tb.total_debit, 212_001.0);
    }

    #[test]
    fn test_balance_sheet_totals_by_type() {
        let sheet = balance_sheet(&chart(), day("2024-03-31"));
        assert_eq!(sheet.assets, 75_000.5);
        assert_eq!(sheet.liabilities, -30_000.0);
        assert_eq!(sheet.equity, 45_000.5);
        assert_eq!(sheet.total, sheet.assets);
        assert_eq!(sheet.as_on_date, day("2024-03-31"));
    }

    #[test]
    fn test_profit_and_loss_through_heads() {
        let income = vec![Some("Sales".to_string()), Some("Missing".to_string()), None];
        let expenses = vec![Some("Rent".to_string()), Some("Rent".to_string())];
        let pl = profit_and_loss(&chart(), &income, &expenses, DateRange::default());
        assert_eq!(pl.income, 80_000.0);
        // a ledger named by two heads counts twice
        assert_eq!(pl.expenses, 24_000.0);
        assert_eq!(pl.net_profit, 56_000.0);
        assert_eq!(pl.from_date, None);
    }

    #[test]
    fn test_date_range_parsing() {
        let range = DateRange::parse(Some("2024-01-01"), Some("")).unwrap();
        assert_eq!(range.from, Some(day("2024-01-01")));
        assert_eq!(range.to, None);

        let err = DateRange::parse(Some("yesterday"), None).unwrap_err();
        assert_eq!(err.to_string(), "Invalid from date format");
        assert!(DateRange::parse(None, Some("2024-13-01")).is_err());
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        assert!(range.contains(Some(day("2024-01-01"))));
        assert!(range.contains(Some(day("2024-01-31"))));
        assert!(!range.contains(Some(day("2024-02-01"))));
        assert!(!range.contains(None));
        assert!(DateRange::default().contains(Some(day("1999-12-31"))));
    }

    #[test]
    fn test_sales_report_filters_and_sums() {
        let sale = |no: &str, date: &str, total: f64, tax: f64| {
            (
                no.to_string(),
                SaleFigures {
                    date: parse_date(date),
                    total: rupees(total),
                    tax: rupees(tax),
                },
            )
        };
        let sales = vec![
            sale("INV-1", "2024-01-05", 100.1, 18.0),
            sale("INV-2", "2024-02-10", 200.2, 36.0),
            sale("INV-3", "not a date", 999.0, 0.0),
            sale("INV-4", "2024-01-31", 0.2, 0.5),
        ];
        let range = DateRange::parse(Some("2024-01-01"), Some("2024-01-31")).unwrap();
        let report = sales_report(sales, range);
        assert_eq!(report.sales, vec!["INV-1", "INV-4"]);
        assert_eq!(report.count, 2);
        assert_eq!(report.total_sales, 100.3);
        assert_eq!(report.total_tax, 18.5);
    }

    #[test]
    fn test_aged_receivables_buckets() {
        let today = day("2024-06-30");
        let invoice = |date: &str, total: f64, balance: f64| Receivable {
            entity_id: Some(1),
            date: parse_date(date),
            total: rupees(total),
            balance: rupees(balance),
        };
        let invoices = vec![
            invoice("2024-06-20", 100.0, 0.0),  // 10 days, whole total
            invoice("2024-05-15", 200.0, 50.0), // 46 days, balance only
            invoice("2024-04-01", 300.0, 0.0),  // 90 days
            invoice("2024-03-02", 400.0, 0.0),  // 120 days
            invoice("2023-12-01", 500.0, 0.0),
            invoice("garbled", 10.0, 0.0),
            Receivable {
                entity_id: Some(2),
                ..invoice("2024-06-01", 70.0, 0.0)
            },
        ];
        let receipts = vec![
            Receipt { entity_id: Some(1), amount: rupees(150.0) },
            Receipt { entity_id: None, amount: rupees(9_999.0) },
        ];
        let customers = vec![(1, "Acme".to_string()), (3, "Idle".to_string())];

        let lines = aged_receivables(&customers, &invoices, &receipts, today);
        assert_eq!(lines.len(), 2);

        let acme = &lines[0];
        assert_eq!(acme.customer, "Acme");
        assert_eq!(acme.total_sales, 1_510.0);
        assert_eq!(acme.total_payments, 150.0);
        assert_eq!(acme.outstanding, 1_360.0);
        assert_eq!(acme.aging.current, 100.0);
        assert_eq!(acme.aging.days30, 50.0);
        assert_eq!(acme.aging.days60, 300.0);
        assert_eq!(acme.aging.days90, 400.0);
        assert_eq!(acme.aging.over90, 510.0);

        assert_eq!(lines[1].total_sales, 0.0);
        assert_eq!(lines[1].aging, AgingBuckets::default());
    }

    #[test]
    fn test_hsn_summary_groups_and_orders() {
        let sold = |hsn: Option<&str>, name: &str, qty: i64, price: f64, tax: f64| SoldLine {
            hsn: hsn.map(str::to_string),
            name: name.to_string(),
            quantity: qty,
            price: rupees(price),
            tax: rupees(tax),
        };
        let lines = vec![
            sold(Some("9608"), "Pen", 10, 5.0, 9.0),
            sold(None, "Gift wrap", 1, 20.0, 0.0),
            sold(Some("4820"), "Notebook", 2, 40.5, 14.58),
            sold(Some("9608"), "Marker", 3, 10.0, 5.4),
            sold(Some("  "), "Sticker", 4, 1.0, 0.0),
            sold(Some("0401"), "Milk", 1, 30.0, 0.0),
        ];
        let summary = hsn_summary(&lines);
        let codes: Vec<_> = summary.iter().map(|l| l.hsn.as_str()).collect();
        assert_eq!(codes, vec!["4820", "9608", "N/A", "0401"]);

        let pens = &summary[1];
        assert_eq!(pens.description, "Pen");
        assert_eq!(pens.quantity, 13);
        assert_eq!(pens.value, 80.0);
        assert_eq!(pens.tax, 14.4);

        let unclassified = &summary[2];
        assert_eq!(unclassified.quantity, 5);
        assert_eq!(unclassified.value, 24.0);
    }

    #[test]
    fn test_inventory_valuation_works_back_opening() {
        let items = vec![
            StockItem {
                id: 1,
                code: Some("W-1".into()),
                name: "Widget".into(),
                quantity: 7,
                cost: rupees(12.5),
            },
            StockItem {
                id: 2,
                code: None,
                name: "Bolt".into(),
                quantity: 0,
                cost: rupees(1.0),
            },
        ];
        let movements = vec![
            Movement { item_id: 1, kind: StockMovement::In, quantity: 5 },
            Movement { item_id: 1, kind: StockMovement::Out, quantity: 8 },
            Movement { item_id: 9, kind: StockMovement::In, quantity: 100 },
        ];
        let valuation = inventory_valuation(&items, &movements);
        let widget = &valuation.items[0];
        assert_eq!(widget.opening_stock, 10);
        assert_eq!(widget.stock_in, 5);
        assert_eq!(widget.stock_out, 8);
        assert_eq!(widget.closing_stock, 7);
        assert_eq!(widget.stock_value, 87.5);
        assert_eq!(valuation.items[1].stock_value, 0.0);
        assert_eq!(valuation.total_value, 87.5);
    }

    #[test]
    fn test_reports_with_huge_figures_saturate() {
        let items = vec![StockItem {
            id: 1,
            code: None,
            name: "Ingot".into(),
            quantity: i64::MAX,
            cost: rupees(1e12),
        }];
        let valuation = inventory_valuation(&items, &[]);
        assert_eq!(valuation.total_value, i64::MAX as f64 / 100.0);

        let tb = trial_balance(&[
            ledger("A", LedgerType::Asset, 1e17),
            ledger("B", LedgerType::Asset, 1e17),
        ]);
        assert_eq!(tb.total_debit, i64::MAX as f64 / 100.0);
    }
}
