//! # Finance Repository
//!
//! Income/Expense: transactions, categories, budgets, recurring entries,
//! family members and the running summary.
//!
//! Amounts are summed in integer paise so the summary never drifts:
//! `0.1 + 0.2` rupees totals exactly `0.30`.

use std::sync::Arc;

use billease_core::models::{
    BudgetInput, CategoryInput, FamilyMemberInput, RecurringInput, TransactionInput,
};
use billease_core::{FinanceSummary, Money, TransactionKind};
use serde_json::Value;
use tracing::{debug, warn};

use super::{filters, Stamps, TableSpec};
use crate::error::{DbError, DbResult};
use crate::row::{asc_by, desc_by, field_eq, newest_first, number_field, row_id, text_field, Row};
use crate::store::Store;

const TRANSACTIONS: TableSpec =
    TableSpec::new("transactions", "Transaction", Stamps::CreatedUpdated);
const INCOME_CATEGORIES: TableSpec =
    TableSpec::new("income_categories", "Category", Stamps::Created);
const EXPENSE_CATEGORIES: TableSpec =
    TableSpec::new("expense_categories", "Category", Stamps::Created);
const BUDGETS: TableSpec = TableSpec::new("budgets", "Budget", Stamps::Created);
const RECURRING: TableSpec =
    TableSpec::new("recurring_transactions", "Recurring transaction", Stamps::Created);
const FAMILY: TableSpec = TableSpec::new("family_members", "Family member", Stamps::Created);

fn categories_of(kind: TransactionKind) -> TableSpec {
    match kind {
        TransactionKind::Income => INCOME_CATEGORIES,
        TransactionKind::Expense => EXPENSE_CATEGORIES,
    }
}

/// Repository for Income/Expense tables.
#[derive(Debug, Clone)]
pub struct FinanceRepository {
    store: Arc<Store>,
}

impl FinanceRepository {
    /// Creates a new FinanceRepository.
    pub fn new(store: Arc<Store>) -> Self {
        FinanceRepository { store }
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Transactions, optionally of one type, latest date first.
    pub fn list_transactions(&self, kind: Option<&str>) -> DbResult<Vec<Row>> {
        TRANSACTIONS.list(&self.store, &filters(&[("type", kind)]), |a, b| {
            desc_by(a, b, "date", "created_at")
        })
    }

    pub fn get_transaction(&self, id: i64) -> DbResult<Row> {
        TRANSACTIONS.get(&self.store, id)
    }

    pub fn create_transaction(&self, input: &TransactionInput) -> DbResult<Row> {
        let row = TRANSACTIONS.insert(&self.store, input)?;
        debug!(id = row_id(&row), kind = ?input.kind, amount = ?input.amount, "Transaction recorded");
        Ok(row)
    }

    pub fn update_transaction(&self, id: i64, input: &TransactionInput) -> DbResult<Row> {
        TRANSACTIONS.update(&self.store, id, input)
    }

    pub fn delete_transaction(&self, id: i64) -> DbResult<bool> {
        TRANSACTIONS.delete(&self.store, id)
    }

    /// Totals of every income and expense row.
    pub fn summary(&self) -> DbResult<FinanceSummary> {
        self.store.read(|tables| {
            let (mut income, mut expense) = (Money::zero(), Money::zero());
            for row in tables.table(TRANSACTIONS.name)?.rows() {
                let amount = Money::from_rupees(number_field(row, "amount"));
                match text_field(row, "type") {
                    Some("income") => income += amount,
                    Some("expense") => expense += amount,
                    _ => {}
                }
            }
            Ok(FinanceSummary::from_totals(income, expense))
        })
    }

    // =========================================================================
    // Categories
    // =========================================================================

    /// Category names of one side, alphabetical.
    pub fn category_names(&self, kind: TransactionKind) -> DbResult<Vec<String>> {
        let rows = categories_of(kind).list(&self.store, &[], |a, b| asc_by(a, b, "name"))?;
        Ok(rows
            .iter()
            .filter_map(|r| text_field(r, "name").map(str::to_string))
            .collect())
    }

    /// Adds a category; names are unique per side.
    pub fn add_category(&self, kind: TransactionKind, input: &CategoryInput) -> DbResult<Row> {
        let spec = categories_of(kind);
        let name = Value::String(input.name.clone().unwrap_or_default());

        self.store.write(|tables| {
            if tables.find_first(spec.name, field_eq("name", &name))?.is_some() {
                warn!(table = spec.name, name = %name, "Duplicate category rejected");
                return Err(DbError::duplicate("Category", name.as_str().unwrap_or_default()));
            }
            spec.insert_in(tables, input)
        })
    }

    pub fn delete_category(&self, kind: TransactionKind, name: &str) -> DbResult<bool> {
        let name = Value::from(name);
        self.store
            .delete_first(categories_of(kind).name, field_eq("name", &name))
    }

    // =========================================================================
    // Budgets and Recurring
    // =========================================================================

    pub fn list_budgets(&self, mode: Option<&str>) -> DbResult<Vec<Row>> {
        BUDGETS.list(&self.store, &filters(&[("mode", mode)]), newest_first)
    }

    pub fn create_budget(&self, input: &BudgetInput) -> DbResult<Row> {
        BUDGETS.insert(&self.store, input)
    }

    pub fn list_recurring(&self, mode: Option<&str>) -> DbResult<Vec<Row>> {
        RECURRING.list(&self.store, &filters(&[("mode", mode)]), newest_first)
    }

    pub fn create_recurring(&self, input: &RecurringInput) -> DbResult<Row> {
        RECURRING.insert(&self.store, input)
    }

    // =========================================================================
    // Family Members
    // =========================================================================

    pub fn list_family_members(&self) -> DbResult<Vec<Row>> {
        FAMILY.list(&self.store, &[], |a, b| asc_by(a, b, "name"))
    }

    pub fn create_family_member(&self, input: &FamilyMemberInput) -> DbResult<Row> {
        FAMILY.insert(&self.store, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;
    use billease_core::Validate;
    use serde_json::json;

    fn repo() -> FinanceRepository {
        Database::in_memory().unwrap().finance()
    }

    fn transaction(kind: &str, amount: f64, date: &str) -> TransactionInput {
        let input: TransactionInput = serde_json::from_value(json!({
            "type": kind, "description": "entry", "amount": amount,
            "date": date, "category": "Other"
        }))
        .unwrap();
        input.validated().unwrap()
    }

    #[test]
    fn test_summary_sums_in_paise() {
        let repo = repo();
        repo.create_transaction(&transaction("income", 0.1, "2024-03-01")).unwrap();
        repo.create_transaction(&transaction("income", 0.2, "2024-03-02")).unwrap();
        repo.create_transaction(&transaction("expense", 0.05, "2024-03-03")).unwrap();

        let summary = repo.summary().unwrap();
        assert_eq!(summary.total_income, 0.3);
        assert_eq!(summary.total_expense, 0.05);
        assert_eq!(summary.balance, 0.25);
    }

    #[test]
    fn test_transactions_latest_date_first() {
        let repo = repo();
        repo.create_transaction(&transaction("income", 1.0, "2024-01-05")).unwrap();
        repo.create_transaction(&transaction("expense", 2.0, "2024-02-01")).unwrap();

        let rows = repo.list_transactions(None).unwrap();
        assert_eq!(rows[0]["date"], "2024-02-01");
        assert_eq!(repo.list_transactions(Some("income")).unwrap().len(), 1);
    }

    #[test]
    fn test_seeded_categories_listed_by_name() {
        let names = repo().category_names(TransactionKind::Income).unwrap();
        assert_eq!(names, vec!["Business", "Investment", "Other", "Salary"]);
    }

    #[test]
    fn test_duplicate_category_rejected() {
        let repo = repo();
        let input = CategoryInput {
            name: Some("Food".to_string()),
            icon: None,
        };
        let err = repo.add_category(TransactionKind::Expense, &input).unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));

        let input = CategoryInput {
            name: Some("Rent".to_string()),
            icon: None,
        };
        let row = repo.add_category(TransactionKind::Expense, &input).unwrap();
        assert_eq!(row["id"], 9);
        assert!(repo.delete_category(TransactionKind::Expense, "Rent").unwrap());
    }

    #[test]
    fn test_budgets_filtered_by_mode() {
        let repo = repo();
        for mode in ["individual", "family"] {
            let input: BudgetInput = serde_json::from_value(
                json!({ "category": "Food", "amount": 100, "period": "monthly", "mode": mode }),
            )
            .unwrap();
            repo.create_budget(&input.validated().unwrap()).unwrap();
        }
        assert_eq!(repo.list_budgets(Some("family")).unwrap().len(), 1);
        assert_eq!(repo.list_budgets(None).unwrap().len(), 2);
    }

    #[test]
    fn test_update_missing_transaction() {
        let err = repo()
            .update_transaction(3, &transaction("income", 1.0, "2024-01-01"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Transaction not found");
    }

    #[test]
    fn test_infinite_and_huge_amounts_rejected() {
        for amount in [json!("inf"), json!("1e400"), json!(1e17)] {
            let input: TransactionInput = serde_json::from_value(json!({
                "type": "income", "description": "entry", "amount": amount,
                "date": "2024-01-01", "category": "Other"
            }))
            .unwrap();
            assert_eq!(input.validated().unwrap_err().to_string(), "Amount is too large");
        }
    }

    #[test]
    fn test_summary_saturates_on_raw_rows() {
        let db = Database::in_memory().unwrap();
        let insert = db.sql();
        for _ in 0..2 {
            insert
                .prepare("INSERT INTO transactions (type, description, amount, date, category) VALUES (?, ?, ?, ?, ?)")
                .run(&[json!("income"), json!("raw"), json!(1e17), json!("2024-01-01"), json!("Other")])
                .unwrap();
        }

        let summary = db.finance().summary().unwrap();
        assert_eq!(summary.total_income, i64::MAX as f64 / 100.0);
        assert_eq!(summary.total_expense, 0.0);
        assert!(db.health_check());
        assert_eq!(db.finance().list_transactions(None).unwrap().len(), 2);
    }

    #[test]
    fn test_family_members_order_ignores_case() {
        let repo = repo();
        for name in ["ravi", "Asha", "meera", "Dev"] {
            let input: FamilyMemberInput = serde_json::from_value(json!({ "name": name })).unwrap();
            repo.create_family_member(&input.validated().unwrap()).unwrap();
        }
        let names: Vec<_> = repo
            .list_family_members()
            .unwrap()
            .iter()
            .map(|r| r["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Asha", "Dev", "meera", "ravi"]);
    }
}
