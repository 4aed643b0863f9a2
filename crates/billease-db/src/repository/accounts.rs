//! # Accounts+ Repository
//!
//! Company profile, chart of accounts, parties, items master,
//! income/expense heads, employees and payslips.
//!
//! ## Unique Columns
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  items_master.code       ← "Item code '<code>' already exists"         │
//! │  employees.employee_id   ← "Employee ID '<id>' already exists"         │
//! │                                                                         │
//! │  Checked and written inside one write section; an update may keep      │
//! │  its own value.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use billease_core::models::{
    CompanyInput, EmployeeInput, HeadInput, ItemMasterInput, LedgerInput, PartyInput,
};
use billease_core::payroll::{self, EmployeeRef, Payslip, SalaryStructure};
use billease_core::types::Rate;
use billease_core::Money;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{filters, Stamps, TableSpec};
use crate::error::{DbError, DbResult};
use crate::row::{by_id, field_eq, newest_first, number_field, row_id, text_field, to_row, Row};
use crate::store::Store;

const COMPANIES: TableSpec = TableSpec::new("companies", "Company", Stamps::Created);
const LEDGERS: TableSpec = TableSpec::new("ledgers", "Ledger", Stamps::Created);
const PARTIES: TableSpec = TableSpec::new("parties", "Party", Stamps::Created);
const ITEMS_MASTER: TableSpec = TableSpec::new("items_master", "Item", Stamps::Created);
const EXPENSE_HEADS: TableSpec = TableSpec::new("expense_heads", "Expense head", Stamps::Created);
const INCOME_HEADS: TableSpec = TableSpec::new("income_heads", "Income head", Stamps::Created);
const EMPLOYEES: TableSpec = TableSpec::new("employees", "Employee", Stamps::Created);

/// A column whose values may appear at most once per table.
struct UniqueColumn {
    table: TableSpec,
    field: &'static str,
    label: &'static str,
}

const ITEM_CODE: UniqueColumn = UniqueColumn {
    table: ITEMS_MASTER,
    field: "code",
    label: "Item code",
};

const EMPLOYEE_CODE: UniqueColumn = UniqueColumn {
    table: EMPLOYEES,
    field: "employee_id",
    label: "Employee ID",
};

impl UniqueColumn {
    /// Inserts `input` unless another row already holds its value.
    fn insert<T: Serialize>(&self, store: &Store, input: &T) -> DbResult<Row> {
        let row = to_row(input)?;
        store.write(|tables| {
            let value = row.get(self.field).cloned().unwrap_or(Value::Null);
            if tables.find_first(self.table.name, field_eq(self.field, &value))?.is_some() {
                return Err(self.violation(&value));
            }
            self.table.insert_in(tables, input)
        })
    }

    /// Updates row `id`; the value may match only the row itself.
    fn update<T: Serialize>(&self, store: &Store, id: i64, input: &T) -> DbResult<Row> {
        let changes = to_row(input)?;
        store.write(|tables| {
            let value = changes.get(self.field).cloned().unwrap_or(Value::Null);
            let taken = tables
                .find_first(self.table.name, |r| {
                    row_id(r) != id && field_eq(self.field, &value)(r)
                })?
                .is_some();
            if taken {
                return Err(self.violation(&value));
            }
            tables
                .update_first(self.table.name, by_id(id), changes)?
                .ok_or_else(|| DbError::not_found(self.table.entity, id))
        })
    }

    fn violation(&self, value: &Value) -> DbError {
        let shown = value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string());
        warn!(table = self.table.name, field = self.field, value = %shown, "Duplicate value rejected");
        DbError::duplicate(self.label, shown)
    }
}

/// Repository for Accounts+ tables.
#[derive(Debug, Clone)]
pub struct AccountsRepository {
    store: Arc<Store>,
}

impl AccountsRepository {
    /// Creates a new AccountsRepository.
    pub fn new(store: Arc<Store>) -> Self {
        AccountsRepository { store }
    }

    // =========================================================================
    // Companies
    // =========================================================================

    pub fn list_companies(&self) -> DbResult<Vec<Row>> {
        COMPANIES.list(&self.store, &[], newest_first)
    }

    pub fn create_company(&self, input: &CompanyInput) -> DbResult<Row> {
        COMPANIES.insert(&self.store, input)
    }

    pub fn update_company(&self, id: i64, input: &CompanyInput) -> DbResult<Row> {
        COMPANIES.update(&self.store, id, input)
    }

    // =========================================================================
    // Ledgers
    // =========================================================================

    pub fn list_ledgers(&self) -> DbResult<Vec<Row>> {
        LEDGERS.list(&self.store, &[], newest_first)
    }

    pub fn create_ledger(&self, input: &LedgerInput) -> DbResult<Row> {
        LEDGERS.insert(&self.store, input)
    }

    pub fn update_ledger(&self, id: i64, input: &LedgerInput) -> DbResult<Row> {
        LEDGERS.update(&self.store, id, input)
    }

    pub fn delete_ledger(&self, id: i64) -> DbResult<bool> {
        LEDGERS.delete(&self.store, id)
    }

    // =========================================================================
    // Parties
    // =========================================================================

    /// Parties, optionally only `Customer` or `Supplier`.
    pub fn list_parties(&self, kind: Option<&str>) -> DbResult<Vec<Row>> {
        PARTIES.list(&self.store, &filters(&[("type", kind)]), newest_first)
    }

    pub fn create_party(&self, input: &PartyInput) -> DbResult<Row> {
        PARTIES.insert(&self.store, input)
    }

    pub fn update_party(&self, id: i64, input: &PartyInput) -> DbResult<Row> {
        PARTIES.update(&self.store, id, input)
    }

    pub fn delete_party(&self, id: i64) -> DbResult<bool> {
        PARTIES.delete(&self.store, id)
    }

    // =========================================================================
    // Items Master
    // =========================================================================

    pub fn list_master_items(&self) -> DbResult<Vec<Row>> {
        ITEMS_MASTER.list(&self.store, &[], newest_first)
    }

    pub fn create_master_item(&self, input: &ItemMasterInput) -> DbResult<Row> {
        ITEM_CODE.insert(&self.store, input)
    }

    pub fn update_master_item(&self, id: i64, input: &ItemMasterInput) -> DbResult<Row> {
        ITEM_CODE.update(&self.store, id, input)
    }

    pub fn delete_master_item(&self, id: i64) -> DbResult<bool> {
        ITEMS_MASTER.delete(&self.store, id)
    }

    // =========================================================================
    // Heads
    // =========================================================================

    pub fn list_expense_heads(&self) -> DbResult<Vec<Row>> {
        EXPENSE_HEADS.list(&self.store, &[], newest_first)
    }

    pub fn create_expense_head(&self, input: HeadInput) -> DbResult<Row> {
        EXPENSE_HEADS.insert(&self.store, &input.with_default_kind("Expense"))
    }

    pub fn list_income_heads(&self) -> DbResult<Vec<Row>> {
        INCOME_HEADS.list(&self.store, &[], newest_first)
    }

    pub fn create_income_head(&self, input: HeadInput) -> DbResult<Row> {
        INCOME_HEADS.insert(&self.store, &input.with_default_kind("Income"))
    }

    // =========================================================================
    // Employees
    // =========================================================================

    pub fn list_employees(&self) -> DbResult<Vec<Row>> {
        EMPLOYEES.list(&self.store, &[], newest_first)
    }

    pub fn get_employee(&self, id: i64) -> DbResult<Row> {
        EMPLOYEES.get(&self.store, id)
    }

    pub fn create_employee(&self, input: &EmployeeInput) -> DbResult<Row> {
        let row = EMPLOYEE_CODE.insert(&self.store, input)?;
        debug!(id = row_id(&row), code = ?input.employee_id, "Employee registered");
        Ok(row)
    }

    pub fn update_employee(&self, id: i64, input: &EmployeeInput) -> DbResult<Row> {
        EMPLOYEE_CODE.update(&self.store, id, input)
    }

    pub fn delete_employee(&self, id: i64) -> DbResult<bool> {
        EMPLOYEES.delete(&self.store, id)
    }

    /// Builds the payslip of employee `id` for `month`/`year`.
    ///
    /// ## Returns
    /// * `Ok(Payslip)` - Salary, statutory deductions and leave balance
    /// * `Err(DbError::NotFound)` - Unknown employee
    pub fn payslip(
        &self,
        id: i64,
        month: u32,
        year: i32,
        generated: DateTime<Utc>,
    ) -> DbResult<Payslip> {
        let row = self.get_employee(id)?;
        let text = |field: &str| text_field(&row, field).map(str::to_string);
        let money = |field: &str| Money::from_rupees(number_field(&row, field));

        let employee = EmployeeRef {
            id,
            code: text("employee_id").unwrap_or_default(),
            name: text("name").unwrap_or_default(),
            designation: text("designation"),
            department: text("department"),
        };
        let salary = SalaryStructure {
            basic: money("basic_salary"),
            hra: money("hra"),
            transport: money("transport"),
            medical: money("medical"),
            special: money("special"),
            pf_rate: Rate::from_percentage(number_field(&row, "pf_rate")),
            esi_rate: Rate::from_percentage(number_field(&row, "esi_rate")),
        };
        let leave = payroll::leave_balance(
            number_field(&row, "total_leaves") as i64,
            number_field(&row, "leaves_taken") as i64,
        );

        Ok(payroll::payslip(employee, salary, leave, month, year, generated))
    }
}
