//! Accounts+ inputs: company profile, chart of accounts, parties,
//! items master, income/expense heads and employees.
//!
//! Uniqueness of `items_master.code` and `employees.employee_id` needs
//! the table contents and is checked by the repository.

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::types::{LedgerType, PartyType};
use crate::validation::{
    none_if_blank, parse_one_of, require_text, text_or, validate_email, validate_non_negative,
    validate_quantity, RequiredFields, Validate, ValidationResult,
};

/// Body of `POST/PUT /api/accounts-plus/companies`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub gstin: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pan: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub business_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub opening_period: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub accounting_year: Option<String>,
}

impl Validate for CompanyInput {
    fn validated(self) -> ValidationResult<Self> {
        let name = require_text(self.name.as_deref(), "Name")?;
        validate_email(self.email.as_deref())?;
        Ok(Self {
            name: Some(name),
            ..self
        })
    }
}

/// Body of `POST/PUT /api/accounts-plus/ledgers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub opening_balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub parent_group: Option<String>,
}

impl Validate for LedgerInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("name", &self.name)
            .text("type", &self.kind)
            .check()?;
        let kind: LedgerType = parse_one_of(self.kind.as_deref().unwrap_or_default())?;
        let opening = self.opening_balance.unwrap_or(0.0);
        Ok(Self {
            name: self.name.map(|n| n.trim().to_string()),
            kind: Some(kind.as_str().to_string()),
            // Ledger balances may be negative (credit balances).
            opening_balance: Some(if opening.is_nan() { 0.0 } else { opening }),
            parent_group: none_if_blank(self.parent_group),
        })
    }
}

/// Body of `POST/PUT /api/accounts-plus/parties`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pincode: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub gstin: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub pan: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub credit_limit: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub opening_balance: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub classification: Option<String>,
}

impl Validate for PartyInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("name", &self.name)
            .text("type", &self.kind)
            .check()?;
        let kind: PartyType = parse_one_of(self.kind.as_deref().unwrap_or_default())?;
        validate_email(self.email.as_deref())?;
        let opening = self.opening_balance.unwrap_or(0.0);
        Ok(Self {
            name: self.name.map(|n| n.trim().to_string()),
            kind: Some(kind.as_str().to_string()),
            credit_limit: Some(validate_non_negative(
                "Credit limit",
                self.credit_limit.unwrap_or(0.0),
            )?),
            opening_balance: Some(if opening.is_nan() { 0.0 } else { opening }),
            ..self
        })
    }
}

/// Body of `POST/PUT /api/accounts-plus/items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemMasterInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub code: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub hsn: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sac: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub uom: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub cost_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub reorder_level: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub brand: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub group_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub opening_stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub opening_value: Option<f64>,
}

impl Validate for ItemMasterInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("code", &self.code)
            .text("name", &self.name)
            .check()?;
        Ok(Self {
            code: self.code.map(|c| c.trim().to_string()),
            name: self.name.map(|n| n.trim().to_string()),
            uom: text_or(self.uom, "PCS"),
            rate: Some(validate_non_negative("Rate", self.rate.unwrap_or(0.0))?),
            cost_price: Some(validate_non_negative(
                "Cost price",
                self.cost_price.unwrap_or(0.0),
            )?),
            reorder_level: Some(validate_quantity(
                "Reorder level",
                self.reorder_level.unwrap_or(0),
            )?),
            opening_stock: Some(validate_quantity(
                "Opening stock",
                self.opening_stock.unwrap_or(0),
            )?),
            opening_value: Some(validate_non_negative(
                "Opening value",
                self.opening_value.unwrap_or(0.0),
            )?),
            ..self
        })
    }
}

/// Body of `POST /api/accounts-plus/{expense,income}-heads`.
///
/// `recurring` accepts any truthy value and is stored as `1`/`0`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeadInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub ledger: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_bool", serialize_with = "bool_as_flag")]
    pub recurring: Option<bool>,
}

fn bool_as_flag<S: serde::Serializer>(value: &Option<bool>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_i64(i64::from(value.unwrap_or(false)))
}

impl HeadInput {
    /// Fills `type` with the head's side (`Expense` or `Income`).
    pub fn with_default_kind(self, kind: &str) -> Self {
        Self {
            kind: text_or(self.kind, kind),
            ..self
        }
    }
}

impl Validate for HeadInput {
    fn validated(self) -> ValidationResult<Self> {
        let name = require_text(self.name.as_deref(), "Name")?;
        Ok(Self {
            name: Some(name),
            recurring: Some(self.recurring.unwrap_or(false)),
            ..self
        })
    }
}

/// Body of `POST/PUT /api/accounts-plus/employees`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub employee_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub designation: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub basic_salary: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub hra: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub transport: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub medical: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub special: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub pf_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub esi_rate: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub total_leaves: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub leaves_taken: Option<i64>,
}

impl Validate for EmployeeInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("name", &self.name)
            .text("employee_id", &self.employee_id)
            .check()?;
        let money = |label: &str, v: Option<f64>, default: f64| {
            validate_non_negative(label, v.unwrap_or(default)).map(Some)
        };
        Ok(Self {
            name: self.name.map(|n| n.trim().to_string()),
            employee_id: self.employee_id.map(|e| e.trim().to_string()),
            department: self.department,
            designation: self.designation,
            basic_salary: money("Basic salary", self.basic_salary, 0.0)?,
            hra: money("HRA", self.hra, 0.0)?,
            transport: money("Transport", self.transport, 0.0)?,
            medical: money("Medical", self.medical, 0.0)?,
            special: money("Special allowance", self.special, 0.0)?,
            pf_rate: money("PF rate", self.pf_rate, 12.0)?,
            esi_rate: money("ESI rate", self.esi_rate, 0.75)?,
            total_leaves: Some(validate_quantity("Total leaves", self.total_leaves.unwrap_or(12))?),
            leaves_taken: Some(validate_quantity("Leaves taken", self.leaves_taken.unwrap_or(0))?),
        })
    }
}
