//! Income/Expense inputs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;
use crate::types::TransactionKind;
use crate::validation::{
    none_if_blank, parse_one_of, require_text, text_or, validate_email, validate_non_negative,
    RequiredFields, Validate, ValidationResult,
};

/// Body of `POST/PUT /api/income-expense/transactions`.
///
/// `tags` arrives as any JSON value (usually an array of strings) and is
/// stored as its JSON text, the way the frontend reads it back.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionInput {
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub mode: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub member_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub tags: Option<Value>,
}

impl Validate for TransactionInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("type", &self.kind)
            .text("description", &self.description)
            .value("amount", &self.amount)
            .text("date", &self.date)
            .text("category", &self.category)
            .check()?;

        let amount = validate_non_negative("Amount", self.amount.unwrap_or_default())?;
        let kind: TransactionKind = parse_one_of(self.kind.as_deref().unwrap_or_default())?;

        let tags = match self.tags {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(Value::String(s)) => Some(Value::String(s)),
            Some(other) => Some(Value::String(other.to_string())),
        };

        Ok(Self {
            kind: Some(kind.as_str().to_string()),
            description: self.description.map(|d| d.trim().to_string()),
            amount: Some(amount),
            notes: Some(self.notes.unwrap_or_default()),
            mode: text_or(self.mode, "individual"),
            payment_method: text_or(self.payment_method, "cash"),
            tags,
            ..self
        })
    }
}

/// Body of `POST /api/income-expense/categories/{income,expense}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub icon: Option<String>,
}

impl Validate for CategoryInput {
    fn validated(self) -> ValidationResult<Self> {
        let name = require_text(self.name.as_deref(), "Category name")?;
        Ok(Self {
            name: Some(name),
            icon: none_if_blank(self.icon),
        })
    }
}

/// Body of `POST /api/income-expense/budgets`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BudgetInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub period: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub mode: Option<String>,
}

impl Validate for BudgetInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("category", &self.category)
            .value("amount", &self.amount)
            .text("period", &self.period)
            .check()?;
        let amount = validate_non_negative("Amount", self.amount.unwrap_or_default())?;
        Ok(Self {
            amount: Some(amount),
            mode: text_or(self.mode, "individual"),
            ..self
        })
    }
}

/// Body of `POST /api/income-expense/recurring`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecurringInput {
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub frequency: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub mode: Option<String>,
}

impl Validate for RecurringInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("type", &self.kind)
            .text("description", &self.description)
            .value("amount", &self.amount)
            .text("category", &self.category)
            .text("frequency", &self.frequency)
            .text("start_date", &self.start_date)
            .check()?;
        let amount = validate_non_negative("Amount", self.amount.unwrap_or_default())?;
        let kind: TransactionKind = parse_one_of(self.kind.as_deref().unwrap_or_default())?;
        Ok(Self {
            kind: Some(kind.as_str().to_string()),
            amount: Some(amount),
            end_date: none_if_blank(self.end_date),
            notes: Some(self.notes.unwrap_or_default()),
            mode: text_or(self.mode, "individual"),
            ..self
        })
    }
}

/// Body of `POST /api/income-expense/family-members`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FamilyMemberInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub role: Option<String>,
}

impl Validate for FamilyMemberInput {
    fn validated(self) -> ValidationResult<Self> {
        let name = require_text(self.name.as_deref(), "Name")?;
        validate_email(self.email.as_deref())?;
        Ok(Self {
            name: Some(name),
            email: Some(self.email.unwrap_or_default()),
            role: text_or(self.role, "member"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transaction(v: Value) -> ValidationResult<TransactionInput> {
        serde_json::from_value::<TransactionInput>(v).unwrap().validated()
    }

    #[test]
    fn test_transaction_requires_all_core_fields() {
        let err = transaction(json!({ "type": "income", "amount": 10 })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: description, date, category"
        );
    }

    #[test]
    fn test_transaction_amount_must_be_number() {
        let err = transaction(json!({
            "type": "expense", "description": "Tea", "amount": "abc",
            "date": "2024-03-01", "category": "Food"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "Amount must be a positive number");
    }

    #[test]
    fn test_transaction_zero_amount_is_allowed() {
        let t = transaction(json!({
            "type": "expense", "description": "  Tea ", "amount": 0,
            "date": "2024-03-01", "category": "Food"
        }))
        .unwrap();
        assert_eq!(t.amount, Some(0.0));
        assert_eq!(t.description.as_deref(), Some("Tea"));
        assert_eq!(t.mode.as_deref(), Some("individual"));
        assert_eq!(t.payment_method.as_deref(), Some("cash"));
        assert_eq!(t.notes.as_deref(), Some(""));
    }

    #[test]
    fn test_transaction_tags_stored_as_json_text() {
        let t = transaction(json!({
            "type": "income", "description": "Pay", "amount": 100,
            "date": "2024-03-01", "category": "Salary", "tags": ["work", "march"]
        }))
        .unwrap();
        assert_eq!(t.tags, Some(Value::String("[\"work\",\"march\"]".to_string())));
    }

    #[test]
    fn test_transaction_kind_vocabulary() {
        let err = transaction(json!({
            "type": "transfer", "description": "x", "amount": 1,
            "date": "2024-03-01", "category": "Other"
        }))
        .unwrap_err();
        assert_eq!(err.to_string(), "type must be one of: income, expense");
    }

    #[test]
    fn test_family_member_email_checked() {
        let input: FamilyMemberInput =
            serde_json::from_value(json!({ "name": "Asha", "email": "asha" })).unwrap();
        assert_eq!(input.validated().unwrap_err().to_string(), "Invalid email format");
    }

    #[test]
    fn test_budget_defaults_mode() {
        let input: BudgetInput = serde_json::from_value(
            json!({ "category": "Food", "amount": "5000", "period": "monthly" }),
        )
        .unwrap();
        let budget = input.validated().unwrap();
        assert_eq!(budget.mode.as_deref(), Some("individual"));
        assert_eq!(budget.amount, Some(5000.0));
    }
}
