//! POS inputs: products, entities, sales, payments, quotations.
//!
//! ## Document Shape
//! ```text
//! SaleInput ──────────────► pos_sales row
//!   └── items: [LineItemInput] ──► pos_sale_items rows (sale_id = new id)
//!
//! QuotationInput ─────────► pos_quotations row
//!   └── items: [LineItemInput] ──► pos_quotation_items rows
//! ```
//! `items` is never serialized into the header row.

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::money::Money;
use crate::validation::{
    none_if_blank, text_or, validate_email, validate_non_negative, validate_quantity,
    RequiredFields, Validate, ValidationResult,
};

/// Body of `POST/PUT /api/pos/products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub barcode: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
}

impl Validate for ProductInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("name", &self.name)
            .value("price", &self.price)
            .check()?;
        Ok(Self {
            name: self.name.map(|n| n.trim().to_string()),
            price: Some(validate_non_negative("Price", self.price.unwrap_or_default())?),
            stock: Some(self.stock.unwrap_or(0)),
            ..self
        })
    }
}

/// Body of `POST/PUT /api/pos/entities` (customers and suppliers).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityInput {
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
    pub gstin: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub contact: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
}

impl Validate for EntityInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("name", &self.name)
            .text("type", &self.kind)
            .check()?;
        validate_email(self.email.as_deref())?;
        Ok(Self {
            name: self.name.map(|n| n.trim().to_string()),
            ..self
        })
    }
}

/// One line of a sale or quotation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItemInput {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub product_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub discount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub tax: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total: Option<f64>,
}

impl LineItemInput {
    /// `price × quantity − discount + tax`, computed in paise.
    pub fn computed_total(&self) -> f64 {
        let gross = Money::from_rupees(self.price.unwrap_or_default())
            * self.quantity.unwrap_or_default();
        (gross - Money::from_rupees(self.discount.unwrap_or_default())
            + Money::from_rupees(self.tax.unwrap_or_default()))
        .to_rupees()
    }
}

impl Validate for LineItemInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("product_name", &self.product_name)
            .value("quantity", &self.quantity)
            .value("price", &self.price)
            .check()?;
        validate_quantity("Quantity", self.quantity.unwrap_or_default())?;
        validate_non_negative("Price", self.price.unwrap_or_default())?;
        let total = match self.total {
            Some(t) => validate_non_negative("Total", t)?,
            None => self.computed_total(),
        };
        Ok(Self {
            discount: Some(validate_non_negative("Discount", self.discount.unwrap_or(0.0))?),
            tax: Some(validate_non_negative("Tax", self.tax.unwrap_or(0.0))?),
            total: Some(total),
            ..self
        })
    }
}

fn validate_lines(items: Vec<LineItemInput>) -> ValidationResult<Vec<LineItemInput>> {
    items.into_iter().map(Validate::validated).collect()
}

/// Body of `POST /api/pos/sales`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SaleInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub invoice_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub entity_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub entity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub invoice_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub paid: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub balance: Option<f64>,
    #[serde(default, skip_serializing)]
    pub items: Vec<LineItemInput>,
}

impl Validate for SaleInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("invoice_no", &self.invoice_no)
            .text("date", &self.date)
            .value("total", &self.total)
            .check()?;
        let total = validate_non_negative("Total", self.total.unwrap_or_default())?;
        let paid = validate_non_negative("Paid", self.paid.unwrap_or(0.0))?;
        let balance = self
            .balance
            .unwrap_or_else(|| (Money::from_rupees(total) - Money::from_rupees(paid)).to_rupees());
        Ok(Self {
            total: Some(total),
            paid: Some(paid),
            balance: Some(balance),
            items: validate_lines(self.items)?,
            ..self
        })
    }
}

/// Body of `POST /api/pos/payments`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub receipt_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub entity_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub entity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub amount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub payment_mode: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub reference: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
}

impl Validate for PaymentInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("receipt_no", &self.receipt_no)
            .text("date", &self.date)
            .value("amount", &self.amount)
            .check()?;
        Ok(Self {
            amount: Some(validate_non_negative("Amount", self.amount.unwrap_or_default())?),
            reference: none_if_blank(self.reference),
            notes: none_if_blank(self.notes),
            ..self
        })
    }
}

/// Body of `POST /api/pos/quotations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuotationInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub quote_no: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub entity_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub entity_type: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub valid_until: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    #[serde(default, skip_serializing)]
    pub items: Vec<LineItemInput>,
}

impl Validate for QuotationInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("quote_no", &self.quote_no)
            .text("date", &self.date)
            .value("total", &self.total)
            .check()?;
        Ok(Self {
            total: Some(validate_non_negative("Total", self.total.unwrap_or_default())?),
            status: text_or(self.status, "Pending"),
            valid_until: none_if_blank(self.valid_until),
            items: validate_lines(self.items)?,
            ..self
        })
    }
}
