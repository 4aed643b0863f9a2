//! Invento (inventory) inputs: warehouses, items, stock movements.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lenient;
use crate::types::StockMovement;
use crate::validation::{
    none_if_blank, require_text, text_or, validate_non_negative, validate_quantity, RequiredFields,
    Validate, ValidationResult,
};

/// Body of `POST /api/invento/warehouses`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehouseInput {
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
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub capacity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub manager: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
}

impl Validate for WarehouseInput {
    fn validated(self) -> ValidationResult<Self> {
        let name = require_text(self.name.as_deref(), "Warehouse name")?;
        Ok(Self {
            name: Some(name),
            address: none_if_blank(self.address),
            city: none_if_blank(self.city),
            state: none_if_blank(self.state),
            pincode: none_if_blank(self.pincode),
            capacity: Some(validate_quantity("Capacity", self.capacity.unwrap_or(0))?),
            manager: none_if_blank(self.manager),
            phone: none_if_blank(self.phone),
        })
    }
}

/// Body of `POST/PUT /api/invento/items`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub unit: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub min_stock: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub hsn_code: Option<String>,
}

impl Validate for ItemInput {
    fn validated(self) -> ValidationResult<Self> {
        let name = require_text(self.name.as_deref(), "Item name")?;
        Ok(Self {
            name: Some(name),
            sku: none_if_blank(self.sku),
            quantity: Some(validate_quantity("Quantity", self.quantity.unwrap_or(0))?),
            unit: text_or(self.unit, "pcs"),
            location: none_if_blank(self.location),
            min_stock: Some(validate_quantity("Minimum stock", self.min_stock.unwrap_or(0))?),
            cost: Some(validate_non_negative("Cost", self.cost.unwrap_or(0.0))?),
            category: none_if_blank(self.category),
            description: none_if_blank(self.description),
            hsn_code: none_if_blank(self.hsn_code),
        })
    }
}

/// Body of `POST /api/invento/transactions`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockMovementInput {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub item_id: Option<i64>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub quantity: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub reference: Option<String>,
}

impl StockMovementInput {
    /// Validates the movement and returns its direction.
    ///
    /// A zero quantity counts as missing, matching how the forms treat
    /// an untouched quantity box.
    pub fn check(&self) -> Result<StockMovement, CoreError> {
        RequiredFields::new()
            .short_form()
            .non_zero("item_id", &self.item_id)
            .text("type", &self.kind)
            .non_zero("quantity", &self.quantity)
            .text("date", &self.date)
            .check()?;

        let movement: StockMovement = self.kind.as_deref().unwrap_or_default().parse()?;
        if let Some(q) = self.quantity {
            validate_quantity("Quantity", q)?;
        }
        Ok(movement)
    }

    pub fn item_id(&self) -> i64 {
        self.item_id.unwrap_or_default()
    }

    pub fn quantity(&self) -> i64 {
        self.quantity.unwrap_or_default()
    }

    /// Blank optional text stored as `null`. Call after [`check`](Self::check).
    pub fn normalized(self) -> Self {
        Self {
            location: none_if_blank(self.location),
            notes: none_if_blank(self.notes),
            reference: none_if_blank(self.reference),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_item_defaults() {
        let item: ItemInput = serde_json::from_value(json!({ "name": "Widget" })).unwrap();
        let item = item.validated().unwrap();
        assert_eq!(item.unit.as_deref(), Some("pcs"));
        assert_eq!(item.quantity, Some(0));
        assert_eq!(item.min_stock, Some(0));
        assert_eq!(item.cost, Some(0.0));
        assert_eq!(item.sku, None);
    }

    #[test]
    fn test_item_requires_name() {
        let err = ItemInput::default().validated().unwrap_err();
        assert_eq!(err.to_string(), "Item name is required");
    }

    #[test]
    fn test_warehouse_requires_name() {
        let input: WarehouseInput = serde_json::from_value(json!({ "city": "Pune" })).unwrap();
        assert_eq!(
            input.validated().unwrap_err().to_string(),
            "Warehouse name is required"
        );
    }

    #[test]
    fn test_movement_missing_fields_short_message() {
        let input: StockMovementInput =
            serde_json::from_value(json!({ "item_id": 1, "type": "in" })).unwrap();
        assert_eq!(input.check().unwrap_err().to_string(), "Missing required fields");
    }

    #[test]
    fn test_movement_type_checked() {
        let input: StockMovementInput = serde_json::from_value(
            json!({ "item_id": 1, "type": "sideways", "quantity": 2, "date": "2024-01-01" }),
        )
        .unwrap();
        assert_eq!(
            input.check().unwrap_err().to_string(),
            "Type must be \"in\" or \"out\""
        );
    }

    #[test]
    fn test_movement_serializes_type_column() {
        let input: StockMovementInput = serde_json::from_value(
            json!({ "item_id": "1", "type": "out", "quantity": "3", "date": "2024-01-01" }),
        )
        .unwrap();
        assert_eq!(input.check().unwrap(), StockMovement::Out);
        let row = serde_json::to_value(input.normalized()).unwrap();
        assert_eq!(row["type"], "out");
        assert_eq!(row["item_id"], 1);
        assert_eq!(row["quantity"], 3);
    }
}
