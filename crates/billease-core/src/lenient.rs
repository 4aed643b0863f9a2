//! Lenient field deserializers.
//!
//! The web forms post whatever the input element holds: `"12"` for a
//! number field, `""` for an untouched optional field, `1234` for a
//! pincode. These helpers accept those shapes so the inputs can keep
//! precise Rust types.
//!
//! ```text
//!  JSON               opt_f64       opt_i64       opt_string    opt_bool
//!  ──────────────     ──────────    ──────────    ──────────    ────────
//!  missing / null     None          None          None          None
//!  ""                 None          None          Some("")      Some(false)
//!  12 / "12"          Some(12.0)    Some(12)      Some("12")    Some(true)
//!  4.9 / "4.9"        Some(4.9)     Some(4)       Some("4.9")   Some(true)
//!  "abc"              Some(NaN)     error         Some("abc")   Some(true)
//! ```
//!
//! `opt_i64` truncates fractions toward zero (`4.9` and `"4.9"` both read
//! as `4`), the way the forms' `parseInt` does. Values beyond the `i64`
//! range saturate and are then refused by `validate_quantity`.
//!
//! `opt_f64` keeps unparseable text as NaN so validation can answer with
//! the field's own message (`Amount must be a positive number`) instead
//! of a generic deserialization error.

use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                None
            } else {
                Some(s.parse::<f64>().unwrap_or(f64::NAN))
            }
        }
        Some(_) => Some(f64::NAN),
    })
}

pub fn opt_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("invalid integer: {n}"))),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Ok(None);
            }
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid integer: {s:?}")))
        }
        Some(other) => Err(D::Error::custom(format!("expected an integer, got {other}"))),
    }
}

pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!("expected a string, got {other}"))),
    }
}

pub fn opt_bool<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::Bool(b)) => Some(b),
        Some(Value::Number(n)) => Some(n.as_f64().is_some_and(|f| f != 0.0)),
        Some(Value::String(s)) => {
            let s = s.trim();
            Some(!(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false")))
        }
        Some(_) => Some(true),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "opt_f64")]
        amount: Option<f64>,
        #[serde(default, deserialize_with = "opt_i64")]
        quantity: Option<i64>,
        #[serde(default, deserialize_with = "opt_string")]
        pincode: Option<String>,
        #[serde(default, deserialize_with = "opt_bool")]
        recurring: Option<bool>,
    }

    fn form(v: serde_json::Value) -> Form {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_missing_and_null_are_none() {
        let p = form(json!({ "amount": null }));
        assert!(p.amount.is_none());
        assert!(p.quantity.is_none());
        assert!(p.pincode.is_none());
        assert!(p.recurring.is_none());
    }

    #[test]
    fn test_numeric_strings_are_accepted() {
        let p = form(json!({ "amount": "10.5", "quantity": "12", "pincode": 560001 }));
        assert_eq!(p.amount, Some(10.5));
        assert_eq!(p.quantity, Some(12));
        assert_eq!(p.pincode.as_deref(), Some("560001"));
    }

    #[test]
    fn test_unparseable_amount_is_nan() {
        let p = form(json!({ "amount": "abc" }));
        assert!(p.amount.unwrap().is_nan());
    }

    #[test]
    fn test_fractional_quantity_truncates() {
        let p = form(json!({ "quantity": 4.9 }));
        assert_eq!(p.quantity, Some(4));
        let p = form(json!({ "quantity": "-4.9" }));
        assert_eq!(p.quantity, Some(-4));
    }

    #[test]
    fn test_huge_values_do_not_fail_deserialization() {
        let p = form(json!({ "amount": "inf", "quantity": 1e30 }));
        assert_eq!(p.amount, Some(f64::INFINITY));
        assert_eq!(p.quantity, Some(i64::MAX));
    }

    #[test]
    fn test_bad_integer_is_an_error() {
        let res: Result<Form, _> = serde_json::from_value(json!({ "quantity": "lots" }));
        assert!(res.is_err());
    }

    #[test]
    fn test_truthiness() {
        assert_eq!(form(json!({ "recurring": 1 })).recurring, Some(true));
        assert_eq!(form(json!({ "recurring": "false" })).recurring, Some(false));
        assert_eq!(form(json!({ "recurring": "" })).recurring, Some(false));
    }
}
