//! CRM inputs: customers, leads, activities, communications.

use serde::{Deserialize, Serialize};

use crate::lenient;
use crate::validation::{
    require_text, text_or, validate_email, validate_non_negative, RequiredFields, Validate,
    ValidationResult,
};

/// Body of `POST/PUT /api/crm/customers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
}

impl Validate for CustomerInput {
    fn validated(self) -> ValidationResult<Self> {
        let name = require_text(self.name.as_deref(), "Name")?;
        validate_email(self.email.as_deref())?;
        Ok(Self {
            name: Some(name),
            email: Some(self.email.unwrap_or_default()),
            phone: Some(self.phone.unwrap_or_default()),
            address: Some(self.address.unwrap_or_default()),
            status: text_or(self.status, "Active"),
            company: Some(self.company.unwrap_or_default()),
            notes: Some(self.notes.unwrap_or_default()),
        })
    }
}

/// Body of `POST/PUT /api/crm/leads`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LeadInput {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub source: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub value: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub assigned_to: Option<String>,
}

impl Validate for LeadInput {
    fn validated(self) -> ValidationResult<Self> {
        let name = require_text(self.name.as_deref(), "Name")?;
        validate_email(self.email.as_deref())?;
        Ok(Self {
            name: Some(name),
            email: Some(self.email.unwrap_or_default()),
            phone: Some(self.phone.unwrap_or_default()),
            company: Some(self.company.unwrap_or_default()),
            source: Some(self.source.unwrap_or_default()),
            status: text_or(self.status, "New"),
            value: Some(validate_non_negative("Value", self.value.unwrap_or(0.0))?),
            notes: Some(self.notes.unwrap_or_default()),
            assigned_to: Some(self.assigned_to.unwrap_or_default()),
        })
    }
}

/// Body of `POST/PUT /api/crm/activities`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActivityInput {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub customer_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub lead_id: Option<i64>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub status: Option<String>,
}

impl Validate for ActivityInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("type", &self.kind)
            .text("title", &self.title)
            .text("date", &self.date)
            .check()?;
        Ok(Self {
            customer_id: self.customer_id.filter(|id| *id != 0),
            lead_id: self.lead_id.filter(|id| *id != 0),
            description: Some(self.description.unwrap_or_default()),
            time: Some(self.time.unwrap_or_default()),
            status: text_or(self.status, "Pending"),
            ..self
        })
    }
}

/// Body of `POST /api/crm/communications`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CommunicationInput {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub customer_id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub lead_id: Option<i64>,
    #[serde(rename = "type", default, deserialize_with = "lenient::opt_string")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub subject: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
}

impl Validate for CommunicationInput {
    fn validated(self) -> ValidationResult<Self> {
        RequiredFields::new()
            .text("type", &self.kind)
            .text("content", &self.content)
            .text("date", &self.date)
            .check()?;
        Ok(Self {
            customer_id: self.customer_id.filter(|id| *id != 0),
            lead_id: self.lead_id.filter(|id| *id != 0),
            subject: Some(self.subject.unwrap_or_default()),
            ..self
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_customer_defaults_and_trim() {
        let c: CustomerInput = serde_json::from_value(json!({ "name": "  Acme  " })).unwrap();
        let c = c.validated().unwrap();
        assert_eq!(c.name.as_deref(), Some("Acme"));
        assert_eq!(c.status.as_deref(), Some("Active"));
        assert_eq!(c.email.as_deref(), Some(""));
        assert_eq!(c.company.as_deref(), Some(""));
    }

    #[test]
    fn test_customer_blank_name_rejected() {
        let c: CustomerInput = serde_json::from_value(json!({ "name": "   " })).unwrap();
        assert_eq!(c.validated().unwrap_err().to_string(), "Name is required");
    }

    #[test]
    fn test_customer_email_format() {
        let c: CustomerInput =
            serde_json::from_value(json!({ "name": "Acme", "email": "acme@local" })).unwrap();
        assert_eq!(c.validated().unwrap_err().to_string(), "Invalid email format");
    }

    #[test]
    fn test_lead_defaults() {
        let l: LeadInput = serde_json::from_value(json!({ "name": "Globex" })).unwrap();
        let l = l.validated().unwrap();
        assert_eq!(l.status.as_deref(), Some("New"));
        assert_eq!(l.value, Some(0.0));
    }

    #[test]
    fn test_activity_required_fields() {
        let a: ActivityInput = serde_json::from_value(json!({ "title": "Call back" })).unwrap();
        assert_eq!(
            a.validated().unwrap_err().to_string(),
            "Missing required fields: type, date"
        );
    }
}
