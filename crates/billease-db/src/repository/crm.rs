//! # CRM Repository
//!
//! Customers, leads, activities, communications and the dashboard
//! analytics.

use std::sync::Arc;

use billease_core::models::{ActivityInput, CommunicationInput, CustomerInput, LeadInput};
use billease_core::{CrmAnalytics, Money};

use super::{filters, Stamps, TableSpec};
use crate::error::DbResult;
use crate::row::{desc_by, newest_first, number_field, text_field, to_row, Row};
use crate::store::Store;

const CUSTOMERS: TableSpec = TableSpec::new("crm_customers", "Customer", Stamps::CreatedUpdated);
const LEADS: TableSpec = TableSpec::new("crm_leads", "Lead", Stamps::CreatedUpdated);
const ACTIVITIES: TableSpec = TableSpec::new("crm_activities", "Activity", Stamps::Created);
const COMMUNICATIONS: TableSpec =
    TableSpec::new("crm_communications", "Communication", Stamps::Created);

/// Optional `customer_id` / `lead_id` filters of the activity and
/// communication lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactFilter<'a> {
    pub customer_id: Option<&'a str>,
    pub lead_id: Option<&'a str>,
}

impl ContactFilter<'_> {
    fn pairs(&self) -> Vec<(&'static str, serde_json::Value)> {
        filters(&[("customer_id", self.customer_id), ("lead_id", self.lead_id)])
    }
}

/// Repository for CRM tables.
#[derive(Debug, Clone)]
pub struct CrmRepository {
    store: Arc<Store>,
}

impl CrmRepository {
    /// Creates a new CrmRepository.
    pub fn new(store: Arc<Store>) -> Self {
        CrmRepository { store }
    }

    // =========================================================================
    // Customers
    // =========================================================================

    pub fn list_customers(&self) -> DbResult<Vec<Row>> {
        CUSTOMERS.list(&self.store, &[], newest_first)
    }

    pub fn get_customer(&self, id: i64) -> DbResult<Row> {
        CUSTOMERS.get(&self.store, id)
    }

    pub fn create_customer(&self, input: &CustomerInput) -> DbResult<Row> {
        CUSTOMERS.insert(&self.store, input)
    }

    pub fn update_customer(&self, id: i64, input: &CustomerInput) -> DbResult<Row> {
        CUSTOMERS.update(&self.store, id, input)
    }

    pub fn delete_customer(&self, id: i64) -> DbResult<bool> {
        CUSTOMERS.delete(&self.store, id)
    }

    // =========================================================================
    // Leads
    // =========================================================================

    pub fn list_leads(&self, status: Option<&str>) -> DbResult<Vec<Row>> {
        LEADS.list(&self.store, &filters(&[("status", status)]), newest_first)
    }

    pub fn get_lead(&self, id: i64) -> DbResult<Row> {
        LEADS.get(&self.store, id)
    }

    pub fn create_lead(&self, input: &LeadInput) -> DbResult<Row> {
        LEADS.insert(&self.store, input)
    }

    pub fn update_lead(&self, id: i64, input: &LeadInput) -> DbResult<Row> {
        LEADS.update(&self.store, id, input)
    }

    pub fn delete_lead(&self, id: i64) -> DbResult<bool> {
        LEADS.delete(&self.store, id)
    }

    // =========================================================================
    // Activities
    // =========================================================================

    /// Activities, latest date and time first.
    pub fn list_activities(&self, filter: ContactFilter<'_>) -> DbResult<Vec<Row>> {
        ACTIVITIES.list(&self.store, &filter.pairs(), |a, b| desc_by(a, b, "date", "time"))
    }

    pub fn create_activity(&self, input: &ActivityInput) -> DbResult<Row> {
        ACTIVITIES.insert(&self.store, input)
    }

    /// Updates an activity; the linked customer and lead stay as created.
    pub fn update_activity(&self, id: i64, input: &ActivityInput) -> DbResult<Row> {
        let mut changes = to_row(input)?;
        changes.remove("customer_id");
        changes.remove("lead_id");
        ACTIVITIES.update_row(&self.store, id, changes)
    }

    pub fn delete_activity(&self, id: i64) -> DbResult<bool> {
        ACTIVITIES.delete(&self.store, id)
    }

    // =========================================================================
    // Communications
    // =========================================================================

    /// Communications, latest date first.
    pub fn list_communications(&self, filter: ContactFilter<'_>) -> DbResult<Vec<Row>> {
        COMMUNICATIONS.list(&self.store, &filter.pairs(), |a, b| {
            desc_by(a, b, "date", "created_at")
        })
    }

    pub fn create_communication(&self, input: &CommunicationInput) -> DbResult<Row> {
        COMMUNICATIONS.insert(&self.store, input)
    }

    pub fn delete_communication(&self, id: i64) -> DbResult<bool> {
        COMMUNICATIONS.delete(&self.store, id)
    }

    // =========================================================================
    // Analytics
    // =========================================================================

    /// Dashboard counters, computed from one consistent snapshot.
    pub fn analytics(&self) -> DbResult<CrmAnalytics> {
        self.store.read(|tables| {
            let with_status = |rows: &[Row], status: &str| {
                rows.iter()
                    .filter(|r| text_field(r, "status") == Some(status))
                    .count() as u64
            };
            let customers = tables.table(CUSTOMERS.name)?.rows();
            let leads = tables.table(LEADS.name)?.rows();
            let activities = tables.table(ACTIVITIES.name)?.rows();

            let total_value: Money = leads
                .iter()
                .map(|r| Money::from_rupees(number_field(r, "value")))
                .sum();

            Ok(CrmAnalytics {
                total_customers: customers.len() as u64,
                active_customers: with_status(customers, "Active"),
                total_leads: leads.len() as u64,
                converted_leads: with_status(leads, "Converted"),
                total_value: total_value.to_rupees(),
                pending_activities: with_status(activities, "Pending"),
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use crate::Database;
    use billease_core::Validate;
    use serde_json::{json, Value};

    fn repo() -> CrmRepository {
        Database::in_memory().unwrap().crm()
    }

    fn customer(v: Value) -> CustomerInput {
        serde_json::from_value::<CustomerInput>(v).unwrap().validated().unwrap()
    }

    fn lead(v: Value) -> LeadInput {
        serde_json::from_value::<LeadInput>(v).unwrap().validated().unwrap()
    }

    fn activity(v: Value) -> ActivityInput {
        serde_json::from_value::<ActivityInput>(v).unwrap().validated().unwrap()
    }

    #[test]
    fn test_customer_lifecycle() {
        let repo = repo();
        let row = repo.create_customer(&customer(json!({ "name": "Acme" }))).unwrap();
        assert_eq!(row["id"], 1);
        assert_eq!(row["status"], "Active");
        assert_eq!(repo.list_customers().unwrap().len(), 1);

        let updated = repo
            .update_customer(1, &customer(json!({ "name": "Acme Ltd", "status": "Inactive" })))
            .unwrap();
        assert_eq!(updated["name"], "Acme Ltd");
        assert_eq!(updated["created_at"], row["created_at"]);

        assert!(repo.delete_customer(1).unwrap());
        let err = repo.get_customer(1).unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
        assert_eq!(err.to_string(), "Customer not found");
    }

    #[test]
    fn test_customers_newest_first() {
        let repo = repo();
        repo.create_customer(&customer(json!({ "name": "First" }))).unwrap();
        repo.create_customer(&customer(json!({ "name": "Second" }))).unwrap();
        let rows = repo.list_customers().unwrap();
        assert_eq!(rows[0]["name"], "Second");
    }

    #[test]
    fn test_activities_filter_and_order() {
        let repo = repo();
        repo.create_activity(&activity(json!({
            "customer_id": 1, "type": "call", "title": "Intro", "date": "2024-03-01", "time": "09:00"
        })))
        .unwrap();
        repo.create_activity(&activity(json!({
            "customer_id": 1, "type": "call", "title": "Follow-up", "date": "2024-03-01", "time": "15:30"
        })))
        .unwrap();
        repo.create_activity(&activity(json!({
            "lead_id": 4, "type": "email", "title": "Quote", "date": "2024-03-05"
        })))
        .unwrap();

        let for_customer = repo
            .list_activities(ContactFilter {
                customer_id: Some("1"),
                lead_id: None,
            })
            .unwrap();
        let titles: Vec<_> = for_customer.iter().map(|r| r["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["Follow-up", "Intro"]);

        let all = repo.list_activities(ContactFilter::default()).unwrap();
        assert_eq!(all[0]["title"], "Quote");
    }

    #[test]
    fn test_activity_update_keeps_links() {
        let repo = repo();
        repo.create_activity(&activity(json!({
            "customer_id": 3, "type": "call", "title": "Intro", "date": "2024-03-01"
        })))
        .unwrap();
        let updated = repo
            .update_activity(
                1,
                &activity(json!({ "type": "call", "title": "Done", "date": "2024-03-01", "status": "Completed" })),
            )
            .unwrap();
        assert_eq!(updated["customer_id"], 3);
        assert_eq!(updated["status"], "Completed");
    }

    #[test]
    fn test_analytics_counts() {
        let repo = repo();
        repo.create_customer(&customer(json!({ "name": "A" }))).unwrap();
        repo.create_customer(&customer(json!({ "name": "B", "status": "Inactive" }))).unwrap();
        repo.create_lead(&lead(json!({ "name": "L1", "value": 1000.5 }))).unwrap();
        repo.create_lead(&lead(json!({ "name": "L2", "status": "Converted", "value": "250" })))
            .unwrap();
        repo.create_activity(&activity(json!({ "type": "call", "title": "x", "date": "2024-01-01" })))
            .unwrap();

        let stats = repo.analytics().unwrap();
        assert_eq!(
            stats,
            CrmAnalytics {
                total_customers: 2,
                active_customers: 1,
                total_leads: 2,
                converted_leads: 1,
                total_value: 1250.5,
                pending_activities: 1,
            }
        );
    }

    #[test]
    fn test_communications_filtered_by_lead() {
        let repo = repo();
        for lead_id in [1, 2] {
            let input: CommunicationInput = serde_json::from_value(json!({
                "lead_id": lead_id, "type": "email", "content": "Hello", "date": "2024-01-01"
            }))
            .unwrap();
            repo.create_communication(&input.validated().unwrap()).unwrap();
        }
        let only = repo
            .list_communications(ContactFilter {
                customer_id: None,
                lead_id: Some("2"),
            })
            .unwrap();
        assert_eq!(only.len(), 1);
        assert_eq!(only[0]["subject"], "");
        assert!(repo.delete_communication(1).unwrap());
    }
}
