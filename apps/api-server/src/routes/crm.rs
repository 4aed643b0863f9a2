//! CRM: customers, leads, activities, communications and analytics.

use axum::extract::{Query, State};
use axum::routing::{delete, get, put};
use axum::{Json, Router};
use billease_core::models::{ActivityInput, CommunicationInput, CustomerInput, LeadInput};
use billease_core::{CrmAnalytics, Validate};
use billease_db::{ContactFilter, Row};
use serde::Deserialize;
use serde_json::Value;

use super::success;
use crate::error::{ApiJson, ApiPath, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/customers", get(list_customers).post(create_customer))
        .route(
            "/customers/{id}",
            get(get_customer).put(update_customer).delete(delete_customer),
        )
        .route("/leads", get(list_leads).post(create_lead))
        .route("/leads/{id}", get(get_lead).put(update_lead).delete(delete_lead))
        .route("/activities", get(list_activities).post(create_activity))
        .route("/activities/{id}", put(update_activity).delete(delete_activity))
        .route("/communications", get(list_communications).post(create_communication))
        .route("/communications/{id}", delete(delete_communication))
        .route("/analytics", get(analytics))
}

#[derive(Debug, Default, Deserialize)]
struct StatusQuery {
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ContactQuery {
    customer_id: Option<String>,
    lead_id: Option<String>,
}

impl ContactQuery {
    fn filter(&self) -> ContactFilter<'_> {
        ContactFilter {
            customer_id: self.customer_id.as_deref(),
            lead_id: self.lead_id.as_deref(),
        }
    }
}

// =============================================================================
// Customers
// =============================================================================

async fn list_customers(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.crm().list_customers()?))
}

async fn get_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().get_customer(id)?))
}

async fn create_customer(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().create_customer(&input.validated()?)?))
}

async fn update_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CustomerInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().update_customer(id, &input.validated()?)?))
}

async fn delete_customer(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.crm().delete_customer(id)?;
    Ok(success())
}

// =============================================================================
// Leads
// =============================================================================

async fn list_leads(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.crm().list_leads(query.status.as_deref())?))
}

async fn get_lead(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().get_lead(id)?))
}

async fn create_lead(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LeadInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().create_lead(&input.validated()?)?))
}

async fn update_lead(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<LeadInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().update_lead(id, &input.validated()?)?))
}

async fn delete_lead(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.crm().delete_lead(id)?;
    Ok(success())
}

// =============================================================================
// Activities and Communications
// =============================================================================

async fn list_activities(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.crm().list_activities(query.filter())?))
}

async fn create_activity(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ActivityInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().create_activity(&input.validated()?)?))
}

async fn update_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ActivityInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().update_activity(id, &input.validated()?)?))
}

async fn delete_activity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.crm().delete_activity(id)?;
    Ok(success())
}

async fn list_communications(
    State(state): State<AppState>,
    Query(query): Query<ContactQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.crm().list_communications(query.filter())?))
}

async fn create_communication(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CommunicationInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.crm().create_communication(&input.validated()?)?))
}

async fn delete_communication(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.crm().delete_communication(id)?;
    Ok(success())
}

async fn analytics(State(state): State<AppState>) -> ApiResult<Json<CrmAnalytics>> {
    Ok(Json(state.db.crm().analytics()?))
}
