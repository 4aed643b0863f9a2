//! Accounts+: companies, ledgers, parties, item master, income/expense
//! heads, employees and the payroll payslip. Reports nest under
//! `/reports` (see [`reports`](super::reports)).

use axum::extract::{Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use billease_core::models::{
    CompanyInput, EmployeeInput, HeadInput, ItemMasterInput, LedgerInput, PartyInput,
};
use billease_core::payroll::Payslip;
use billease_core::Validate;
use billease_db::Row;
use chrono::{DateTime, Datelike, Utc};
use serde::Deserialize;
use serde_json::Value;

use super::{success, TypeQuery};
use crate::error::{ApiError, ApiJson, ApiPath, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/companies", get(list_companies).post(create_company))
        .route("/companies/{id}", put(update_company))
        .route("/ledgers", get(list_ledgers).post(create_ledger))
        .route("/ledgers/{id}", put(update_ledger).delete(delete_ledger))
        .route("/parties", get(list_parties).post(create_party))
        .route("/parties/{id}", put(update_party).delete(delete_party))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", put(update_item).delete(delete_item))
        .route("/expense-heads", get(list_expense_heads).post(create_expense_head))
        .route("/income-heads", get(list_income_heads).post(create_income_head))
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/{id}/payroll", get(payroll))
        .nest("/reports", super::reports::router())
}

// =============================================================================
// Companies and Ledgers
// =============================================================================

async fn list_companies(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.accounts().list_companies()?))
}

async fn create_company(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CompanyInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().create_company(&input.validated()?)?))
}

async fn update_company(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<CompanyInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().update_company(id, &input.validated()?)?))
}

async fn list_ledgers(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.accounts().list_ledgers()?))
}

async fn create_ledger(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<LedgerInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().create_ledger(&input.validated()?)?))
}

async fn update_ledger(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<LedgerInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().update_ledger(id, &input.validated()?)?))
}

async fn delete_ledger(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.accounts().delete_ledger(id)?;
    Ok(success())
}

// =============================================================================
// Parties and Item Master
// =============================================================================

async fn list_parties(
    State(state): State<AppState>,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.accounts().list_parties(query.kind.as_deref())?))
}

async fn create_party(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PartyInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().create_party(&input.validated()?)?))
}

async fn update_party(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<PartyInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().update_party(id, &input.validated()?)?))
}

async fn delete_party(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.accounts().delete_party(id)?;
    Ok(success())
}

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.accounts().list_master_items()?))
}

async fn create_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ItemMasterInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().create_master_item(&input.validated()?)?))
}

async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ItemMasterInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().update_master_item(id, &input.validated()?)?))
}

async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.accounts().delete_master_item(id)?;
    Ok(success())
}

// =============================================================================
// Heads
// =============================================================================

async fn list_expense_heads(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.accounts().list_expense_heads()?))
}

async fn create_expense_head(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<HeadInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().create_expense_head(input.validated()?)?))
}

async fn list_income_heads(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.accounts().list_income_heads()?))
}

async fn create_income_head(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<HeadInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().create_income_head(input.validated()?)?))
}

// =============================================================================
// Employees and Payroll
// =============================================================================

async fn list_employees(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.accounts().list_employees()?))
}

async fn get_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().get_employee(id)?))
}

async fn create_employee(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EmployeeInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().create_employee(&input.validated()?)?))
}

async fn update_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<EmployeeInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.accounts().update_employee(id, &input.validated()?)?))
}

async fn delete_employee(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.accounts().delete_employee(id)?;
    Ok(success())
}

/// `?month=&year=`; either may be omitted.
#[derive(Debug, Default, Deserialize)]
struct PayrollQuery {
    month: Option<String>,
    year: Option<String>,
}

impl PayrollQuery {
    /// Resolves the pay period, defaulting to the month of `now`.
    fn period(&self, now: DateTime<Utc>) -> ApiResult<(u32, i32)> {
        let month = match self.month.as_deref() {
            None | Some("") => now.month(),
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|m| (1..=12).contains(m))
                .ok_or_else(|| ApiError::bad_request("Month must be between 1 and 12"))?,
        };
        let year = match self.year.as_deref() {
            None | Some("") => now.year(),
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map_err(|_| ApiError::bad_request(format!("Invalid year: {raw}")))?,
        };
        Ok((month, year))
    }
}

async fn payroll(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    Query(query): Query<PayrollQuery>,
) -> ApiResult<Json<Payslip>> {
    let now = Utc::now();
    let (month, year) = query.period(now)?;
    Ok(Json(state.db.accounts().payslip(id, month, year, now)?))
}
