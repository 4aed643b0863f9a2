//! Income/Expense: transactions, categories, budgets, recurring entries,
//! family members and the summary.

use axum::extract::{Query, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use billease_core::models::{
    BudgetInput, CategoryInput, FamilyMemberInput, RecurringInput, TransactionInput,
};
use billease_core::{FinanceSummary, TransactionKind, Validate};
use billease_db::Row;
use serde_json::{json, Value};

use super::{success, ModeQuery, TypeQuery};
use crate::error::{ApiJson, ApiPath, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route(
            "/transactions/{id}",
            get(get_transaction).put(update_transaction).delete(delete_transaction),
        )
        .route("/categories/{kind}", get(list_categories).post(add_category))
        .route("/categories/{kind}/{name}", delete(delete_category))
        .route("/budgets", get(list_budgets).post(create_budget))
        .route("/recurring", get(list_recurring).post(create_recurring))
        .route("/family-members", get(list_family_members).post(create_family_member))
        .route("/summary", get(summary))
}

// =============================================================================
// Transactions
// =============================================================================

async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.finance().list_transactions(query.kind.as_deref())?))
}

async fn get_transaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.finance().get_transaction(id)?))
}

async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TransactionInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.finance().create_transaction(&input.validated()?)?))
}

async fn update_transaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<TransactionInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.finance().update_transaction(id, &input.validated()?)?))
}

async fn delete_transaction(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.finance().delete_transaction(id)?;
    Ok(success())
}

// =============================================================================
// Categories
// =============================================================================

/// Names only, alphabetical.
async fn list_categories(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<TransactionKind>,
) -> ApiResult<Json<Vec<String>>> {
    Ok(Json(state.db.finance().category_names(kind)?))
}

async fn add_category(
    State(state): State<AppState>,
    ApiPath(kind): ApiPath<TransactionKind>,
    ApiJson(input): ApiJson<CategoryInput>,
) -> ApiResult<Json<Value>> {
    let row = state.db.finance().add_category(kind, &input.validated()?)?;
    Ok(Json(json!({ "id": row["id"], "name": row["name"] })))
}

async fn delete_category(
    State(state): State<AppState>,
    ApiPath((kind, name)): ApiPath<(TransactionKind, String)>,
) -> ApiResult<Json<Value>> {
    state.db.finance().delete_category(kind, &name)?;
    Ok(success())
}

// =============================================================================
// Budgets, Recurring, Family
// =============================================================================

async fn list_budgets(
    State(state): State<AppState>,
    Query(query): Query<ModeQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.finance().list_budgets(query.mode.as_deref())?))
}

async fn create_budget(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<BudgetInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.finance().create_budget(&input.validated()?)?))
}

async fn list_recurring(
    State(state): State<AppState>,
    Query(query): Query<ModeQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.finance().list_recurring(query.mode.as_deref())?))
}

async fn create_recurring(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<RecurringInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.finance().create_recurring(&input.validated()?)?))
}

async fn list_family_members(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.finance().list_family_members()?))
}

async fn create_family_member(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<FamilyMemberInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.finance().create_family_member(&input.validated()?)?))
}

async fn summary(State(state): State<AppState>) -> ApiResult<Json<FinanceSummary>> {
    Ok(Json(state.db.finance().summary()?))
}
