//! Invento: warehouses, items, stock movements and low-stock alerts.
//!
//! Creations answer `201 Created`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use billease_core::models::{ItemInput, StockMovementInput, WarehouseInput};
use billease_core::Validate;
use billease_db::Row;
use serde_json::Value;

use super::{success, TypeQuery};
use crate::error::{ApiJson, ApiPath, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/warehouses", get(list_warehouses).post(create_warehouse))
        .route("/warehouses/{id}", delete(delete_warehouse))
        .route("/items", get(list_items).post(create_item))
        .route("/items/{id}", get(get_item).put(update_item).delete(delete_item))
        .route("/transactions", get(list_transactions).post(create_transaction))
        .route("/alerts", get(low_stock_alerts))
}

// =============================================================================
// Warehouses
// =============================================================================

async fn list_warehouses(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.inventory().list_warehouses()?))
}

async fn create_warehouse(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<WarehouseInput>,
) -> ApiResult<(StatusCode, Json<Row>)> {
    let row = state.db.inventory().create_warehouse(&input.validated()?)?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn delete_warehouse(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.inventory().delete_warehouse(id)?;
    Ok(success())
}

// =============================================================================
// Items
// =============================================================================

async fn list_items(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.inventory().list_items()?))
}

async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.inventory().get_item(id)?))
}

async fn create_item(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ItemInput>,
) -> ApiResult<(StatusCode, Json<Row>)> {
    let row = state.db.inventory().create_item(&input.validated()?)?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ItemInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.inventory().update_item(id, &input.validated()?)?))
}

async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.inventory().delete_item(id)?;
    Ok(success())
}

// =============================================================================
// Stock Movements
// =============================================================================

async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.inventory().list_movements(query.kind.as_deref())?))
}

/// Validation, the stock check and both writes happen in the repository.
async fn create_transaction(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<StockMovementInput>,
) -> ApiResult<(StatusCode, Json<Row>)> {
    let row = state.db.inventory().record_movement(input)?;
    Ok((StatusCode::CREATED, Json(row)))
}

async fn low_stock_alerts(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.inventory().low_stock_alerts()?))
}
