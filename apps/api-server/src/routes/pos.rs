//! POS: products, customer/supplier entities, sales, payments and
//! quotations.

use axum::extract::{Query, State};
use axum::routing::{get, put};
use axum::{Json, Router};
use billease_core::models::{EntityInput, PaymentInput, ProductInput, QuotationInput, SaleInput};
use billease_core::Validate;
use billease_db::Row;
use serde_json::Value;

use super::{success, TypeQuery};
use crate::error::{ApiJson, ApiPath, ApiResult};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/{id}", put(update_product).delete(delete_product))
        .route("/entities", get(list_entities).post(create_entity))
        .route("/entities/{id}", put(update_entity).delete(delete_entity))
        .route("/sales", get(list_sales).post(create_sale))
        .route("/payments", get(list_payments).post(create_payment))
        .route("/quotations", get(list_quotations).post(create_quotation))
}

// =============================================================================
// Products
// =============================================================================

async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.pos().list_products()?))
}

async fn create_product(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.pos().create_product(&input.validated()?)?))
}

async fn update_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<ProductInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.pos().update_product(id, &input.validated()?)?))
}

async fn delete_product(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.pos().delete_product(id)?;
    Ok(success())
}

// =============================================================================
// Entities
// =============================================================================

async fn list_entities(
    State(state): State<AppState>,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.pos().list_entities(query.kind.as_deref())?))
}

async fn create_entity(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<EntityInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.pos().create_entity(&input.validated()?)?))
}

async fn update_entity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(input): ApiJson<EntityInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.pos().update_entity(id, &input.validated()?)?))
}

async fn delete_entity(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> ApiResult<Json<Value>> {
    state.db.pos().delete_entity(id)?;
    Ok(success())
}

// =============================================================================
// Sales, Payments, Quotations
// =============================================================================

async fn list_sales(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.pos().list_sales()?))
}

/// The sale and its line items are stored together.
async fn create_sale(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<SaleInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.pos().create_sale(&input.validated()?)?))
}

async fn list_payments(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.pos().list_payments()?))
}

async fn create_payment(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PaymentInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.pos().create_payment(&input.validated()?)?))
}

async fn list_quotations(State(state): State<AppState>) -> ApiResult<Json<Vec<Row>>> {
    Ok(Json(state.db.pos().list_quotations()?))
}

async fn create_quotation(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<QuotationInput>,
) -> ApiResult<Json<Row>> {
    Ok(Json(state.db.pos().create_quotation(&input.validated()?)?))
}
