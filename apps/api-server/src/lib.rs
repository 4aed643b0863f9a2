//! # BillEase API
//!
//! REST server for the five business modules over one in-memory store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         BillEase API Server                             │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Middleware (outermost first)                                    │  │
//! │  │  catch-panic → trace → compression → CORS → body limit           │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │  ┌──────────────┐ ┌────────────────┐ ┌──────────┐ ┌──────────────────┐ │
//! │  │ /api/invento │ │/income-expense │ │ /api/pos │ │ /api/crm         │ │
//! │  └──────────────┘ └────────────────┘ └──────────┘ └──────────────────┘ │
//! │  ┌────────────────────┐ ┌─────────────┐ ┌──────────────────────────┐  │
//! │  │ /api/accounts-plus │ │ /api/health │ │ fallback (404 JSON)      │  │
//! │  └────────────────────┘ └─────────────┘ └──────────────────────────┘  │
//! │                                 │                                       │
//! │                                 ▼                                       │
//! │               AppState { Database (Arc<Store>), config }               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! See [`config::ServerConfig`]. Environment variables:
//! - `PORT` - HTTP port (default: 3001)
//! - `ALLOWED_ORIGINS` - comma-separated CORS origins (default: any)
//! - `BILLEASE_ENV` - development / production / test
//! - `BILLEASE_CONFIG` - path to a TOML config file

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::any::Any;

use axum::body::Body;
use axum::extract::{DefaultBodyLimit, OriginalUri};
use axum::http::{header, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::compression::predicate::SizeAbove;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_http::CompressionLevel;
use tracing::{error, Span};
use uuid::Uuid;

// Re-exports
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use state::AppState;

/// Module routers, relative to `/api`.
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/invento", routes::inventory::router())
        .nest("/income-expense", routes::income_expense::router())
        .nest("/pos", routes::pos::router())
        .nest("/crm", routes::crm::router())
        .nest("/accounts-plus", routes::accounts_plus::router())
        .route("/health", get(routes::health::health))
}

/// Builds the complete application with middleware applied.
pub fn build_router(state: AppState) -> Router {
    let config = state.config.clone();

    let router = Router::new()
        .nest("/api", api_router())
        .fallback(not_found)
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.body_limit_bytes))
        .layer(cors_layer(&config.allowed_origins))
        .layer(
            CompressionLayer::new()
                .quality(CompressionLevel::Precise(config.compression_level as i32))
                .compress_when(SizeAbove::new(config.compression_threshold)),
        );

    let router = if config.trace_requests() {
        router.layer(TraceLayer::new_for_http().make_span_with(request_span))
    } else {
        router
    };

    router.layer(CatchPanicLayer::custom(panic_response))
}

/// Any origin when the list is empty; otherwise the listed origins with
/// credentials.
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(AnyOrigin)
            .allow_methods(AnyOrigin)
            .allow_headers(AnyOrigin);
    }

    // Origins were checked by ServerConfig::validate.
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %request.method(),
        uri = %request.uri(),
    )
}

fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    error!(%detail, "Handler panicked");
    ApiError::internal().into_response()
}

async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    let path = uri.path();
    let body = if path == "/api" || path.starts_with("/api/") {
        json!({ "error": "API endpoint not found", "path": path, "method": method.as_str() })
    } else {
        json!({ "error": "Route not found", "path": path })
    };
    (StatusCode::NOT_FOUND, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use billease_db::Database;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let db = Database::in_memory().unwrap();
        build_router(AppState::new(db, ServerConfig::default()))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(match body {
                Some(json) => Body::from(json.to_string()),
                None => Body::empty(),
            })
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_stock_out_beyond_quantity_is_rejected() {
        let app = app();

        let (status, item) = send(
            &app,
            Method::POST,
            "/api/invento/items",
            Some(json!({ "name": "Widget", "quantity": 10, "min_stock": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(item["id"], json!(1));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/invento/transactions",
            Some(json!({ "item_id": 1, "type": "out", "quantity": 12, "date": "2024-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Insufficient stock" }));

        let (status, item) = send(&app, Method::GET, "/api/invento/items/1", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(item["quantity"], json!(10));

        let (_, movements) = send(&app, Method::GET, "/api/invento/transactions", None).await;
        assert_eq!(movements, json!([]));
    }

    #[tokio::test]
    async fn test_oversized_movement_keeps_store_usable() {
        let app = app();
        send(&app, Method::POST, "/api/invento/items", Some(json!({ "name": "Widget" }))).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/invento/transactions",
            Some(json!({ "item_id": 1, "type": "in", "quantity": 1e18, "date": "2024-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Quantity is too large" }));

        let (status, _) = send(&app, Method::GET, "/api/invento/warehouses", None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_sales_report_by_period() {
        let app = app();
        for (invoice, date, total) in [("INV-1", "2024-01-15", 100), ("INV-2", "2024-02-15", 40)] {
            let (status, _) = send(
                &app,
                Method::POST,
                "/api/pos/sales",
                Some(json!({
                    "invoice_no": invoice,
                    "date": date,
                    "total": total,
                    "items": [{ "product_name": "Pen", "quantity": 1, "price": total, "tax": 5 }]
                })),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let uri = "/api/accounts-plus/reports/sales?from=2024-01-01&to=2024-01-31";
        let (status, report) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(report["count"], json!(1));
        assert_eq!(report["totalSales"], json!(100.0));
        assert_eq!(report["totalTax"], json!(5.0));
        assert_eq!(report["fromDate"], "2024-01-01");
        assert_eq!(report["sales"][0]["invoice_no"], "INV-1");

        let (_, hsn) = send(&app, Method::GET, "/api/accounts-plus/reports/hsn", None).await;
        assert_eq!(hsn[0]["hsn"], "N/A");
        assert_eq!(hsn[0]["quantity"], json!(2));

        let uri = "/api/accounts-plus/reports/profit-loss?from=yesterday";
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid from date format" }));
    }

    #[tokio::test]
    async fn test_customer_lifecycle() {
        let app = app();

        let (status, customer) = send(
            &app,
            Method::POST,
            "/api/crm/customers",
            Some(json!({ "name": "Acme" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = customer["id"].as_i64().unwrap();

        let (_, list) = send(&app, Method::GET, "/api/crm/customers", None).await;
        assert!(list
            .as_array()
            .unwrap()
            .iter()
            .any(|c| c["id"] == json!(id) && c["name"] == "Acme"));

        let uri = format!("/api/crm/customers/{id}");
        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true }));

        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Customer not found" }));
    }

    #[tokio::test]
    async fn test_sale_list_merges_entity_and_items() {
        let app = app();

        let (_, entity) = send(
            &app,
            Method::POST,
            "/api/pos/entities",
            Some(json!({ "name": "Ravi Traders", "type": "customer" })),
        )
        .await;
        let (status, sale) = send(
            &app,
            Method::POST,
            "/api/pos/sales",
            Some(json!({
                "invoice_no": "INV-1",
                "date": "2024-02-01",
                "entity_id": entity["id"],
                "total": 250,
                "items": [
                    { "product_name": "Pen", "quantity": 5, "price": 10 },
                    { "product_name": "Book", "quantity": 2, "price": 100 }
                ]
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(sale["items"].as_array().unwrap().len(), 2);

        let (_, sales) = send(&app, Method::GET, "/api/pos/sales", None).await;
        let listed = &sales[0];
        assert_eq!(listed["invoice_no"], "INV-1");
        assert_eq!(listed["entity_name"], "Ravi Traders");
        assert_eq!(listed["items"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_duplicate_category_is_rejected() {
        let app = app();
        let uri = "/api/income-expense/categories/expense";

        let (status, body) = send(&app, Method::POST, uri, Some(json!({ "name": "Pets" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Pets");

        let (status, body) = send(&app, Method::POST, uri, Some(json!({ "name": "Food" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Category 'Food' already exists" }));

        let (_, names) = send(&app, Method::GET, uri, None).await;
        assert!(names.as_array().unwrap().contains(&json!("Pets")));

        let (status, _) = send(&app, Method::GET, "/api/income-expense/categories/savings", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_employee_payroll() {
        let app = app();

        let (_, employee) = send(
            &app,
            Method::POST,
            "/api/accounts-plus/employees",
            Some(json!({
                "name": "Asha",
                "employee_id": "E-001",
                "basic_salary": 12000,
                "hra": 4000
            })),
        )
        .await;
        let id = employee["id"].as_i64().unwrap();

        let uri = format!("/api/accounts-plus/employees/{id}/payroll?month=4&year=2024");
        let (status, slip) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(slip["month"], json!(4));
        assert_eq!(slip["year"], json!(2024));
        assert_eq!(slip["netSalary"], json!(14440.0));

        let uri = format!("/api/accounts-plus/employees/{id}/payroll?month=0");
        let (status, body) = send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Month must be between 1 and 12" }));

        let (status, _) =
            send(&app, Method::GET, "/api/accounts-plus/employees/99/payroll", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_bad_input_answers_json_errors() {
        let app = app();

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/crm/leads")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{ not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().starts_with("Invalid JSON body"));

        let (status, body) = send(&app, Method::GET, "/api/crm/leads/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid path parameter"));

        let (status, body) =
            send(&app, Method::POST, "/api/crm/customers", Some(json!({ "name": "  " }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Name is required" }));
    }

    #[tokio::test]
    async fn test_unknown_routes() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/api/nowhere", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({ "error": "API endpoint not found", "path": "/api/nowhere", "method": "GET" })
        );

        let (status, body) = send(&app, Method::DELETE, "/api/crm/unknown/1", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["path"], "/api/crm/unknown/1");
        assert_eq!(body["method"], "DELETE");

        let (status, body) = send(&app, Method::GET, "/dashboard", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Route not found", "path": "/dashboard" }));
    }

    #[tokio::test]
    async fn test_health_and_unbootstrapped_store() {
        let (status, body) = send(&app(), Method::GET, "/api/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "status": "ok", "message": "BillEase Suite API is running" })
        );

        let bare = build_router(AppState::new(Database::unbootstrapped(), ServerConfig::default()));
        let (status, body) = send(&bare, Method::GET, "/api/pos/products", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "error": "Database not initialized" }));
    }
}
