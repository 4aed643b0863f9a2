//! Accounts+ reports, nested under `/api/accounts-plus/reports`.
//!
//! ```text
//! GET /trial-balance
//! GET /balance-sheet        ?as_on=YYYY-MM-DD
//! GET /profit-loss          ?from=&to=
//! GET /sales                ?from=&to=
//! GET /inventory-valuation
//! GET /aged-receivables     ?as_on=
//! GET /hsn
//! ```
//!
//! Every date is optional. A blank `as_on` means today (UTC) and a blank
//! `from`/`to` leaves that end of the range open.

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use billease_core::reports::{
    optional_date, BalanceSheet, DateRange, HsnLine, InventoryValuation, ProfitAndLoss,
    ReceivableLine, SalesReport, TrialBalance,
};
use billease_db::Row;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/trial-balance", get(trial_balance))
        .route("/balance-sheet", get(balance_sheet))
        .route("/profit-loss", get(profit_and_loss))
        .route("/sales", get(sales))
        .route("/inventory-valuation", get(inventory_valuation))
        .route("/aged-receivables", get(aged_receivables))
        .route("/hsn", get(hsn_summary))
}

/// `?from=&to=`.
#[derive(Debug, Default, Deserialize)]
struct PeriodQuery {
    from: Option<String>,
    to: Option<String>,
}

impl PeriodQuery {
    fn range(&self) -> ApiResult<DateRange> {
        Ok(DateRange::parse(self.from.as_deref(), self.to.as_deref())?)
    }
}

/// `?as_on=`.
#[derive(Debug, Default, Deserialize)]
struct AsOnQuery {
    as_on: Option<String>,
}

impl AsOnQuery {
    fn date(&self, today: NaiveDate) -> ApiResult<NaiveDate> {
        Ok(optional_date(self.as_on.as_deref(), "as_on date")?.unwrap_or(today))
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

// =============================================================================
// Handlers
// =============================================================================

async fn trial_balance(State(state): State<AppState>) -> ApiResult<Json<TrialBalance>> {
    Ok(Json(state.db.reports().trial_balance()?))
}

async fn balance_sheet(
    State(state): State<AppState>,
    Query(query): Query<AsOnQuery>,
) -> ApiResult<Json<BalanceSheet>> {
    let as_on = query.date(today())?;
    Ok(Json(state.db.reports().balance_sheet(as_on)?))
}

async fn profit_and_loss(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<ProfitAndLoss>> {
    Ok(Json(state.db.reports().profit_and_loss(query.range()?)?))
}

async fn sales(
    State(state): State<AppState>,
    Query(query): Query<PeriodQuery>,
) -> ApiResult<Json<SalesReport<Row>>> {
    Ok(Json(state.db.reports().sales(query.range()?)?))
}

async fn inventory_valuation(
    State(state): State<AppState>,
) -> ApiResult<Json<InventoryValuation>> {
    Ok(Json(state.db.reports().inventory_valuation()?))
}

async fn aged_receivables(
    State(state): State<AppState>,
    Query(query): Query<AsOnQuery>,
) -> ApiResult<Json<Vec<ReceivableLine>>> {
    let as_on = query.date(today())?;
    Ok(Json(state.db.reports().aged_receivables(as_on)?))
}

async fn hsn_summary(State(state): State<AppState>) -> ApiResult<Json<Vec<HsnLine>>> {
    Ok(Json(state.db.reports().hsn_summary()?))
}
