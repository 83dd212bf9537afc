use axum::{
    extract::{Query, State},
    Json,
};
use bookstore_http::{AdminUser, AppError};
use chrono::{DateTime, Utc};

use super::models::{ReportQuery, SalesSummary};
use super::report::summarize;
use crate::state::AppState;
use crate::utils::parse_instant;

fn required_instant(field: &str, raw: Option<&str>) -> Result<DateTime<Utc>, AppError> {
    let raw = raw
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| AppError::invalid_field(field, "required"))?;
    parse_instant(raw).ok_or_else(|| {
        AppError::invalid_field(field, "expected an ISO-8601 date or timestamp")
    })
}

/// `GET /sales-report?startDate=..&endDate=..`
///
/// Both bounds are inclusive.
pub async fn sales_report(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Query(query): Query<ReportQuery>,
) -> Result<Json<SalesSummary>, AppError> {
    let start = required_instant("startDate", query.start_date.as_deref())?;
    let end = required_instant("endDate", query.end_date.as_deref())?;
    if start > end {
        return Err(AppError::invalid_field(
            "startDate",
            "must not be after endDate",
        ));
    }

    let total_orders = state.store.count_orders().await?;
    let orders = state.store.orders_created_between(start, end).await?;

    tracing::debug!(
        admin_id = %admin.identity.user_id,
        %start,
        %end,
        matched = orders.len(),
        "building sales report"
    );

    Ok(Json(summarize(total_orders, orders, state.sales_bucket)))
}
