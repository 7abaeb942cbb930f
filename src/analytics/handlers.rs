use axum::{extract::State, routing::get, Json, Router};
use tracing::instrument;

use crate::{
    analytics::{
        dto::{CategoryTotal, MonthlyTotal, SummaryResponse},
        repo,
    },
    auth::services::AuthUser,
    error::ApiError,
    state::AppState,
};

pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/summary", get(summary))
        .route("/analytics/category", get(category_breakdown))
        .route("/analytics/monthly", get(monthly_report))
}

#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<SummaryResponse>, ApiError> {
    let totals = repo::summary_totals(&state.db, user_id).await?;
    Ok(Json(SummaryResponse::from(totals)))
}

#[instrument(skip(state))]
pub async fn category_breakdown(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<CategoryTotal>>, ApiError> {
    let rows = repo::category_totals(&state.db, user_id).await?;
    Ok(Json(rows))
}

#[instrument(skip(state))]
pub async fn monthly_report(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<Vec<MonthlyTotal>>, ApiError> {
    let rows = repo::monthly_totals(&state.db, user_id).await?;
    Ok(Json(rows))
}
