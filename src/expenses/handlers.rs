use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    auth::{dto::MessageResponse, services::AuthUser},
    error::ApiError,
    expenses::{
        dto::{
            total_pages, CreateExpenseRequest, ExpenseListResponse, Pagination,
            UpdateExpenseRequest,
        },
        repo::Expense,
    },
    state::AppState,
};

pub fn expense_routes() -> Router<AppState> {
    Router::new()
        .route("/expenses", get(list_expenses).post(add_expense))
        .route("/expenses/:id", put(update_expense).delete(delete_expense))
}

#[instrument(skip(state, payload))]
pub async fn add_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<Expense>), ApiError> {
    let (Some(amount), Some(kind), Some(category)) =
        (payload.amount, payload.kind, payload.category)
    else {
        return Err(ApiError::Validation("Missing required fields".into()));
    };
    if category.trim().is_empty() {
        return Err(ApiError::Validation("Missing required fields".into()));
    }

    let expense = Expense::create(
        &state.db,
        user_id,
        amount,
        kind,
        &category,
        payload.note.as_deref(),
        payload.date,
    )
    .await?;

    info!(user_id = %user_id, expense_id = %expense.id, "expense created");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[instrument(skip(state))]
pub async fn list_expenses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(p): Query<Pagination>,
) -> Result<Json<ExpenseListResponse>, ApiError> {
    let (page, limit) = p.clamped();

    let total = Expense::count_by_user(&state.db, user_id).await?;
    let expenses = Expense::list_page(&state.db, user_id, limit, (page - 1) * limit).await?;

    Ok(Json(ExpenseListResponse {
        total,
        page,
        total_pages: total_pages(total, limit),
        expenses,
    }))
}

#[instrument(skip(state, payload))]
pub async fn update_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateExpenseRequest>,
) -> Result<Json<Expense>, ApiError> {
    // A foreign id and a missing id are indistinguishable here.
    let expense = Expense::update(&state.db, user_id, id, &payload)
        .await?
        .ok_or(ApiError::NotFound("Expense not found"))?;

    info!(user_id = %user_id, expense_id = %expense.id, "expense updated");
    Ok(Json(expense))
}

#[instrument(skip(state))]
pub async fn delete_expense(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    if !Expense::delete(&state.db, user_id, id).await? {
        return Err(ApiError::NotFound("Expense not found"));
    }

    info!(user_id = %user_id, expense_id = %id, "expense deleted");
    Ok(Json(MessageResponse::new("Expense deleted")))
}
