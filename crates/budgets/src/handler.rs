use crate::models::{Budget, CopyBudgetRequest, RawBudgetRequest};
use crate::service::{BudgetError, BudgetService};
use axum::{
    Json,
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use common::{AppState, MonthKey};
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for BudgetError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            BudgetError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            BudgetError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            BudgetError::NotFound => (StatusCode::NOT_FOUND, "Budget not found".to_string()),
            BudgetError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

fn parse_month(raw: &str) -> Result<MonthKey, BudgetError> {
    raw.parse()
        .map_err(|e: common::MonthKeyError| BudgetError::InvalidInput(e.to_string()))
}

pub fn budgets_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route("/copy", post(copy_budget))
        .route("/month/{month}", get(get_budget_for_month))
        .route("/{id}", get(get_budget).put(update_budget).delete(delete_budget))
        .with_state(state)
}

async fn list_budgets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Budget>>, BudgetError> {
    let budgets = BudgetService::list_budgets(&state.db).await?;
    Ok(Json(budgets))
}

async fn get_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Budget>, BudgetError> {
    let budget = BudgetService::get_budget(&state.db, id).await?;
    Ok(Json(budget))
}

async fn get_budget_for_month(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
) -> Result<Json<Budget>, BudgetError> {
    let month = parse_month(&month)?;
    let budget = BudgetService::find_for_month(&state.db, month).await?
        .ok_or(BudgetError::NotFound)?;
    Ok(Json(budget))
}

async fn create_budget(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RawBudgetRequest>,
) -> Result<impl IntoResponse, BudgetError> {
    let budget = BudgetService::create_budget(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(budget)))
}

async fn update_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<RawBudgetRequest>,
) -> Result<Json<Budget>, BudgetError> {
    let budget = BudgetService::update_budget(&state.db, id, payload).await?;
    Ok(Json(budget))
}

async fn delete_budget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, BudgetError> {
    BudgetService::delete_budget(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn copy_budget(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CopyBudgetRequest>,
) -> Result<Response, BudgetError> {
    let source = parse_month(&payload.source_month)?;
    let target = parse_month(&payload.target_month)?;

    match BudgetService::copy_budget(&state.db, source, target).await? {
        Some(budget) => Ok((StatusCode::CREATED, Json(budget)).into_response()),
        None => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
