use crate::hooks::ExpenseHook;
use crate::models::{MonthlySummary, RawTransactionRequest, Transaction};
use crate::service::{TransactionError, TransactionService};
use axum::{
    Extension,
    Json,
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use common::{AppState, MonthKey};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for TransactionError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            TransactionError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            TransactionError::NotFound => (StatusCode::NOT_FOUND, "Transaction not found".to_string()),
            TransactionError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

type SharedHook = Arc<dyn ExpenseHook>;

#[derive(Deserialize)]
pub struct MonthFilter {
    pub month: Option<String>, // YYYY-MM
}

fn parse_month(raw: &str) -> Result<MonthKey, TransactionError> {
    raw.parse()
        .map_err(|e: common::MonthKeyError| TransactionError::InvalidInput(e.to_string()))
}

pub fn transactions_router(state: Arc<AppState>, hook: SharedHook) -> Router<Arc<AppState>> {
    Router::new()
        // Specific routes first
        .route("/", get(list_transactions).post(create_transaction))
        .route("/summary/{month}", get(get_month_summary))
        // Then parameterized routes
        .route("/{id}", get(get_transaction).put(update_transaction).delete(delete_transaction))
        .layer(Extension(hook))
        .with_state(state)
}

async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MonthFilter>,
) -> Result<Json<Vec<Transaction>>, TransactionError> {
    let transactions = match filter.month.as_deref() {
        Some(month) => TransactionService::list_by_month(&state.db, parse_month(month)?).await?,
        None => TransactionService::list_transactions(&state.db).await?,
    };
    Ok(Json(transactions))
}

async fn get_month_summary(
    State(state): State<Arc<AppState>>,
    Path(month): Path<String>,
) -> Result<Json<MonthlySummary>, TransactionError> {
    let summary = TransactionService::get_month_summary(&state.db, parse_month(&month)?).await?;
    Ok(Json(summary))
}

async fn get_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Transaction>, TransactionError> {
    let transaction = TransactionService::get_transaction(&state.db, id).await?;
    Ok(Json(transaction))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Extension(hook): Extension<SharedHook>,
    Json(payload): Json<RawTransactionRequest>,
) -> Result<impl IntoResponse, TransactionError> {
    let transaction = TransactionService::create_transaction(&state.db, hook.as_ref(), payload)
        .await
        .map_err(|e| {
            tracing::error!("create_transaction error: {:?}", e);
            e
        })?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn update_transaction(
    State(state): State<Arc<AppState>>,
    Extension(hook): Extension<SharedHook>,
    Path(id): Path<i64>,
    Json(payload): Json<RawTransactionRequest>,
) -> Result<Json<Transaction>, TransactionError> {
    let transaction = TransactionService::update_transaction(&state.db, hook.as_ref(), id, payload).await?;
    Ok(Json(transaction))
}

async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, TransactionError> {
    TransactionService::delete_transaction(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
