use crate::models::{AddFundsRequest, Goal, GoalProgress, RawGoalRequest};
use crate::service::{GoalError, GoalService};
use axum::{
    Json,
    Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use common::AppState;
use serde_json::json;
use std::sync::Arc;

impl IntoResponse for GoalError {
    fn into_response(self) -> Response {
        let (status, msg) = match self {
            GoalError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            GoalError::NotFound => (StatusCode::NOT_FOUND, "Goal not found".to_string()),
            GoalError::Infrastructure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, Json(json!({ "error": msg }))).into_response()
    }
}

pub fn goals_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_goals).post(create_goal))
        .route("/{id}", get(get_goal).put(update_goal).delete(delete_goal))
        .route("/{id}/funds", post(add_funds))
        .with_state(state)
}

async fn list_goals(State(state): State<Arc<AppState>>) -> Result<Json<Vec<GoalProgress>>, GoalError> {
    Ok(Json(GoalService::list_goals(&state.db).await?))
}

async fn get_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<GoalProgress>, GoalError> {
    Ok(Json(GoalService::get_goal(&state.db, id).await?))
}

async fn create_goal(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RawGoalRequest>,
) -> Result<impl IntoResponse, GoalError> {
    let goal = GoalService::create_goal(&state.db, payload).await?;
    Ok((StatusCode::CREATED, Json(goal)))
}

async fn update_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<RawGoalRequest>,
) -> Result<Json<Goal>, GoalError> {
    Ok(Json(GoalService::update_goal(&state.db, id, payload).await?))
}

async fn add_funds(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<AddFundsRequest>,
) -> Result<Json<GoalProgress>, GoalError> {
    Ok(Json(GoalService::add_funds(&state.db, id, payload).await?))
}

async fn delete_goal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, GoalError> {
    GoalService::delete_goal(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
