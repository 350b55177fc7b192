use crate::notify::{Notification, NotificationFeed};
use crate::service::{AlertService, BudgetAlertReport};
use crate::summary::AlertSummary;
use axum::{
    Json,
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use common::{MonthKey, MonthKeyError};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Clone)]
pub struct AlertsState {
    pub service: Arc<AlertService>,
    pub feed: Arc<NotificationFeed>,
}

pub struct InvalidMonth(MonthKeyError);

impl IntoResponse for InvalidMonth {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>, // YYYY-MM, current month when absent
}

impl MonthQuery {
    fn month(&self) -> Result<Option<MonthKey>, InvalidMonth> {
        self.month
            .as_deref()
            .filter(|m| !m.is_empty())
            .map(|m| m.parse().map_err(InvalidMonth))
            .transpose()
    }
}

pub fn alerts_router<S>(state: AlertsState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(get_alerts))
        .route("/summary", get(get_summary))
        .route("/notifications", get(drain_notifications))
        .with_state(state)
}

async fn get_alerts(
    State(state): State<AlertsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<BudgetAlertReport>, InvalidMonth> {
    let report = state.service.calculate_budget_alerts(query.month()?).await;
    Ok(Json(report))
}

async fn get_summary(
    State(state): State<AlertsState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<AlertSummary>, InvalidMonth> {
    let summary = state.service.get_alert_summary(query.month()?).await;
    Ok(Json(summary))
}

async fn drain_notifications(State(state): State<AlertsState>) -> Json<Vec<Notification>> {
    Json(state.feed.drain())
}
