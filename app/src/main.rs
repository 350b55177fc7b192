use alerts::handler::{AlertsState, alerts_router};
use alerts::{AlertService, NotificationFeed, NotificationTrigger, ScheduledTrigger};
use axum::{Router, response::{IntoResponse, Redirect, Response}, routing::get};
use clap::Parser;
use common::{AppState, Config, MonthKey};
use database::Database;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transactions::hooks::ExpenseHook;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Environment (.env is optional)
    dotenvy::dotenv().ok();

    // 2. Initialize Logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 3. Load Config from CLI args / env
    let config = Config::parse();

    // 4. Initialize Database
    let db = Database::new(&config.database_url).await?;
    db.run_migrations().await?;

    // 5. Alert engine and the hook that re-checks budgets after expense writes
    let alerts = alerts_state(&db, &config);
    let trigger = Arc::new(NotificationTrigger::new(alerts.service.clone(), alerts.feed.clone()));
    let hook: Arc<dyn ExpenseHook> = Arc::new(ScheduledTrigger::new(
        trigger,
        Duration::from_millis(config.alert_delay_ms),
    ));

    let state = Arc::new(AppState {
        db,
        config: config.clone(),
    });

    // 6. Routing
    let app = build_router(state, alerts, hook).layer(TraceLayer::new_for_http());

    // 7. Start Server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

fn alerts_state(db: &Database, config: &Config) -> AlertsState {
    let store = Arc::new(db.clone());
    AlertsState {
        service: Arc::new(AlertService::new(store.clone(), store)),
        feed: Arc::new(NotificationFeed::new(config.notification_capacity)),
    }
}

fn build_router(state: Arc<AppState>, alerts: AlertsState, hook: Arc<dyn ExpenseHook>) -> Router {
    Router::<Arc<AppState>>::new()
        .route("/", get(root_redirect))
        .nest("/transactions", transactions::handler::transactions_router(state.clone(), hook))
        .nest("/budgets", budgets::handler::budgets_router(state.clone()))
        .nest("/categories", categories::handler::categories_router(state.clone()))
        .nest("/goals", goals::handler::goals_router(state.clone()))
        .nest("/alerts", alerts_router(alerts))
        .with_state(state)
}

async fn root_redirect() -> Response {
    Redirect::to(&format!("/alerts?month={}", MonthKey::current())).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request, StatusCode, header}};
    use database::get_test_db;
    use serde_json::Value;
    use tower::ServiceExt;

    async fn app() -> (Router, AlertsState) {
        let db = get_test_db().await;
        let config = Config::for_tests();
        let alerts = alerts_state(&db, &config);
        let trigger = Arc::new(NotificationTrigger::new(alerts.service.clone(), alerts.feed.clone()));
        let hook: Arc<dyn ExpenseHook> = Arc::new(ScheduledTrigger::new(trigger, Duration::ZERO));
        let state = Arc::new(AppState { db, config });
        (build_router(state, alerts.clone(), hook), alerts)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: &'static str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
        (status, value)
    }

    #[tokio::test]
    async fn test_root_redirects_to_current_month_alerts() {
        let (app, _) = app().await;
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        assert_eq!(location, format!("/alerts?month={}", MonthKey::current()));
    }

    #[tokio::test]
    async fn test_expense_over_budget_raises_notification() {
        let (app, alerts) = app().await;

        let (status, _) = send(
            &app,
            "POST",
            "/budgets",
            r#"{"month":"2024-05","total_limit_dollars":500,"category_limits":[{"category":"Food","limit_dollars":100}]}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &app,
            "POST",
            "/transactions",
            r#"{"kind":"expense","amount_dollars":120,"category":"Food","date":"2024-05-14"}"#,
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        for _ in 0..100 {
            if !alerts.feed.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let (_, notifications) = send(&app, "GET", "/alerts/notifications", "").await;
        assert_eq!(notifications[0]["message"], "Food budget exceeded by $20");
        assert_eq!(notifications[0]["severity"], "error");

        let (_, report) = send(&app, "GET", "/alerts?month=2024-05", "").await;
        assert_eq!(report["category_alerts"][0]["level"], "exceeded");
        assert_eq!(report["summary"]["critical_alerts"], 1);
    }
}
