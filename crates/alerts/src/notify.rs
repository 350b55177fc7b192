use crate::policy::AlertLevel;
use crate::service::{AlertService, BudgetAlertReport};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::instrument;
use transactions::hooks::ExpenseHook;
use transactions::models::Transaction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Only Critical and Exceeded alerts are worth interrupting the user for.
    pub fn for_level(level: AlertLevel) -> Option<Self> {
        match level {
            AlertLevel::Exceeded => Some(Severity::Error),
            AlertLevel::Critical => Some(Severity::Warning),
            AlertLevel::Warning | AlertLevel::Safe => None,
        }
    }
}

/// Where notifications go. Fire-and-forget.
pub trait NotificationChannel: Send + Sync {
    fn emit(&self, message: &str, severity: Severity);
}

#[derive(Debug, Clone, Serialize)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub created_at: DateTime<Utc>,
}

/// Bounded in-memory inbox that clients poll. When full, the oldest
/// notification is dropped.
pub struct NotificationFeed {
    capacity: usize,
    queue: Mutex<VecDeque<Notification>>,
}

impl NotificationFeed {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    pub fn drain(&self) -> Vec<Notification> {
        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationChannel for NotificationFeed {
    fn emit(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Error => tracing::error!(target: "budget_alerts", "{}", message),
            Severity::Warning => tracing::warn!(target: "budget_alerts", "{}", message),
        }

        let mut queue = self.queue.lock().unwrap_or_else(|e| e.into_inner());
        if queue.len() >= self.capacity {
            queue.pop_front();
        }
        queue.push_back(Notification {
            message: message.to_string(),
            severity,
            created_at: Utc::now(),
        });
    }
}

/// Re-checks a month's budget after an expense write and notifies for
/// every Critical or Exceeded alert. There is no memory of what was sent
/// before, so an already-critical category is reported again on each write.
pub struct NotificationTrigger {
    alerts: Arc<AlertService>,
    channel: Arc<dyn NotificationChannel>,
}

impl NotificationTrigger {
    pub fn new(alerts: Arc<AlertService>, channel: Arc<dyn NotificationChannel>) -> Self {
        Self { alerts, channel }
    }

    #[instrument(skip(self, transaction), fields(id = transaction.id, date = %transaction.date))]
    pub async fn on_expense_recorded(&self, transaction: &Transaction) {
        if !transaction.is_expense() {
            return;
        }

        let month = transaction.month();
        match self.alerts.compute(month).await {
            Ok(report) => {
                let sent = self.notify(&report);
                tracing::debug!(%month, sent, "Budget alerts checked");
            }
            Err(e) => {
                tracing::error!(%month, "Error triggering alert notifications: {}", e);
            }
        }
    }

    fn notify(&self, report: &BudgetAlertReport) -> usize {
        let mut sent = 0;
        for alert in report.category_alerts.iter().chain(report.total_alert.as_ref()) {
            if let Some(severity) = Severity::for_level(alert.level) {
                self.channel.emit(&alert.message, severity);
                sent += 1;
            }
        }
        sent
    }
}

/// Runs the trigger on a background task after a short delay so the write
/// that caused it returns first.
pub struct ScheduledTrigger {
    trigger: Arc<NotificationTrigger>,
    delay: Duration,
}

impl ScheduledTrigger {
    pub fn new(trigger: Arc<NotificationTrigger>, delay: Duration) -> Self {
        Self { trigger, delay }
    }
}

impl ExpenseHook for ScheduledTrigger {
    fn expense_recorded(&self, transaction: &Transaction) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(id = transaction.id, "No async runtime, skipping budget alert check");
            return;
        };

        let trigger = Arc::clone(&self.trigger);
        let transaction = transaction.clone();
        let delay = self.delay;

        runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            trigger.on_expense_recorded(&transaction).await;
        });
    }
}
