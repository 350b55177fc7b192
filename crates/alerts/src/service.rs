use crate::aggregate::aggregate;
use crate::classifier::{BudgetAlert, classify_budget};
use crate::store::{BudgetStore, StoreError, TransactionStore};
use crate::summary::{AlertSummary, summarize};
use common::MonthKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlertReport {
    pub month: MonthKey,
    pub category_alerts: Vec<BudgetAlert>,
    pub total_alert: Option<BudgetAlert>,
    pub summary: AlertSummary,
}

impl BudgetAlertReport {
    /// What the dashboard shows when there is no budget or nothing could be read.
    pub fn empty(month: MonthKey) -> Self {
        Self {
            month,
            category_alerts: Vec::new(),
            total_alert: None,
            summary: AlertSummary::default(),
        }
    }
}

/// Reads the stores on every call; nothing is cached between queries.
pub struct AlertService {
    transactions: Arc<dyn TransactionStore>,
    budgets: Arc<dyn BudgetStore>,
}

impl AlertService {
    pub fn new(transactions: Arc<dyn TransactionStore>, budgets: Arc<dyn BudgetStore>) -> Self {
        Self { transactions, budgets }
    }

    /// Aggregate, classify and summarize one month. Store failures surface
    /// here; the public queries below absorb them.
    #[instrument(skip(self))]
    pub async fn compute(&self, month: MonthKey) -> Result<BudgetAlertReport, StoreError> {
        let (budget, transactions) = tokio::try_join!(
            self.budgets.budget_for_month(month),
            self.transactions.transactions_in_month(month),
        )?;

        let Some(budget) = budget else {
            tracing::debug!(%month, "No budget configured");
            return Ok(BudgetAlertReport::empty(month));
        };

        let spend = aggregate(&transactions, month);
        let alerts = classify_budget(Some(&budget), &spend);
        let summary = summarize(&alerts.category_alerts, alerts.total_alert.as_ref());

        Ok(BudgetAlertReport {
            month,
            category_alerts: alerts.category_alerts,
            total_alert: alerts.total_alert,
            summary,
        })
    }

    /// Defaults to the current month. Never fails: a broken store yields an
    /// empty report so the dashboard renders zero alerts.
    pub async fn calculate_budget_alerts(&self, month: Option<MonthKey>) -> BudgetAlertReport {
        let month = month.unwrap_or_else(MonthKey::current);
        match self.compute(month).await {
            Ok(report) => report,
            Err(e) => {
                tracing::error!(%month, "Error calculating budget alerts: {}", e);
                BudgetAlertReport::empty(month)
            }
        }
    }

    pub async fn get_alert_summary(&self, month: Option<MonthKey>) -> AlertSummary {
        self.calculate_budget_alerts(month).await.summary
    }
}
