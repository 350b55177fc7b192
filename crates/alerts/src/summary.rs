use crate::classifier::BudgetAlert;
use crate::policy::AlertLevel;
use serde::{Deserialize, Serialize};

/// Dashboard counts for one month. `safe` is always zero because safe
/// alerts are never produced, but the key is kept for clients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSummary {
    pub safe: usize,
    pub warning: usize,
    pub critical: usize,
    pub exceeded: usize,
    pub total_alerts: usize,
    pub critical_alerts: usize,
}

pub fn summarize(category_alerts: &[BudgetAlert], total_alert: Option<&BudgetAlert>) -> AlertSummary {
    let mut summary = AlertSummary::default();

    for alert in category_alerts.iter().chain(total_alert) {
        match alert.level {
            AlertLevel::Safe => summary.safe += 1,
            AlertLevel::Warning => summary.warning += 1,
            AlertLevel::Critical => summary.critical += 1,
            AlertLevel::Exceeded => summary.exceeded += 1,
        }
    }

    summary.total_alerts = category_alerts.len() + usize::from(total_alert.is_some());
    summary.critical_alerts = summary.critical + summary.exceeded;
    summary
}
