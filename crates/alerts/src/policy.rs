use common::money::format_dollars;
use serde::{Deserialize, Serialize};

pub const WARNING_THRESHOLD: f64 = 80.0;
pub const CRITICAL_THRESHOLD: f64 = 90.0;
pub const EXCEEDED_THRESHOLD: f64 = 100.0;

/// Severity of a spend-to-limit ratio, ordered from harmless to over budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Safe,
    Warning,
    Critical,
    Exceeded,
}

/// Each tier includes its lower bound: exactly 90.0 is Critical.
pub fn classify(percentage: f64) -> AlertLevel {
    if percentage >= EXCEEDED_THRESHOLD {
        AlertLevel::Exceeded
    } else if percentage >= CRITICAL_THRESHOLD {
        AlertLevel::Critical
    } else if percentage >= WARNING_THRESHOLD {
        AlertLevel::Warning
    } else {
        AlertLevel::Safe
    }
}

/// `spent / limit * 100`, or `None` when the limit cannot be divided by.
pub fn percentage(spent: i64, limit: i64) -> Option<f64> {
    if limit <= 0 {
        return None;
    }
    Some(spent as f64 / limit as f64 * 100.0)
}

/// User-facing text for an alert. Safe levels have nothing to say.
pub fn alert_message(level: AlertLevel, category: &str, spent: i64, limit: i64) -> Option<String> {
    let rounded = percentage(spent, limit)?.round() as i64;

    match level {
        AlertLevel::Exceeded => Some(format!(
            "{} budget exceeded by ${}",
            category,
            format_dollars(spent - limit)
        )),
        AlertLevel::Critical => Some(format!(
            "{} budget at {}% - Only ${} remaining",
            category,
            rounded,
            format_dollars(limit - spent)
        )),
        AlertLevel::Warning => Some(format!(
            "{} budget at {}% - ${} remaining",
            category,
            rounded,
            format_dollars(limit - spent)
        )),
        AlertLevel::Safe => None,
    }
}
