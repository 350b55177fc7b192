use crate::aggregate::SpendAggregate;
use crate::policy::{self, AlertLevel};
use budgets::models::Budget;
use serde::{Deserialize, Serialize};

pub const TOTAL_CATEGORY: &str = "Total";

/// One category (or the whole month) that has crossed the warning line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub category: String,
    pub budget_limit: i64,
    pub spent: i64,
    pub percentage: f64,
    pub level: AlertLevel,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlerts {
    pub category_alerts: Vec<BudgetAlert>,
    pub total_alert: Option<BudgetAlert>,
}

/// `None` for Safe spending and for limits that cannot be divided by.
fn build_alert(category: &str, limit: i64, spent: i64) -> Option<BudgetAlert> {
    let percentage = policy::percentage(spent, limit)?;
    let level = policy::classify(percentage);
    let message = policy::alert_message(level, category, spent, limit)?;

    Some(BudgetAlert {
        category: category.to_string(),
        budget_limit: limit,
        spent,
        percentage,
        level,
        message,
    })
}

/// Applies the threshold policy to every positive category limit of the
/// budget and to its total. Output keeps the budget's category order.
pub fn classify_budget(budget: Option<&Budget>, spend: &SpendAggregate) -> BudgetAlerts {
    let Some(budget) = budget else {
        return BudgetAlerts::default();
    };

    let category_alerts = budget
        .category_limits
        .iter()
        .filter(|l| l.limit > 0)
        .filter_map(|l| build_alert(&l.category, l.limit, spend.spent_on(&l.category)))
        .collect();

    BudgetAlerts {
        category_alerts,
        total_alert: build_alert(TOTAL_CATEGORY, budget.total_limit, spend.total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::testing::{budget, expense};

    fn spend(entries: &[(&str, i64)]) -> SpendAggregate {
        let mut agg = SpendAggregate::default();
        for (category, amount) in entries {
            agg.per_category.insert(category.to_string(), *amount);
            agg.total += amount;
        }
        agg
    }

    #[test]
    fn test_no_budget_is_neutral() {
        let alerts = classify_budget(None, &spend(&[("Food", 99999)]));
        assert!(alerts.category_alerts.is_empty());
        assert!(alerts.total_alert.is_none());
    }

    #[test]
    fn test_zero_limit_is_excluded() {
        let b = budget("2024-03", 100000, &[("Food", 0)]);
        let alerts = classify_budget(Some(&b), &spend(&[("Food", 50000)]));
        assert!(alerts.category_alerts.iter().all(|a| a.category != "Food"));
    }

    #[test]
    fn test_zero_total_limit_has_no_total_alert() {
        let b = budget("2024-03", 0, &[("Food", 1000)]);
        let alerts = classify_budget(Some(&b), &spend(&[("Food", 5000)]));
        assert!(alerts.total_alert.is_none());
        assert_eq!(alerts.category_alerts.len(), 1);
        assert!(alerts.category_alerts[0].percentage.is_finite());
    }

    #[test]
    fn test_safe_categories_are_dropped_and_order_is_kept() {
        let b = budget(
            "2024-03",
            1000000,
            &[("Transport", 10000), ("Fun", 10000), ("Food", 10000)],
        );
        let alerts = classify_budget(
            Some(&b),
            &spend(&[("Food", 12000), ("Fun", 1000), ("Transport", 8500)]),
        );

        let got: Vec<(&str, AlertLevel)> = alerts
            .category_alerts
            .iter()
            .map(|a| (a.category.as_str(), a.level))
            .collect();
        assert_eq!(
            got,
            vec![("Transport", AlertLevel::Warning), ("Food", AlertLevel::Exceeded)]
        );
        assert!(alerts.total_alert.is_none());
    }

    #[test]
    fn test_unseen_category_counts_as_zero() {
        let b = budget("2024-03", 100, &[("Travel", 5000)]);
        let alerts = classify_budget(Some(&b), &spend(&[]));
        assert!(alerts.category_alerts.is_empty());
    }

    #[test]
    fn test_total_alert() {
        let b = budget("2024-03", 100000, &[]);
        let alerts = classify_budget(Some(&b), &spend(&[("Food", 60000), ("Rent", 35000)]));

        let total = alerts.total_alert.unwrap();
        assert_eq!(total.category, TOTAL_CATEGORY);
        assert_eq!(total.level, AlertLevel::Critical);
        assert_eq!(total.spent, 95000);
        assert_eq!(total.message, "Total budget at 95% - Only $50 remaining");
    }

    #[test]
    fn test_classify_from_transactions() {
        let b = budget("2024-03", 20000, &[("Food", 10000)]);
        let transactions = vec![
            expense("Food", 5000, "2024-03-05"),
            expense("Food", 4000, "2024-03-20"),
            expense("Food", 9000, "2024-02-20"),
        ];

        let alerts = classify_budget(Some(&b), &aggregate(&transactions, b.month));
        assert_eq!(alerts.category_alerts.len(), 1);
        assert_eq!(alerts.category_alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts.category_alerts[0].percentage, 90.0);
        assert!(alerts.total_alert.is_none());
    }

    #[test]
    fn test_classify_is_idempotent() {
        let b = budget("2024-03", 10000, &[("Food", 5000)]);
        let agg = spend(&[("Food", 4600)]);
        assert_eq!(classify_budget(Some(&b), &agg), classify_budget(Some(&b), &agg));
    }
}
