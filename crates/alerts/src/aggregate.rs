use common::MonthKey;
use std::collections::HashMap;
use transactions::models::Transaction;

/// Expense totals for one month, in cents.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct SpendAggregate {
    pub per_category: HashMap<String, i64>,
    pub total: i64,
}

impl SpendAggregate {
    pub fn spent_on(&self, category: &str) -> i64 {
        self.per_category.get(category).copied().unwrap_or(0)
    }
}

/// Sums expenses dated inside `month` (both ends inclusive), grouped by the
/// exact category string. Income never counts toward a budget.
pub fn aggregate(transactions: &[Transaction], month: MonthKey) -> SpendAggregate {
    transactions
        .iter()
        .filter(|t| t.is_expense() && month.contains(t.date))
        .fold(SpendAggregate::default(), |mut acc, t| {
            let spent = acc.per_category.entry(t.category.clone()).or_insert(0);
            *spent = spent.saturating_add(t.amount);
            acc.total = acc.total.saturating_add(t.amount);
            acc
        })
}
