use chrono::NaiveDate;
use common::{EntryKind, MonthKey, money};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: i64,
    pub kind: EntryKind,
    pub amount: i64, // Cents, always positive
    pub category: String,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl Transaction {
    pub fn is_expense(&self) -> bool {
        self.kind == EntryKind::Expense
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.date)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct RawTransactionRequest {
    pub kind: EntryKind,
    #[validate(range(exclusive_min = 0.0, message = "Amount must be positive"))]
    pub amount_dollars: f64,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    pub date: String, // 'YYYY-MM-DD'
    pub description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CreateTransactionRequest {
    kind: EntryKind,
    amount: i64,
    category: String,
    date: NaiveDate,
    description: Option<String>,
}

impl CreateTransactionRequest {
    pub fn new(raw: RawTransactionRequest) -> Result<Self, String> {
        raw.validate().map_err(|e| e.to_string())?;

        let date = NaiveDate::parse_from_str(raw.date.trim(), "%Y-%m-%d")
            .map_err(|_| "Invalid date format, expected YYYY-MM-DD".to_string())?;

        let category = raw.category.trim().to_string();
        if category.is_empty() {
            return Err("Category is required".to_string());
        }

        let amount = money::to_cents(raw.amount_dollars)?;
        if amount <= 0 {
            return Err("Amount must be at least one cent".to_string());
        }

        Ok(Self {
            kind: raw.kind,
            amount,
            category,
            date,
            description: raw.description.filter(|d| !d.trim().is_empty()),
        })
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct MonthlySummary {
    pub month: MonthKey,
    pub total_income: i64,
    pub total_expenses: i64,
    pub net: i64,
}

impl MonthlySummary {
    pub fn from_transactions(month: MonthKey, transactions: &[Transaction]) -> Self {
        let mut total_income: i64 = 0;
        let mut total_expenses: i64 = 0;

        for t in transactions.iter().filter(|t| month.contains(t.date)) {
            match t.kind {
                EntryKind::Income => total_income = total_income.saturating_add(t.amount),
                EntryKind::Expense => total_expenses = total_expenses.saturating_add(t.amount),
            }
        }

        Self {
            month,
            total_income,
            total_expenses,
            net: total_income.saturating_sub(total_expenses),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(kind: EntryKind, amount: f64, date: &str) -> RawTransactionRequest {
        RawTransactionRequest {
            kind,
            amount_dollars: amount,
            category: " Food ".into(),
            date: date.into(),
            description: Some("   ".into()),
        }
    }

    #[test]
    fn test_create_transaction_request_expense() {
        let req = CreateTransactionRequest::new(raw(EntryKind::Expense, 45.50, "2023-10-27")).unwrap();
        assert_eq!(req.amount(), 4550);
        assert_eq!(req.category(), "Food");
        assert_eq!(req.description(), None);
    }

    #[test]
    fn test_create_transaction_request_rejects_bad_input() {
        assert!(CreateTransactionRequest::new(raw(EntryKind::Income, 0.0, "2023-10-27")).is_err());
        assert!(CreateTransactionRequest::new(raw(EntryKind::Income, -5.0, "2023-10-27")).is_err());
        assert!(CreateTransactionRequest::new(raw(EntryKind::Income, 10.0, "27/10/2023")).is_err());
        assert!(CreateTransactionRequest::new(raw(EntryKind::Income, 0.001, "2023-10-27")).is_err());
    }

    #[test]
    fn test_create_transaction_request_rejects_huge_amount() {
        let err = CreateTransactionRequest::new(raw(EntryKind::Expense, 1e17, "2023-10-27")).unwrap_err();
        assert!(err.contains("1,000,000,000,000"));
        assert!(CreateTransactionRequest::new(raw(EntryKind::Expense, f64::INFINITY, "2023-10-27")).is_err());
    }

    fn transaction(id: i64, kind: EntryKind, amount: i64, date: &str) -> Transaction {
        Transaction {
            id,
            kind,
            amount,
            category: "Any".into(),
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_monthly_summary() {
        let transactions = vec![
            transaction(1, EntryKind::Income, 300000, "2024-03-01"),
            transaction(2, EntryKind::Expense, 12000, "2024-03-15"),
            transaction(3, EntryKind::Expense, 5000, "2024-04-01"),
        ];

        let summary = MonthlySummary::from_transactions("2024-03".parse().unwrap(), &transactions);
        assert_eq!(summary.total_income, 300000);
        assert_eq!(summary.total_expenses, 12000);
        assert_eq!(summary.net, 288000);
    }

    #[test]
    fn test_monthly_summary_saturates() {
        let transactions = vec![
            transaction(1, EntryKind::Expense, i64::MAX, "2024-03-01"),
            transaction(2, EntryKind::Expense, i64::MAX, "2024-03-02"),
            transaction(3, EntryKind::Income, 100, "2024-03-03"),
        ];

        let summary = MonthlySummary::from_transactions("2024-03".parse().unwrap(), &transactions);
        assert_eq!(summary.total_expenses, i64::MAX);
        assert_eq!(summary.net, 100 - i64::MAX);
    }
}
