use crate::notify::{NotificationChannel, Severity};
use crate::store::{BudgetStore, StoreError, TransactionStore};
use async_trait::async_trait;
use budgets::models::{Budget, CategoryLimit};
use chrono::NaiveDate;
use common::EntryKind;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use transactions::models::Transaction;

static NEXT_ID: AtomicI64 = AtomicI64::new(1);

fn transaction(kind: EntryKind, category: &str, amount: i64, date: &str) -> Transaction {
    Transaction {
        id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        kind,
        amount,
        category: category.to_string(),
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        description: None,
    }
}

pub fn expense(category: &str, amount: i64, date: &str) -> Transaction {
    transaction(EntryKind::Expense, category, amount, date)
}

pub fn income(category: &str, amount: i64, date: &str) -> Transaction {
    transaction(EntryKind::Income, category, amount, date)
}

pub fn budget(month: &str, total_limit: i64, limits: &[(&str, i64)]) -> Budget {
    let month: common::MonthKey = month.parse().unwrap();
    Budget {
        id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
        month,
        year: month.year(),
        total_limit,
        category_limits: limits
            .iter()
            .map(|(category, limit)| CategoryLimit {
                category: category.to_string(),
                limit: *limit,
            })
            .collect(),
    }
}

/// Vec-backed store; only implements the required trait methods so the
/// default month filtering is exercised.
pub struct MemoryStore {
    transactions: Vec<Transaction>,
    budgets: Vec<Budget>,
    fail: bool,
}

impl MemoryStore {
    pub fn new(transactions: Vec<Transaction>, budgets: Vec<Budget>) -> Self {
        Self { transactions, budgets, fail: false }
    }

    pub fn failing() -> Self {
        Self { transactions: vec![], budgets: vec![], fail: true }
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        if self.fail {
            return Err(StoreError::Transactions("connection refused".into()));
        }
        Ok(self.transactions.clone())
    }
}

#[async_trait]
impl BudgetStore for MemoryStore {
    async fn all_budgets(&self) -> Result<Vec<Budget>, StoreError> {
        if self.fail {
            return Err(StoreError::Budgets("connection refused".into()));
        }
        Ok(self.budgets.clone())
    }
}

#[derive(Default)]
pub struct RecordingChannel {
    pub emitted: Mutex<Vec<(String, Severity)>>,
}

impl RecordingChannel {
    pub fn take(&self) -> Vec<(String, Severity)> {
        std::mem::take(&mut *self.emitted.lock().unwrap())
    }
}

impl NotificationChannel for RecordingChannel {
    fn emit(&self, message: &str, severity: Severity) {
        self.emitted.lock().unwrap().push((message.to_string(), severity));
    }
}
