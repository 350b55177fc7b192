use async_trait::async_trait;
use budgets::models::Budget;
use budgets::service::{BudgetError, BudgetService};
use common::MonthKey;
use database::Database;
use transactions::models::Transaction;
use transactions::service::{TransactionError, TransactionService};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Transaction store unavailable: {0}")]
    Transactions(String),
    #[error("Budget store unavailable: {0}")]
    Budgets(String),
}

impl From<TransactionError> for StoreError {
    fn from(err: TransactionError) -> Self {
        StoreError::Transactions(err.to_string())
    }
}

impl From<BudgetError> for StoreError {
    fn from(err: BudgetError) -> Self {
        StoreError::Budgets(err.to_string())
    }
}

/// Read side of the transaction records. The alert engine always re-filters
/// by month, so a store is free to return more than was asked for.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError>;

    async fn transactions_in_month(&self, _month: MonthKey) -> Result<Vec<Transaction>, StoreError> {
        self.all_transactions().await
    }
}

#[async_trait]
pub trait BudgetStore: Send + Sync {
    async fn all_budgets(&self) -> Result<Vec<Budget>, StoreError>;

    /// The first stored budget for `month`, if any.
    async fn budget_for_month(&self, month: MonthKey) -> Result<Option<Budget>, StoreError> {
        Ok(self.all_budgets().await?.into_iter().find(|b| b.month == month))
    }
}

#[async_trait]
impl TransactionStore for Database {
    async fn all_transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(TransactionService::list_transactions(self).await?)
    }

    async fn transactions_in_month(&self, month: MonthKey) -> Result<Vec<Transaction>, StoreError> {
        Ok(TransactionService::list_by_month(self, month).await?)
    }
}

#[async_trait]
impl BudgetStore for Database {
    async fn all_budgets(&self) -> Result<Vec<Budget>, StoreError> {
        Ok(BudgetService::list_budgets(self).await?)
    }

    async fn budget_for_month(&self, month: MonthKey) -> Result<Option<Budget>, StoreError> {
        Ok(BudgetService::find_for_month(self, month).await?)
    }
}
