use crate::hooks::ExpenseHook;
use crate::models::{CreateTransactionRequest, MonthlySummary, RawTransactionRequest, Transaction};
use crate::repository::TransactionRepository;
use common::MonthKey;
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Transaction not found")]
    NotFound,
}

impl From<RepositoryError> for TransactionError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => TransactionError::NotFound,
            RepositoryError::CheckViolation(msg) => TransactionError::InvalidInput(msg),
            RepositoryError::Infrastructure(e) => TransactionError::Infrastructure(e.to_string()),
            _ => TransactionError::Infrastructure(err.to_string()),
        }
    }
}

pub struct TransactionService;

impl TransactionService {
    #[instrument(skip(db, hook))]
    pub async fn create_transaction(
        db: &Database,
        hook: &dyn ExpenseHook,
        raw: RawTransactionRequest,
    ) -> Result<Transaction, TransactionError> {
        let req = CreateTransactionRequest::new(raw).map_err(TransactionError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = TransactionRepository::new(uow.connection());

        let id = repo.create(&req).await?;
        let transaction = repo.find_by_id(id).await?
            .ok_or(TransactionError::NotFound)?;

        uow.commit().await?;

        tracing::info!(id, kind = %transaction.kind, amount = transaction.amount, "Transaction created");
        if transaction.is_expense() {
            hook.expense_recorded(&transaction);
        }

        Ok(transaction)
    }

    #[instrument(skip(db, hook))]
    pub async fn update_transaction(
        db: &Database,
        hook: &dyn ExpenseHook,
        id: i64,
        raw: RawTransactionRequest,
    ) -> Result<Transaction, TransactionError> {
        let req = CreateTransactionRequest::new(raw).map_err(TransactionError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = TransactionRepository::new(uow.connection());

        repo.update(id, &req).await?;

        let transaction = repo.find_by_id(id).await?
            .ok_or(TransactionError::NotFound)?;

        uow.commit().await?;

        if transaction.is_expense() {
            hook.expense_recorded(&transaction);
        }

        Ok(transaction)
    }

    #[instrument(skip(db))]
    pub async fn get_transaction(db: &Database, id: i64) -> Result<Transaction, TransactionError> {
        let mut uow = db.begin().await?;
        let mut repo = TransactionRepository::new(uow.connection());

        let transaction = repo.find_by_id(id).await?
            .ok_or(TransactionError::NotFound)?;

        Ok(transaction)
    }

    #[instrument(skip(db))]
    pub async fn list_transactions(db: &Database) -> Result<Vec<Transaction>, TransactionError> {
        let mut uow = db.begin().await?;
        let mut repo = TransactionRepository::new(uow.connection());

        Ok(repo.list().await?)
    }

    #[instrument(skip(db))]
    pub async fn list_by_month(db: &Database, month: MonthKey) -> Result<Vec<Transaction>, TransactionError> {
        let mut uow = db.begin().await?;
        let mut repo = TransactionRepository::new(uow.connection());

        Ok(repo.list_by_month(month).await?)
    }

    #[instrument(skip(db))]
    pub async fn get_month_summary(db: &Database, month: MonthKey) -> Result<MonthlySummary, TransactionError> {
        let transactions = Self::list_by_month(db, month).await?;
        Ok(MonthlySummary::from_transactions(month, &transactions))
    }

    #[instrument(skip(db))]
    pub async fn delete_transaction(db: &Database, id: i64) -> Result<(), TransactionError> {
        let mut uow = db.begin().await?;
        let mut repo = TransactionRepository::new(uow.connection());

        repo.delete(id).await?;

        uow.commit().await?;
        Ok(())
    }
}
