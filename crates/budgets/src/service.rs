use crate::models::{Budget, CreateBudgetRequest, RawBudgetRequest};
use crate::repository::BudgetRepository;
use common::MonthKey;
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum BudgetError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Budget already exists: {0}")]
    Conflict(String),
    #[error("Budget not found")]
    NotFound,
}

impl From<RepositoryError> for BudgetError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => BudgetError::NotFound,
            RepositoryError::UniqueViolation(msg) => BudgetError::Conflict(msg),
            RepositoryError::CheckViolation(msg) => BudgetError::InvalidInput(msg),
            RepositoryError::Infrastructure(e) => BudgetError::Infrastructure(e.to_string()),
            _ => BudgetError::Infrastructure(err.to_string()),
        }
    }
}

pub struct BudgetService;

impl BudgetService {
    #[instrument(skip(db))]
    pub async fn create_budget(db: &Database, raw: RawBudgetRequest) -> Result<Budget, BudgetError> {
        let req = CreateBudgetRequest::new(raw).map_err(BudgetError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = BudgetRepository::new(uow.connection());

        let id = repo.create(&req).await?;
        let budget = repo.find_by_id(id).await?.ok_or(BudgetError::NotFound)?;

        uow.commit().await?;

        tracing::info!(id, month = %budget.month, "Budget created");
        Ok(budget)
    }

    #[instrument(skip(db))]
    pub async fn update_budget(db: &Database, id: i64, raw: RawBudgetRequest) -> Result<Budget, BudgetError> {
        let req = CreateBudgetRequest::new(raw).map_err(BudgetError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = BudgetRepository::new(uow.connection());

        repo.update(id, &req).await?;
        let budget = repo.find_by_id(id).await?.ok_or(BudgetError::NotFound)?;

        uow.commit().await?;
        Ok(budget)
    }

    #[instrument(skip(db))]
    pub async fn get_budget(db: &Database, id: i64) -> Result<Budget, BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = BudgetRepository::new(uow.connection());

        let budget = repo.find_by_id(id).await?
            .ok_or(BudgetError::NotFound)?;

        Ok(budget)
    }

    #[instrument(skip(db))]
    pub async fn list_budgets(db: &Database) -> Result<Vec<Budget>, BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = BudgetRepository::new(uow.connection());

        Ok(repo.list().await?)
    }

    /// `None` is the "no budget configured" state, not an error.
    #[instrument(skip(db))]
    pub async fn find_for_month(db: &Database, month: MonthKey) -> Result<Option<Budget>, BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = BudgetRepository::new(uow.connection());

        Ok(repo.find_by_month(month).await?)
    }

    #[instrument(skip(db))]
    pub async fn delete_budget(db: &Database, id: i64) -> Result<(), BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = BudgetRepository::new(uow.connection());

        repo.delete(id).await?;

        uow.commit().await?;
        Ok(())
    }

    /// Carries a month's budget forward. Returns the new budget, or `None`
    /// when the target already has one or the source has nothing to copy.
    #[instrument(skip(db))]
    pub async fn copy_budget(
        db: &Database,
        source_month: MonthKey,
        target_month: MonthKey,
    ) -> Result<Option<Budget>, BudgetError> {
        let mut uow = db.begin().await?;
        let mut repo = BudgetRepository::new(uow.connection());

        let copied = match repo.copy_budget(source_month, target_month).await? {
            Some(id) => repo.find_by_id(id).await?,
            None => None,
        };

        uow.commit().await?;

        if copied.is_some() {
            tracing::info!(%source_month, %target_month, "Budget copied");
        }
        Ok(copied)
    }
}
