use crate::models::{AddFundsRequest, CreateGoalRequest, Goal, GoalProgress, RawGoalRequest};
use crate::repository::GoalRepository;
use common::money;
use database::{Database, RepositoryError};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Goal not found")]
    NotFound,
}

impl From<RepositoryError> for GoalError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => GoalError::NotFound,
            RepositoryError::CheckViolation(msg) => GoalError::InvalidInput(msg),
            RepositoryError::Infrastructure(e) => GoalError::Infrastructure(e.to_string()),
            _ => GoalError::Infrastructure(err.to_string()),
        }
    }
}

pub struct GoalService;

impl GoalService {
    #[instrument(skip(db))]
    pub async fn create_goal(db: &Database, raw: RawGoalRequest) -> Result<Goal, GoalError> {
        let req = CreateGoalRequest::new(raw).map_err(GoalError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        let id = repo.create(&req).await?;

        uow.commit().await?;

        tracing::info!(id, title = %req.title, "Goal created");
        Ok(Goal {
            id,
            title: req.title,
            target_amount: req.target_amount,
            current_amount: req.current_amount,
            deadline: req.deadline,
            category: req.category,
        })
    }

    #[instrument(skip(db))]
    pub async fn update_goal(db: &Database, id: i64, raw: RawGoalRequest) -> Result<Goal, GoalError> {
        let req = CreateGoalRequest::new(raw).map_err(GoalError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        repo.update(id, &req).await?;
        let updated = repo.find_by_id(id).await?.ok_or(GoalError::NotFound)?;

        uow.commit().await?;
        Ok(updated)
    }

    #[instrument(skip(db))]
    pub async fn add_funds(db: &Database, id: i64, req: AddFundsRequest) -> Result<GoalProgress, GoalError> {
        let amount = req.cents().map_err(GoalError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        let existing = repo.find_by_id(id).await?.ok_or(GoalError::NotFound)?;
        if existing.current_amount.saturating_add(amount) > money::MAX_CENTS {
            return Err(GoalError::InvalidInput(format!(
                "Saved amount cannot exceed ${}",
                money::format_dollars(money::MAX_CENTS)
            )));
        }

        repo.add_funds(id, amount).await?;
        let goal = repo.find_by_id(id).await?.ok_or(GoalError::NotFound)?;

        uow.commit().await?;

        if goal.is_completed() {
            tracing::info!(id, title = %goal.title, "Goal reached");
        }
        Ok(goal.into())
    }

    #[instrument(skip(db))]
    pub async fn get_goal(db: &Database, id: i64) -> Result<GoalProgress, GoalError> {
        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        let goal = repo.find_by_id(id).await?.ok_or(GoalError::NotFound)?;

        Ok(goal.into())
    }

    #[instrument(skip(db))]
    pub async fn list_goals(db: &Database) -> Result<Vec<GoalProgress>, GoalError> {
        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        let goals = repo.list().await?;

        Ok(goals.into_iter().map(GoalProgress::from).collect())
    }

    #[instrument(skip(db))]
    pub async fn delete_goal(db: &Database, id: i64) -> Result<(), GoalError> {
        let mut uow = db.begin().await?;
        let mut repo = GoalRepository::new(uow.connection());

        repo.delete(id).await?;

        uow.commit().await?;
        Ok(())
    }
}
