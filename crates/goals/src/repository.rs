use crate::models::{CreateGoalRequest, Goal};
use chrono::NaiveDate;
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct GoalRecord {
    id: i64,
    title: String,
    target_amount: i64,
    current_amount: i64,
    deadline: Option<NaiveDate>,
    category: Option<String>,
}

impl From<GoalRecord> for Goal {
    fn from(record: GoalRecord) -> Self {
        Goal {
            id: record.id,
            title: record.title,
            target_amount: record.target_amount,
            current_amount: record.current_amount,
            deadline: record.deadline,
            category: record.category,
        }
    }
}

const SELECT_GOAL: &str =
    "SELECT id, title, target_amount, current_amount, deadline, category FROM goals";

pub(crate) struct GoalRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> GoalRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, req: &CreateGoalRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO goals (title, target_amount, current_amount, deadline, category)
             VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(&req.title)
        .bind(req.target_amount)
        .bind(req.current_amount)
        .bind(req.deadline)
        .bind(req.category.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    /// Nearest deadline first; goals without one go last.
    pub async fn list(&mut self) -> Result<Vec<Goal>, RepositoryError> {
        let records = sqlx::query_as::<_, GoalRecord>(&format!(
            "{} ORDER BY deadline IS NULL, deadline, id",
            SELECT_GOAL
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        Ok(records.into_iter().map(Goal::from).collect())
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Option<Goal>, RepositoryError> {
        let record = sqlx::query_as::<_, GoalRecord>(&format!("{} WHERE id = $1", SELECT_GOAL))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        Ok(record.map(Goal::from))
    }

    pub async fn update(&mut self, id: i64, req: &CreateGoalRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE goals SET title = $1, target_amount = $2, current_amount = $3, deadline = $4, category = $5
             WHERE id = $6",
        )
        .bind(&req.title)
        .bind(req.target_amount)
        .bind(req.current_amount)
        .bind(req.deadline)
        .bind(req.category.as_deref())
        .bind(id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn add_funds(&mut self, id: i64, amount: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE goals SET current_amount = current_amount + $1 WHERE id = $2")
            .bind(amount)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM goals WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::get_test_db;

    fn request(title: &str, target: i64, deadline: Option<&str>) -> CreateGoalRequest {
        CreateGoalRequest {
            title: title.to_string(),
            target_amount: target,
            current_amount: 0,
            deadline: deadline.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            category: None,
        }
    }

    #[tokio::test]
    async fn test_create_find_and_fund() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = GoalRepository::new(uow.connection());

        let id = repo.create(&request("Car", 500000, Some("2025-12-31"))).await.unwrap();
        repo.add_funds(id, 12500).await.unwrap();
        repo.add_funds(id, 2500).await.unwrap();

        let goal = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(goal.title, "Car");
        assert_eq!(goal.current_amount, 15000);
        assert_eq!(goal.deadline, NaiveDate::from_ymd_opt(2025, 12, 31));
    }

    #[tokio::test]
    async fn test_list_orders_by_deadline() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = GoalRepository::new(uow.connection());

        repo.create(&request("Someday", 100, None)).await.unwrap();
        repo.create(&request("Later", 100, Some("2026-01-01"))).await.unwrap();
        repo.create(&request("Soon", 100, Some("2025-01-01"))).await.unwrap();

        let titles: Vec<String> = repo.list().await.unwrap().into_iter().map(|g| g.title).collect();
        assert_eq!(titles, vec!["Soon", "Later", "Someday"]);
    }

    #[tokio::test]
    async fn test_zero_target_is_check_violation() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = GoalRepository::new(uow.connection());

        let err = repo.create(&request("Nothing", 0, None)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::CheckViolation(_)));
    }

    #[tokio::test]
    async fn test_missing_goal() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = GoalRepository::new(uow.connection());

        assert!(matches!(repo.add_funds(7, 100).await, Err(RepositoryError::NotFound)));
        assert!(matches!(repo.delete(7).await, Err(RepositoryError::NotFound)));
    }
}
