use crate::models::{Budget, CategoryLimit, CreateBudgetRequest};
use common::MonthKey;
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct BudgetRecord {
    id: i64,
    month: String,
    year: i64,
    total_limit: i64,
}

#[derive(FromRow)]
struct CategoryLimitRecord {
    budget_id: i64,
    category: String,
    limit_amount: i64,
}

impl BudgetRecord {
    fn into_budget(self, limits: &[CategoryLimitRecord]) -> Result<Budget, RepositoryError> {
        let month: MonthKey = self
            .month
            .parse()
            .map_err(|e: common::MonthKeyError| RepositoryError::InvalidData(e.to_string()))?;

        Ok(Budget {
            id: self.id,
            month,
            year: self.year as i32,
            total_limit: self.total_limit,
            category_limits: limits
                .iter()
                .filter(|l| l.budget_id == self.id)
                .map(|l| CategoryLimit {
                    category: l.category.clone(),
                    limit: l.limit_amount,
                })
                .collect(),
        })
    }
}

const SELECT_BUDGET: &str = "SELECT id, month, year, total_limit FROM budgets";

pub(crate) struct BudgetRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> BudgetRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, req: &CreateBudgetRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO budgets (month, year, total_limit) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(req.month.to_string())
        .bind(req.month.year())
        .bind(req.total_limit)
        .fetch_one(&mut *self.conn)
        .await?;

        self.insert_limits(id, &req.category_limits).await?;
        Ok(id)
    }

    async fn insert_limits(&mut self, budget_id: i64, limits: &[CategoryLimit]) -> Result<(), RepositoryError> {
        for (position, limit) in limits.iter().enumerate() {
            sqlx::query(
                "INSERT INTO budget_category_limits (budget_id, position, category, limit_amount) VALUES ($1, $2, $3, $4)",
            )
            .bind(budget_id)
            .bind(position as i64)
            .bind(&limit.category)
            .bind(limit.limit)
            .execute(&mut *self.conn)
            .await?;
        }
        Ok(())
    }

    async fn limits_for(&mut self, budget_id: Option<i64>) -> Result<Vec<CategoryLimitRecord>, RepositoryError> {
        let records = match budget_id {
            Some(id) => {
                sqlx::query_as::<_, CategoryLimitRecord>(
                    "SELECT budget_id, category, limit_amount FROM budget_category_limits WHERE budget_id = $1 ORDER BY position",
                )
                .bind(id)
                .fetch_all(&mut *self.conn)
                .await?
            }
            None => {
                sqlx::query_as::<_, CategoryLimitRecord>(
                    "SELECT budget_id, category, limit_amount FROM budget_category_limits ORDER BY budget_id, position",
                )
                .fetch_all(&mut *self.conn)
                .await?
            }
        };
        Ok(records)
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Option<Budget>, RepositoryError> {
        let record = sqlx::query_as::<_, BudgetRecord>(&format!("{} WHERE id = $1", SELECT_BUDGET))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        match record {
            Some(record) => {
                let limits = self.limits_for(Some(record.id)).await?;
                record.into_budget(&limits).map(Some)
            }
            None => Ok(None),
        }
    }

    pub async fn find_by_month(&mut self, month: MonthKey) -> Result<Option<Budget>, RepositoryError> {
        let record = sqlx::query_as::<_, BudgetRecord>(&format!("{} WHERE month = $1 ORDER BY id LIMIT 1", SELECT_BUDGET))
            .bind(month.to_string())
            .fetch_optional(&mut *self.conn)
            .await?;

        match record {
            Some(record) => {
                let limits = self.limits_for(Some(record.id)).await?;
                record.into_budget(&limits).map(Some)
            }
            None => Ok(None),
        }
    }

    /// All budgets in id order, each with its limits in entry order.
    pub async fn list(&mut self) -> Result<Vec<Budget>, RepositoryError> {
        let records = sqlx::query_as::<_, BudgetRecord>(&format!("{} ORDER BY id", SELECT_BUDGET))
            .fetch_all(&mut *self.conn)
            .await?;
        let limits = self.limits_for(None).await?;

        records.into_iter().map(|r| r.into_budget(&limits)).collect()
    }

    pub async fn update(&mut self, id: i64, req: &CreateBudgetRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE budgets SET month = $1, year = $2, total_limit = $3 WHERE id = $4")
            .bind(req.month.to_string())
            .bind(req.month.year())
            .bind(req.total_limit)
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        sqlx::query("DELETE FROM budget_category_limits WHERE budget_id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;
        self.insert_limits(id, &req.category_limits).await
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM budget_category_limits WHERE budget_id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        let result = sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    // Copies source_month's budget into target_month ONLY if target_month has none yet.
    pub async fn copy_budget(&mut self, source_month: MonthKey, target_month: MonthKey) -> Result<Option<i64>, RepositoryError> {
        if self.find_by_month(target_month).await?.is_some() {
            return Ok(None);
        }

        let Some(source) = self.find_by_month(source_month).await? else {
            return Ok(None);
        };

        let req = CreateBudgetRequest {
            month: target_month,
            total_limit: source.total_limit,
            category_limits: source.category_limits,
        };
        self.create(&req).await.map(Some)
    }
}
