use crate::models::{Category, CreateCategoryRequest};
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct CategoryRecord {
    id: i64,
    name: String,
    kind: String,
    color: String,
    icon: Option<String>,
}

impl TryFrom<CategoryRecord> for Category {
    type Error = RepositoryError;

    fn try_from(record: CategoryRecord) -> Result<Self, Self::Error> {
        Ok(Category {
            id: record.id,
            name: record.name,
            kind: record.kind.parse().map_err(RepositoryError::InvalidData)?,
            color: record.color,
            icon: record.icon,
        })
    }
}

const SELECT_CATEGORY: &str = "SELECT id, name, kind, color, icon FROM categories";

pub(crate) struct CategoryRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> CategoryRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, req: &CreateCategoryRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO categories (name, kind, color, icon) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(&req.name)
        .bind(req.kind.as_str())
        .bind(&req.color)
        .bind(req.icon.as_deref())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn list(&mut self) -> Result<Vec<Category>, RepositoryError> {
        let records = sqlx::query_as::<_, CategoryRecord>(&format!("{} ORDER BY name", SELECT_CATEGORY))
            .fetch_all(&mut *self.conn)
            .await?;

        records.into_iter().map(Category::try_from).collect()
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Option<Category>, RepositoryError> {
        let record = sqlx::query_as::<_, CategoryRecord>(&format!("{} WHERE id = $1", SELECT_CATEGORY))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        record.map(Category::try_from).transpose()
    }

    pub async fn update(&mut self, id: i64, req: &CreateCategoryRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE categories SET name = $1, kind = $2, color = $3, icon = $4 WHERE id = $5")
            .bind(&req.name)
            .bind(req.kind.as_str())
            .bind(&req.color)
            .bind(req.icon.as_deref())
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
