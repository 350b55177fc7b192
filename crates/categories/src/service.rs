use crate::models::{Category, CreateCategoryRequest, RawCategoryRequest};
use crate::repository::CategoryRepository;
use database::{Database, RepositoryError};
use rand::seq::SliceRandom;
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Database error: {0}")]
    Infrastructure(String),
    #[error("Category already exists: {0}")]
    Conflict(String),
    #[error("Category not found")]
    NotFound,
}

impl From<RepositoryError> for CategoryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => CategoryError::NotFound,
            RepositoryError::UniqueViolation(msg) => CategoryError::Conflict(msg),
            RepositoryError::CheckViolation(msg) => CategoryError::InvalidInput(msg),
            RepositoryError::Infrastructure(e) => CategoryError::Infrastructure(e.to_string()),
            _ => CategoryError::Infrastructure(err.to_string()),
        }
    }
}

const PASTEL_COLORS: [&str; 20] = [
    "#FFB3BA", "#FFDFBA", "#FFFFBA", "#BAFFC9", "#BAE1FF",
    "#E2F0CB", "#FDFD96", "#FFC3A0", "#FFD1DC", "#D4F0F0",
    "#CCE2CB", "#B6CFB6", "#97C1A9", "#FCB7AF", "#FFDAC1",
    "#E7FFAC", "#FFABAB", "#D5AAFF", "#85E3FF", "#B9F6CA",
];

pub struct CategoryService;

impl CategoryService {
    fn random_pastel_color() -> String {
        let mut rng = rand::thread_rng();
        PASTEL_COLORS.choose(&mut rng).unwrap_or(&"#FFFFFF").to_string()
    }

    #[instrument(skip(db))]
    pub async fn create_category(
        db: &Database,
        raw: RawCategoryRequest,
    ) -> Result<Category, CategoryError> {
        let req = CreateCategoryRequest::new(raw, Self::random_pastel_color())
            .map_err(CategoryError::InvalidInput)?;

        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        let id = repo.create(&req).await?;

        uow.commit().await?;

        tracing::info!(id, name = %req.name, "Category created");
        Ok(Category {
            id,
            name: req.name,
            kind: req.kind,
            color: req.color,
            icon: req.icon,
        })
    }

    /// Renaming a category does not rewrite transactions or budget limits
    /// that refer to the old name.
    #[instrument(skip(db))]
    pub async fn update_category(
        db: &Database,
        id: i64,
        raw: RawCategoryRequest,
    ) -> Result<Category, CategoryError> {
        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        let existing = repo.find_by_id(id).await?.ok_or(CategoryError::NotFound)?;
        let req = CreateCategoryRequest::new(raw, existing.color)
            .map_err(CategoryError::InvalidInput)?;

        repo.update(id, &req).await?;
        let updated = repo.find_by_id(id).await?.ok_or(CategoryError::NotFound)?;

        uow.commit().await?;
        Ok(updated)
    }

    #[instrument(skip(db))]
    pub async fn delete_category(db: &Database, id: i64) -> Result<(), CategoryError> {
        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        repo.delete(id).await?;

        uow.commit().await?;
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn list_categories(db: &Database) -> Result<Vec<Category>, CategoryError> {
        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        let categories = repo.list().await?;

        Ok(categories)
    }

    #[instrument(skip(db))]
    pub async fn get_category(db: &Database, id: i64) -> Result<Category, CategoryError> {
        let mut uow = db.begin().await?;
        let mut repo = CategoryRepository::new(uow.connection());

        let category = repo.find_by_id(id).await?
            .ok_or(CategoryError::NotFound)?;

        Ok(category)
    }
}
