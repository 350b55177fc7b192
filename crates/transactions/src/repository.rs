use crate::models::{CreateTransactionRequest, Transaction};
use chrono::NaiveDate;
use common::MonthKey;
use database::{self, RepositoryError};
use sqlx::FromRow;

#[derive(FromRow)]
struct TransactionRecord {
    id: i64,
    kind: String,
    amount: i64,
    category: String,
    transaction_date: NaiveDate,
    description: Option<String>,
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = RepositoryError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        Ok(Transaction {
            id: record.id,
            kind: record.kind.parse().map_err(RepositoryError::InvalidData)?,
            amount: record.amount,
            category: record.category,
            date: record.transaction_date,
            description: record.description,
        })
    }
}

const SELECT_TRANSACTION: &str =
    "SELECT id, kind, amount, category, transaction_date, description FROM transactions";

pub(crate) struct TransactionRepository<'a> {
    conn: &'a mut database::Connection,
}

impl<'a> TransactionRepository<'a> {
    pub fn new(conn: &'a mut database::Connection) -> Self {
        Self { conn }
    }

    pub async fn create(&mut self, req: &CreateTransactionRequest) -> Result<i64, RepositoryError> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO transactions (kind, amount, category, transaction_date, description) VALUES ($1, $2, $3, $4, $5) RETURNING id",
        )
        .bind(req.kind().as_str())
        .bind(req.amount())
        .bind(req.category())
        .bind(req.date())
        .bind(req.description())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(id)
    }

    pub async fn update(&mut self, id: i64, req: &CreateTransactionRequest) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE transactions SET kind = $1, amount = $2, category = $3, transaction_date = $4, description = $5 WHERE id = $6",
        )
        .bind(req.kind().as_str())
        .bind(req.amount())
        .bind(req.category())
        .bind(req.date())
        .bind(req.description())
        .bind(id)
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    pub async fn find_by_id(&mut self, id: i64) -> Result<Option<Transaction>, RepositoryError> {
        let record = sqlx::query_as::<_, TransactionRecord>(&format!("{} WHERE id = $1", SELECT_TRANSACTION))
            .bind(id)
            .fetch_optional(&mut *self.conn)
            .await?;

        record.map(Transaction::try_from).transpose()
    }

    pub async fn list(&mut self) -> Result<Vec<Transaction>, RepositoryError> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            &format!("{} ORDER BY transaction_date DESC, id DESC", SELECT_TRANSACTION),
        )
        .fetch_all(&mut *self.conn)
        .await?;

        records.into_iter().map(Transaction::try_from).collect()
    }

    pub async fn list_by_month(&mut self, month: MonthKey) -> Result<Vec<Transaction>, RepositoryError> {
        let records = sqlx::query_as::<_, TransactionRecord>(
            &format!("{} WHERE transaction_date BETWEEN $1 AND $2 ORDER BY transaction_date DESC, id DESC", SELECT_TRANSACTION),
        )
        .bind(month.first_day())
        .bind(month.last_day())
        .fetch_all(&mut *self.conn)
        .await?;

        records.into_iter().map(Transaction::try_from).collect()
    }

    pub async fn delete(&mut self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
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
    use crate::models::RawTransactionRequest;
    use common::EntryKind;
    use database::get_test_db;

    fn request(kind: EntryKind, dollars: f64, date: &str, notes: Option<&str>) -> CreateTransactionRequest {
        CreateTransactionRequest::new(RawTransactionRequest {
            kind,
            amount_dollars: dollars,
            category: "Food".into(),
            date: date.into(),
            description: notes.map(String::from),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_create_transaction() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        let id = repo.create(&request(EntryKind::Expense, 10.0, "2026-01-01", Some("Notes"))).await.unwrap();
        assert!(id > 0);

        let t = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(t.amount, 1000);
        assert_eq!(t.kind, EntryKind::Expense);
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(t.description, Some("Notes".to_string()));
    }

    #[tokio::test]
    async fn test_list_by_month_uses_inclusive_bounds() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        repo.create(&request(EntryKind::Expense, 10.0, "2025-12-31", None)).await.unwrap();
        repo.create(&request(EntryKind::Expense, 10.0, "2026-01-01", None)).await.unwrap();
        repo.create(&request(EntryKind::Income, 10.0, "2026-01-31", None)).await.unwrap();
        repo.create(&request(EntryKind::Expense, 10.0, "2026-02-01", None)).await.unwrap();

        let list = repo.list_by_month("2026-01".parse().unwrap()).await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(repo.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_update_transaction() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        let id = repo.create(&request(EntryKind::Expense, 10.0, "2026-01-01", None)).await.unwrap();
        repo.update(id, &request(EntryKind::Income, 20.0, "2026-01-02", Some("Updated"))).await.unwrap();

        let t = repo.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(t.amount, 2000);
        assert_eq!(t.kind, EntryKind::Income);
        assert_eq!(t.date, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(t.description, Some("Updated".to_string()));
    }

    #[tokio::test]
    async fn test_delete_transaction() {
        let db = get_test_db().await;
        let mut uow = db.begin().await.unwrap();
        let mut repo = TransactionRepository::new(uow.connection());

        let id = repo.create(&request(EntryKind::Expense, 10.0, "2026-01-01", None)).await.unwrap();

        assert!(repo.find_by_id(id).await.unwrap().is_some());
        repo.delete(id).await.unwrap();
        assert!(repo.find_by_id(id).await.unwrap().is_none());
    }
}
