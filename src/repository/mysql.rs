use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{FromRow, MySqlPool};

use crate::error::VacationError;
use crate::model::vacation::{NewVacation, Vacation, VacationStatus};
use crate::repository::VacationStore;

const SELECT_VACATION: &str = r#"
    SELECT id, author, request_date, status, resolved_by, start_date, end_date
    FROM tbl_vacation
"#;

#[derive(FromRow)]
struct VacationRow {
    id: u64,
    author: u64,
    request_date: NaiveDateTime,
    status: String,
    resolved_by: Option<u64>,
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
}

impl TryFrom<VacationRow> for Vacation {
    type Error = VacationError;

    fn try_from(row: VacationRow) -> Result<Self, Self::Error> {
        let status = row.status.parse::<VacationStatus>().map_err(|_| {
            tracing::error!(id = row.id, status = %row.status, "Unknown status stored for vacation request");
            VacationError::storage(format!("unknown status '{}'", row.status))
        })?;

        Ok(Vacation {
            id: row.id,
            author_id: row.author,
            request_date: row.request_date,
            status,
            resolved_by: row.resolved_by,
            start_date: row.start_date,
            end_date: row.end_date,
        })
    }
}

fn storage_error(e: sqlx::Error, context: &'static str) -> VacationError {
    tracing::error!(error = %e, "{}", context);
    VacationError::storage(context)
}

pub struct MySqlVacationStore {
    pool: MySqlPool,
}

impl MySqlVacationStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_filtered(
        &self,
        author_id: Option<u64>,
        statuses: &[VacationStatus],
    ) -> Result<Vec<Vacation>, VacationError> {
        // -------------------------
        // WHERE clause
        // -------------------------
        let mut where_sql = String::from(" WHERE 1=1");

        if author_id.is_some() {
            where_sql.push_str(" AND author = ?");
        }

        if !statuses.is_empty() {
            let placeholders = vec!["?"; statuses.len()].join(", ");
            where_sql.push_str(&format!(" AND status IN ({})", placeholders));
        }

        let sql = format!("{}{} ORDER BY id", SELECT_VACATION, where_sql);

        let mut query = sqlx::query_as::<_, VacationRow>(&sql);
        if let Some(author_id) = author_id {
            query = query.bind(author_id);
        }
        for status in statuses {
            query = query.bind(status.as_str());
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_error(e, "Failed to fetch vacation requests"))?;

        rows.into_iter().map(Vacation::try_from).collect()
    }
}

#[async_trait]
impl VacationStore for MySqlVacationStore {
    async fn insert(&self, vacation: NewVacation) -> Result<Vacation, VacationError> {
        let result = sqlx::query(
            r#"
            INSERT INTO tbl_vacation
                (author, request_date, status, start_date, end_date)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(vacation.author_id)
        .bind(vacation.request_date)
        .bind(VacationStatus::Pending.as_str())
        .bind(vacation.start_date)
        .bind(vacation.end_date)
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error(e, "Failed to create vacation request"))?;

        Ok(Vacation {
            id: result.last_insert_id(),
            author_id: vacation.author_id,
            request_date: vacation.request_date,
            status: VacationStatus::Pending,
            resolved_by: None,
            start_date: vacation.start_date,
            end_date: vacation.end_date,
        })
    }

    async fn find_by_id(&self, id: u64) -> Result<Option<Vacation>, VacationError> {
        let sql = format!("{} WHERE id = ?", SELECT_VACATION);

        let row = sqlx::query_as::<_, VacationRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error(e, "Failed to fetch vacation request"))?;

        row.map(Vacation::try_from).transpose()
    }

    async fn find_by_author(
        &self,
        author_id: u64,
        statuses: &[VacationStatus],
    ) -> Result<Vec<Vacation>, VacationError> {
        self.fetch_filtered(Some(author_id), statuses).await
    }

    async fn find_all(&self, statuses: &[VacationStatus]) -> Result<Vec<Vacation>, VacationError> {
        self.fetch_filtered(None, statuses).await
    }

    async fn count_by_author_and_status_since(
        &self,
        author_id: u64,
        status: VacationStatus,
        since: NaiveDateTime,
    ) -> Result<u32, VacationError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM tbl_vacation
            WHERE author = ?
            AND status = ?
            AND start_date >= ?
            "#,
        )
        .bind(author_id)
        .bind(status.as_str())
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_error(e, "Failed to count vacation requests"))?;

        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn update_status(
        &self,
        id: u64,
        expected: VacationStatus,
        status: VacationStatus,
        resolved_by: u64,
    ) -> Result<bool, VacationError> {
        let result = sqlx::query(
            r#"
            UPDATE tbl_vacation
            SET status = ?, resolved_by = ?
            WHERE id = ?
            AND status = ?
            "#,
        )
        .bind(status.as_str())
        .bind(resolved_by)
        .bind(id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| storage_error(e, "Failed to update vacation request status"))?;

        Ok(result.rows_affected() > 0)
    }
}
