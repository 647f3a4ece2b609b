//! Analyst notes repository — free-text commentary per dashboard period

use crate::DbResult;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A persisted analyst note. `store_code` is empty for a dashboard-level note.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalystNoteRecord {
    pub id: Option<i64>,
    pub dataset: String,
    pub period: String,
    pub store_code: String,
    pub body: String,
    pub author: Option<String>,
    pub updated_at: Option<i64>,
}

/// Repository for analyst notes
pub struct NoteRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> NoteRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or overwrite the note for (dataset, period, store_code)
    pub async fn upsert_note(&self, note: &AnalystNoteRecord) -> DbResult<i64> {
        let result = sqlx::query(
            r#"INSERT INTO analyst_notes (dataset, period, store_code, body, author, updated_at)
               VALUES (?1, ?2, ?3, ?4, ?5, strftime('%s', 'now'))
               ON CONFLICT(dataset, period, store_code) DO UPDATE SET
                 body = excluded.body,
                 author = excluded.author,
                 updated_at = strftime('%s', 'now')
            "#,
        )
        .bind(&note.dataset)
        .bind(&note.period)
        .bind(&note.store_code)
        .bind(&note.body)
        .bind(&note.author)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// All notes for a dashboard period, dashboard-level note first
    pub async fn get_notes(&self, dataset: &str, period: &str) -> DbResult<Vec<AnalystNoteRecord>> {
        let records = sqlx::query_as::<_, AnalystNoteRecord>(
            r#"SELECT id, dataset, period, store_code, body, author, updated_at
               FROM analyst_notes
               WHERE dataset = ?1 AND period = ?2
               ORDER BY store_code ASC"#,
        )
        .bind(dataset)
        .bind(period)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }

    /// Returns true if a note was removed
    pub async fn delete_note(&self, dataset: &str, period: &str, store_code: &str) -> DbResult<bool> {
        let result = sqlx::query(
            "DELETE FROM analyst_notes WHERE dataset = ?1 AND period = ?2 AND store_code = ?3",
        )
        .bind(dataset)
        .bind(period)
        .bind(store_code)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
