//! Analysis run repository — one efficiency summary per dataset and period

use crate::DbResult;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

/// A persisted efficiency analysis summary
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnalysisRunRecord {
    pub id: Option<i64>,
    pub dataset: String,
    pub period: String,
    pub store_count: i64,
    pub excluded_count: i64,
    pub loss_store_count: i64,
    pub total_sales: String,
    pub total_direct_profit: String,
    pub max_sales_per_area: Option<String>,
    pub min_sales_per_area: Option<String>,
    pub avg_profit_sales_per_area: Option<String>,
    pub breakeven_threshold: Option<String>,
    pub avg_yoy: Option<String>,
    pub stats_json: Option<String>,
    pub analyzed_at: Option<i64>,
}

/// Repository for analysis run summaries
pub struct AnalysisRunRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AnalysisRunRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace the summary for (dataset, period)
    pub async fn save_run(&self, record: &AnalysisRunRecord) -> DbResult<i64> {
        let result = sqlx::query(
            r#"INSERT INTO analysis_runs
                (dataset, period, store_count, excluded_count, loss_store_count,
                 total_sales, total_direct_profit, max_sales_per_area, min_sales_per_area,
                 avg_profit_sales_per_area, breakeven_threshold, avg_yoy, stats_json,
                 analyzed_at)
               VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13,
                       strftime('%s', 'now'))
               ON CONFLICT(dataset, period) DO UPDATE SET
                 store_count = excluded.store_count,
                 excluded_count = excluded.excluded_count,
                 loss_store_count = excluded.loss_store_count,
                 total_sales = excluded.total_sales,
                 total_direct_profit = excluded.total_direct_profit,
                 max_sales_per_area = excluded.max_sales_per_area,
                 min_sales_per_area = excluded.min_sales_per_area,
                 avg_profit_sales_per_area = excluded.avg_profit_sales_per_area,
                 breakeven_threshold = excluded.breakeven_threshold,
                 avg_yoy = excluded.avg_yoy,
                 stats_json = excluded.stats_json,
                 analyzed_at = strftime('%s', 'now')
            "#,
        )
        .bind(&record.dataset)
        .bind(&record.period)
        .bind(record.store_count)
        .bind(record.excluded_count)
        .bind(record.loss_store_count)
        .bind(&record.total_sales)
        .bind(&record.total_direct_profit)
        .bind(&record.max_sales_per_area)
        .bind(&record.min_sales_per_area)
        .bind(&record.avg_profit_sales_per_area)
        .bind(&record.breakeven_threshold)
        .bind(&record.avg_yoy)
        .bind(&record.stats_json)
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Get the summary for one dataset and period
    pub async fn get_run(&self, dataset: &str, period: &str) -> DbResult<Option<AnalysisRunRecord>> {
        let record = sqlx::query_as::<_, AnalysisRunRecord>(
            r#"SELECT id, dataset, period, store_count, excluded_count, loss_store_count,
                      total_sales, total_direct_profit, max_sales_per_area, min_sales_per_area,
                      avg_profit_sales_per_area, breakeven_threshold, avg_yoy, stats_json,
                      analyzed_at
               FROM analysis_runs WHERE dataset = ?1 AND period = ?2"#,
        )
        .bind(dataset)
        .bind(period)
        .fetch_optional(self.pool)
        .await?;

        Ok(record)
    }

    /// All summaries for a dataset, newest period first
    pub async fn list_runs(&self, dataset: &str) -> DbResult<Vec<AnalysisRunRecord>> {
        let records = sqlx::query_as::<_, AnalysisRunRecord>(
            r#"SELECT id, dataset, period, store_count, excluded_count, loss_store_count,
                      total_sales, total_direct_profit, max_sales_per_area, min_sales_per_area,
                      avg_profit_sales_per_area, breakeven_threshold, avg_yoy, stats_json,
                      analyzed_at
               FROM analysis_runs WHERE dataset = ?1 ORDER BY period DESC"#,
        )
        .bind(dataset)
        .fetch_all(self.pool)
        .await?;

        Ok(records)
    }
}
