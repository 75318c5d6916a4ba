//! Daily log repository
//!
//! One JSONB document per (email, date). Writes are full replacements.

use anyhow::Result;
use befit_shared::models::DailyLog;
use chrono::NaiveDate;
use sqlx::types::Json;
use sqlx::PgPool;

pub struct LogRepository;

impl LogRepository {
    /// Stored log for a day, if any
    pub async fn find(pool: &PgPool, email: &str, date: NaiveDate) -> Result<Option<DailyLog>> {
        let data = sqlx::query_scalar::<_, Json<DailyLog>>(
            r#"
            SELECT data FROM logs
            WHERE email = $1 AND date = $2
            "#,
        )
        .bind(email)
        .bind(date)
        .fetch_optional(pool)
        .await?;

        Ok(data.map(|Json(log)| log))
    }

    /// Insert or fully replace the log keyed by `log.date`
    pub async fn upsert(pool: &PgPool, email: &str, log: &DailyLog) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO logs (email, date, data)
            VALUES ($1, $2, $3)
            ON CONFLICT (email, date) DO UPDATE
            SET data = EXCLUDED.data, updated_at = NOW()
            "#,
        )
        .bind(email)
        .bind(log.date)
        .bind(Json(log))
        .execute(pool)
        .await?;

        Ok(())
    }
}
