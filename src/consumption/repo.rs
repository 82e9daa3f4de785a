use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ConsumptionEntry {
    pub id: i64,
    pub user_id: i64,
    pub beverage_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub consumption_time: OffsetDateTime,
    pub serving_count: i64,
}

/// One beverage line of a daily summary.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BreakdownRow {
    pub beverage: String,
    pub servings: i64,
    pub caffeine_mg: i64,
}

impl ConsumptionEntry {
    pub async fn list_all(db: &SqlitePool) -> anyhow::Result<Vec<ConsumptionEntry>> {
        let entries = sqlx::query_as::<_, ConsumptionEntry>(
            r#"
            SELECT id, user_id, beverage_id, consumption_time, serving_count
            FROM consumption_log
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(entries)
    }

    pub async fn find(db: &SqlitePool, id: i64) -> anyhow::Result<Option<ConsumptionEntry>> {
        let entry = sqlx::query_as::<_, ConsumptionEntry>(
            r#"
            SELECT id, user_id, beverage_id, consumption_time, serving_count
            FROM consumption_log
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    pub async fn create(
        db: &SqlitePool,
        user_id: i64,
        beverage_id: i64,
        serving_count: i64,
    ) -> anyhow::Result<ConsumptionEntry> {
        let entry = sqlx::query_as::<_, ConsumptionEntry>(
            r#"
            INSERT INTO consumption_log (user_id, beverage_id, consumption_time, serving_count)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, beverage_id, consumption_time, serving_count
            "#,
        )
        .bind(user_id)
        .bind(beverage_id)
        .bind(OffsetDateTime::now_utc())
        .bind(serving_count)
        .fetch_one(db)
        .await?;
        Ok(entry)
    }

    /// In-place update: id and `consumption_time` are preserved.
    pub async fn update_servings(
        db: &SqlitePool,
        id: i64,
        serving_count: i64,
    ) -> anyhow::Result<Option<ConsumptionEntry>> {
        let entry = sqlx::query_as::<_, ConsumptionEntry>(
            r#"
            UPDATE consumption_log
            SET serving_count = $1
            WHERE id = $2
            RETURNING id, user_id, beverage_id, consumption_time, serving_count
            "#,
        )
        .bind(serving_count)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(entry)
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM consumption_log WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_user(db: &SqlitePool, user_id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM consumption_log WHERE user_id = $1")
            .bind(user_id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }

    /// Total caffeine for one user on one calendar date. Entries whose
    /// beverage no longer exists drop out of the join.
    pub async fn daily_total(db: &SqlitePool, user_id: i64, date: &str) -> anyhow::Result<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(b.caffeine_content_mg * c.serving_count), 0)
            FROM consumption_log c
            JOIN beverages b ON b.id = c.beverage_id
            WHERE c.user_id = $1 AND date(c.consumption_time) = $2
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;
        Ok(total)
    }

    pub async fn daily_breakdown(
        db: &SqlitePool,
        user_id: i64,
        date: &str,
    ) -> anyhow::Result<Vec<BreakdownRow>> {
        let rows = sqlx::query_as::<_, BreakdownRow>(
            r#"
            SELECT b.name AS beverage,
                   c.serving_count AS servings,
                   b.caffeine_content_mg * c.serving_count AS caffeine_mg
            FROM consumption_log c
            JOIN beverages b ON b.id = c.beverage_id
            WHERE c.user_id = $1 AND date(c.consumption_time) = $2
            ORDER BY c.id
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;
        Ok(rows)
    }
}
