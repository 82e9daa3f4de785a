use serde::Serialize;
use sqlx::{FromRow, SqlitePool};

use super::dto::BeverageFields;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Beverage {
    pub id: i64,
    pub name: String,
    pub caffeine_content_mg: i64,
    pub image_url: Option<String>,
    pub category: Option<String>,
}

impl Beverage {
    pub async fn list(db: &SqlitePool) -> anyhow::Result<Vec<Beverage>> {
        let beverages = sqlx::query_as::<_, Beverage>(
            r#"
            SELECT id, name, caffeine_content_mg, image_url, category
            FROM beverages
            ORDER BY id
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(beverages)
    }

    pub async fn find(db: &SqlitePool, id: i64) -> anyhow::Result<Option<Beverage>> {
        let beverage = sqlx::query_as::<_, Beverage>(
            r#"
            SELECT id, name, caffeine_content_mg, image_url, category
            FROM beverages
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(beverage)
    }

    pub async fn create(db: &SqlitePool, fields: &BeverageFields) -> anyhow::Result<Beverage> {
        let beverage = sqlx::query_as::<_, Beverage>(
            r#"
            INSERT INTO beverages (name, caffeine_content_mg, image_url, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, caffeine_content_mg, image_url, category
            "#,
        )
        .bind(&fields.name)
        .bind(fields.caffeine_content_mg)
        .bind(&fields.image_url)
        .bind(&fields.category)
        .fetch_one(db)
        .await?;
        Ok(beverage)
    }

    /// Overwrites every mutable column; absent optional fields become NULL.
    pub async fn update(
        db: &SqlitePool,
        id: i64,
        fields: &BeverageFields,
    ) -> anyhow::Result<Option<Beverage>> {
        let beverage = sqlx::query_as::<_, Beverage>(
            r#"
            UPDATE beverages
            SET name = $1, caffeine_content_mg = $2, image_url = $3, category = $4
            WHERE id = $5
            RETURNING id, name, caffeine_content_mg, image_url, category
            "#,
        )
        .bind(&fields.name)
        .bind(fields.caffeine_content_mg)
        .bind(&fields.image_url)
        .bind(&fields.category)
        .bind(id)
        .fetch_optional(db)
        .await?;
        Ok(beverage)
    }

    pub async fn delete(db: &SqlitePool, id: i64) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM beverages WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected())
    }
}
