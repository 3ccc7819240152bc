use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::FavoriteStore;
use crate::models::property::Property;
use crate::utils::errors::AppResult;

pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    async fn add(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO favorites (user_id, property_id, created_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (user_id, property_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(property_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND property_id = $2")
            .bind(user_id)
            .bind(property_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM favorites WHERE user_id = $1 AND property_id = $2)",
        )
        .bind(user_id)
        .bind(property_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn list_properties(&self, user_id: Uuid) -> AppResult<Vec<Property>> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT p.*
            FROM favorites f
            JOIN properties p ON p.id = f.property_id
            WHERE f.user_id = $1
            ORDER BY f.created_at ASC, p.id ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }
}
