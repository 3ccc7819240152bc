use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::RecommendationStore;
use crate::models::{
    property::Property,
    recommendation::{Recommendation, RecommendationView},
    user::UserSummary,
};
use crate::utils::errors::AppResult;

pub struct RecommendationRepository {
    pool: PgPool,
}

impl RecommendationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Fila del join recomendación + remitente + propiedad
#[derive(FromRow)]
struct ReceivedRow {
    recommendation_id: Uuid,
    recommended_at: DateTime<Utc>,
    from_id: Uuid,
    from_name: String,
    from_email: String,
    #[sqlx(flatten)]
    property: Property,
}

impl From<ReceivedRow> for RecommendationView {
    fn from(row: ReceivedRow) -> Self {
        Self {
            id: row.recommendation_id,
            from: UserSummary {
                id: row.from_id,
                name: row.from_name,
                email: row.from_email,
            },
            property: row.property,
            date: row.recommended_at,
        }
    }
}

#[async_trait]
impl RecommendationStore for RecommendationRepository {
    async fn add(&self, recommendation: &Recommendation) -> AppResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO recommendations (id, from_user_id, to_user_id, property_id, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (from_user_id, to_user_id, property_id) DO NOTHING
            "#,
        )
        .bind(recommendation.id)
        .bind(recommendation.from_user_id)
        .bind(recommendation.to_user_id)
        .bind(recommendation.property_id)
        .bind(recommendation.created_at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn received(&self, to_user_id: Uuid) -> AppResult<Vec<RecommendationView>> {
        let rows = sqlx::query_as::<_, ReceivedRow>(
            r#"
            SELECT
                r.id AS recommendation_id,
                r.created_at AS recommended_at,
                u.id AS from_id,
                u.name AS from_name,
                u.email AS from_email,
                p.*
            FROM recommendations r
            JOIN users u ON u.id = r.from_user_id
            JOIN properties p ON p.id = r.property_id
            WHERE r.to_user_id = $1
            ORDER BY r.created_at ASC, r.id ASC
            "#,
        )
        .bind(to_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecommendationView::from).collect())
    }

    async fn recommended_properties(&self, to_user_id: Uuid) -> AppResult<Vec<Property>> {
        let properties = sqlx::query_as::<_, Property>(
            r#"
            SELECT p.*
            FROM properties p
            WHERE p.id IN (SELECT property_id FROM recommendations WHERE to_user_id = $1)
            ORDER BY p.created_at ASC, p.id ASC
            "#,
        )
        .bind(to_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(properties)
    }

    async fn count_by_sender(&self, to_user_id: Uuid) -> AppResult<Vec<(Uuid, i64)>> {
        let counts = sqlx::query_as::<_, (Uuid, i64)>(
            r#"
            SELECT from_user_id, COUNT(*)
            FROM recommendations
            WHERE to_user_id = $1
            GROUP BY from_user_id
            "#,
        )
        .bind(to_user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(counts)
    }
}
