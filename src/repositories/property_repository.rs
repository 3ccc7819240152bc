use async_trait::async_trait;
use log::{debug, error};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::PropertyStore;
use crate::models::property::{Property, UpdatePropertyRequest};
use crate::services::{pagination::Pagination, property_query::FilterExpr};
use crate::utils::errors::{AppError, AppResult};

const PROPERTY_COLUMNS: &str = "id, property_code, title, property_type, price, state, city, area, \
     bedrooms, bathrooms, amenities, furnished, available_from, listed_by, tags, color_theme, \
     rating, is_verified, listing_type, created_by, created_at";

pub struct PropertyRepository {
    pool: PgPool,
}

impl PropertyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PropertyStore for PropertyRepository {
    async fn find(&self, filter: &FilterExpr, pagination: &Pagination) -> AppResult<Vec<Property>> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM properties", PROPERTY_COLUMNS));
        filter.push_where(&mut builder);
        pagination.push_order_and_limit(&mut builder);

        debug!("Property search: {}", builder.sql());

        let properties = builder
            .build_query_as::<Property>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!("Error searching properties: {}", e);
                AppError::Database(e)
            })?;

        Ok(properties)
    }

    async fn count(&self, filter: &FilterExpr) -> AppResult<i64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM properties");
        filter.push_where(&mut builder);

        let total: i64 = builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Error counting properties: {}", e);
                AppError::Database(e)
            })?;

        Ok(total)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>> {
        let property = sqlx::query_as::<_, Property>(&format!(
            "SELECT {} FROM properties WHERE id = $1",
            PROPERTY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(property)
    }

    async fn latest_code_sequence(&self, prefix: &str) -> AppResult<Option<u32>> {
        let latest: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT MAX(CAST(SUBSTRING(property_code FROM '-([0-9]+)$') AS BIGINT))
            FROM properties
            WHERE property_code LIKE $1 || '-%'
            "#,
        )
        .bind(prefix)
        .fetch_one(&self.pool)
        .await?;

        Ok(latest.and_then(|n| u32::try_from(n).ok()))
    }

    async fn insert(&self, property: &Property) -> AppResult<Property> {
        let inserted = sqlx::query_as::<_, Property>(&format!(
            r#"
            INSERT INTO properties ({columns})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21)
            RETURNING {columns}
            "#,
            columns = PROPERTY_COLUMNS
        ))
        .bind(property.id)
        .bind(&property.property_code)
        .bind(&property.title)
        .bind(&property.property_type)
        .bind(property.price)
        .bind(&property.location.state)
        .bind(&property.location.city)
        .bind(property.area)
        .bind(property.bedrooms)
        .bind(property.bathrooms)
        .bind(&property.amenities)
        .bind(property.furnished)
        .bind(property.available_from)
        .bind(&property.listed_by)
        .bind(&property.tags)
        .bind(&property.color_theme)
        .bind(property.rating)
        .bind(property.is_verified)
        .bind(&property.listing_type)
        .bind(property.created_by)
        .bind(property.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn update(&self, id: Uuid, changes: &UpdatePropertyRequest) -> AppResult<Option<Property>> {
        let updated = sqlx::query_as::<_, Property>(&format!(
            r#"
            UPDATE properties SET
                title = COALESCE($2, title),
                property_type = COALESCE($3, property_type),
                price = COALESCE($4, price),
                state = COALESCE($5, state),
                city = COALESCE($6, city),
                area = COALESCE($7, area),
                bedrooms = COALESCE($8, bedrooms),
                bathrooms = COALESCE($9, bathrooms),
                amenities = COALESCE($10, amenities),
                furnished = COALESCE($11, furnished),
                available_from = COALESCE($12, available_from),
                listed_by = COALESCE($13, listed_by),
                tags = COALESCE($14, tags),
                color_theme = COALESCE($15, color_theme),
                rating = COALESCE($16, rating),
                listing_type = COALESCE($17, listing_type)
            WHERE id = $1
            RETURNING {}
            "#,
            PROPERTY_COLUMNS
        ))
        .bind(id)
        .bind(changes.title.as_ref().map(|t| t.trim().to_string()))
        .bind(&changes.property_type)
        .bind(changes.price)
        .bind(changes.location.as_ref().map(|l| l.state.clone()))
        .bind(changes.location.as_ref().map(|l| l.city.clone()))
        .bind(changes.area)
        .bind(changes.bedrooms)
        .bind(changes.bathrooms)
        .bind(&changes.amenities)
        .bind(changes.furnished)
        .bind(changes.available_from)
        .bind(&changes.listed_by)
        .bind(&changes.tags)
        .bind(&changes.color_theme)
        .bind(changes.rating)
        .bind(&changes.listing_type)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
