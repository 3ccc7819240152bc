//! Servicio de propiedades
//!
//! Búsqueda filtrada y paginada con cache-aside, lectura por id y CRUD con
//! control de propietario. Toda mutación invalida el cache afectado.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::cache::{
    cache_aside::read_through,
    invalidation::{current_list_generation, list_key, on_property_changed, on_property_created, property_key},
    CacheOperations,
};
use crate::config::environment::EnvironmentConfig;
use crate::models::property::{CreatePropertyRequest, Property, UpdatePropertyRequest};
use crate::repositories::PropertyStore;
use crate::services::pagination::{PageInfo, PaginatedResponse, Pagination, PaginationSettings};
use crate::services::property_code::{month_prefix, next_property_code};
use crate::services::property_query::{build_filter, PropertyFilter};
use crate::utils::errors::{forbidden_error, not_found_error, AppError, AppResult};

#[derive(Debug, Clone, Copy)]
pub struct PropertySettings {
    pub cache_ttl: u64,
    pub pagination: PaginationSettings,
    pub code_retries: u32,
}

impl From<&EnvironmentConfig> for PropertySettings {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            cache_ttl: config.cache_ttl_seconds,
            pagination: PaginationSettings {
                default_limit: config.default_page_size,
                max_limit: config.max_page_size,
            },
            code_retries: config.property_code_retries,
        }
    }
}

pub struct PropertyService {
    store: Arc<dyn PropertyStore>,
    cache: Arc<dyn CacheOperations>,
    settings: PropertySettings,
}

impl PropertyService {
    pub fn new(store: Arc<dyn PropertyStore>, cache: Arc<dyn CacheOperations>, settings: PropertySettings) -> Self {
        Self { store, cache, settings }
    }

    pub fn pagination_settings(&self) -> PaginationSettings {
        self.settings.pagination
    }

    pub async fn search(&self, filter: PropertyFilter, pagination: Pagination) -> AppResult<PaginatedResponse<Property>> {
        let filter = filter.normalized();

        // Sin generación legible no se usa el cache en esta lectura
        let key = match current_list_generation(self.cache.as_ref()).await {
            Some(generation) => list_key(generation, &filter, &pagination),
            None => None,
        };

        match key {
            Some(key) => {
                read_through(self.cache.as_ref(), &key, self.settings.cache_ttl, || {
                    self.load_page(&filter, &pagination)
                })
                .await
            }
            None => self.load_page(&filter, &pagination).await,
        }
    }

    async fn load_page(&self, filter: &PropertyFilter, pagination: &Pagination) -> AppResult<PaginatedResponse<Property>> {
        let expr = build_filter(filter);
        let (data, total) = futures::try_join!(self.store.find(&expr, pagination), self.store.count(&expr))?;

        Ok(PaginatedResponse {
            data,
            pagination: PageInfo::new(total, pagination),
        })
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Property> {
        read_through(self.cache.as_ref(), &property_key(id), self.settings.cache_ttl, move || async move {
            self.store
                .find_by_id(id)
                .await?
                .ok_or_else(|| not_found_error("Property", &id.to_string()))
        })
        .await
    }

    pub async fn create(&self, request: CreatePropertyRequest, owner_id: Uuid) -> AppResult<Property> {
        request.validate()?;

        for attempt in 0..=self.settings.code_retries {
            let now = Utc::now();
            let latest = self.store.latest_code_sequence(&month_prefix(now)).await?;
            let property = Property::new(next_property_code(now, latest), request.clone(), owner_id, now);

            match self.store.insert(&property).await {
                Ok(created) => {
                    info!("🏠 Property {} created by {}", created.property_code, owner_id);
                    on_property_created(self.cache.as_ref()).await;
                    return Ok(created);
                }
                Err(e) if e.is_unique_violation() => {
                    warn!(
                        "⚠️ Property code {} already taken (attempt {})",
                        property.property_code,
                        attempt + 1
                    );
                }
                Err(e) => return Err(e),
            }
        }

        Err(AppError::Conflict(
            "Could not allocate a unique property code, please retry".to_string(),
        ))
    }

    pub async fn update(&self, id: Uuid, changes: UpdatePropertyRequest, requester_id: Uuid) -> AppResult<Property> {
        let existing = self.owned_property(id, requester_id, "update property").await?;
        changes.validate()?;
        if changes.is_empty() {
            return Ok(existing);
        }

        let updated = self
            .store
            .update(id, &changes)
            .await?
            .ok_or_else(|| not_found_error("Property", &id.to_string()))?;

        info!("✏️ Property {} updated", updated.property_code);
        on_property_changed(self.cache.as_ref(), id).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: Uuid, requester_id: Uuid) -> AppResult<()> {
        let existing = self.owned_property(id, requester_id, "delete property").await?;

        if !self.store.delete(id).await? {
            return Err(not_found_error("Property", &id.to_string()));
        }

        info!("🗑️ Property {} deleted", existing.property_code);
        on_property_changed(self.cache.as_ref(), id).await;
        Ok(())
    }

    async fn owned_property(&self, id: Uuid, requester_id: Uuid, operation: &str) -> AppResult<Property> {
        let property = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| not_found_error("Property", &id.to_string()))?;

        if !property.is_owned_by(requester_id) {
            return Err(forbidden_error(operation, "only the creator can modify this property"));
        }

        Ok(property)
    }
}
