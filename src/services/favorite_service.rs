//! Servicio de favoritos
//!
//! Alta y baja atómicas sobre la clave (usuario, propiedad); la lista de
//! favoritos de cada usuario se sirve con cache-aside.

use log::info;
use std::sync::Arc;
use uuid::Uuid;

use crate::cache::{
    cache_aside::read_through,
    invalidation::{current_list_generation, favorites_key, on_favorites_changed},
    CacheOperations,
};
use crate::models::property::Property;
use crate::repositories::{FavoriteStore, PropertyStore};
use crate::utils::errors::{bad_request_error, not_found_error, AppError, AppResult};

pub struct FavoriteService {
    favorites: Arc<dyn FavoriteStore>,
    properties: Arc<dyn PropertyStore>,
    cache: Arc<dyn CacheOperations>,
    cache_ttl: u64,
}

impl FavoriteService {
    pub fn new(
        favorites: Arc<dyn FavoriteStore>,
        properties: Arc<dyn PropertyStore>,
        cache: Arc<dyn CacheOperations>,
        cache_ttl: u64,
    ) -> Self {
        Self {
            favorites,
            properties,
            cache,
            cache_ttl,
        }
    }

    /// La clave lleva la generación de propiedades: editar o borrar una
    /// propiedad deja obsoletas todas las listas que la contienen.
    pub async fn list(&self, user_id: Uuid) -> AppResult<Vec<Property>> {
        let favorites = &self.favorites;
        let load = move || async move { favorites.list_properties(user_id).await };

        match current_list_generation(self.cache.as_ref()).await {
            Some(generation) => {
                read_through(self.cache.as_ref(), &favorites_key(generation, user_id), self.cache_ttl, load).await
            }
            None => load().await,
        }
    }

    pub async fn add(&self, user_id: Uuid, property_id: Uuid) -> AppResult<Property> {
        let property = self
            .properties
            .find_by_id(property_id)
            .await?
            .ok_or_else(|| not_found_error("Property", &property_id.to_string()))?;

        if !self.favorites.add(user_id, property_id).await? {
            return Err(AppError::Conflict("Property already in favorites".to_string()));
        }

        info!("⭐ Favorito añadido: {} -> {}", user_id, property.property_code);
        on_favorites_changed(self.cache.as_ref(), user_id).await;
        Ok(property)
    }

    pub async fn remove(&self, user_id: Uuid, property_id: Uuid) -> AppResult<()> {
        if !self.favorites.remove(user_id, property_id).await? {
            return Err(bad_request_error("Property not in favorites"));
        }

        on_favorites_changed(self.cache.as_ref(), user_id).await;
        Ok(())
    }

    pub async fn is_favorite(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool> {
        self.favorites.exists(user_id, property_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::config::environment::EnvironmentConfig;
    use crate::models::property::{fixtures::create_request, UpdatePropertyRequest};
    use crate::repositories::MemoryStore;
    use crate::services::property_service::{PropertyService, PropertySettings};
    use chrono::Utc;

    async fn setup() -> (FavoriteService, Property) {
        let store = MemoryStore::new();
        let property = Property::new("PROP-202401-001".to_string(), create_request("Flat"), Uuid::new_v4(), Utc::now());
        store.insert(&property).await.unwrap();

        let service = FavoriteService::new(
            Arc::new(store.clone()),
            Arc::new(store),
            Arc::new(InMemoryCache::new()),
            60,
        );
        (service, property)
    }

    #[tokio::test]
    async fn test_duplicate_favorite_conflicts() {
        let (service, property) = setup().await;
        let user = Uuid::new_v4();

        service.add(user, property.id).await.unwrap();
        assert!(matches!(service.add(user, property.id).await, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_list_reflects_changes() {
        let (service, property) = setup().await;
        let user = Uuid::new_v4();

        assert!(service.list(user).await.unwrap().is_empty());
        service.add(user, property.id).await.unwrap();
        assert_eq!(service.list(user).await.unwrap().len(), 1);
        assert!(service.is_favorite(user, property.id).await.unwrap());

        service.remove(user, property.id).await.unwrap();
        assert!(service.list(user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_favorite_is_bad_request() {
        let (service, property) = setup().await;
        assert!(matches!(
            service.remove(Uuid::new_v4(), property.id).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_property_is_not_found() {
        let (service, _) = setup().await;
        assert!(matches!(
            service.add(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_list_reflects_property_update_and_delete() {
        let store = MemoryStore::new();
        let cache = InMemoryCache::new();
        let properties = PropertyService::new(
            Arc::new(store.clone()),
            Arc::new(cache.clone()),
            PropertySettings::from(&EnvironmentConfig::for_tests()),
        );
        let favorites = FavoriteService::new(Arc::new(store.clone()), Arc::new(store), Arc::new(cache), 60);

        let owner = Uuid::new_v4();
        let user = Uuid::new_v4();
        let kept = properties.create(create_request("Kept flat"), owner).await.unwrap();
        let removed = properties.create(create_request("Removed flat"), owner).await.unwrap();
        favorites.add(user, kept.id).await.unwrap();
        favorites.add(user, removed.id).await.unwrap();
        assert_eq!(favorites.list(user).await.unwrap().len(), 2);

        let changes = UpdatePropertyRequest {
            bedrooms: Some(9),
            ..Default::default()
        };
        properties.update(kept.id, changes, owner).await.unwrap();
        properties.delete(removed.id, owner).await.unwrap();

        let listed = favorites.list(user).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, kept.id);
        assert_eq!(listed[0].bedrooms, 9);
    }
}
