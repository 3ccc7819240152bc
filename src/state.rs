//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. Es también la raíz de composición: aquí se
//! conectan stores, cache y servicios.

use sqlx::PgPool;
use std::sync::Arc;

use crate::cache::CacheOperations;
use crate::config::environment::EnvironmentConfig;
use crate::repositories::{
    FavoriteRepository, FavoriteStore, MemoryStore, PropertyRepository, PropertyStore,
    RecommendationRepository, RecommendationStore, UserRepository, UserStore,
};
use crate::services::{AuthService, FavoriteService, PropertyService, PropertySettings, RecommendationService};

/// Conjunto de stores que usan los servicios
#[derive(Clone)]
pub struct Stores {
    pub properties: Arc<dyn PropertyStore>,
    pub users: Arc<dyn UserStore>,
    pub favorites: Arc<dyn FavoriteStore>,
    pub recommendations: Arc<dyn RecommendationStore>,
}

impl Stores {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            properties: Arc::new(PropertyRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool.clone())),
            favorites: Arc::new(FavoriteRepository::new(pool.clone())),
            recommendations: Arc::new(RecommendationRepository::new(pool)),
        }
    }

    pub fn in_memory(store: MemoryStore) -> Self {
        Self {
            properties: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            favorites: Arc::new(store.clone()),
            recommendations: Arc::new(store),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: EnvironmentConfig,
    pub cache: Arc<dyn CacheOperations>,
    pub auth_service: Arc<AuthService>,
    pub property_service: Arc<PropertyService>,
    pub favorite_service: Arc<FavoriteService>,
    pub recommendation_service: Arc<RecommendationService>,
}

impl AppState {
    pub fn new(config: EnvironmentConfig, stores: Stores, cache: Arc<dyn CacheOperations>) -> Self {
        let ttl = config.cache_ttl_seconds;

        Self {
            auth_service: Arc::new(AuthService::new(stores.users.clone(), &config)),
            property_service: Arc::new(PropertyService::new(
                stores.properties.clone(),
                cache.clone(),
                PropertySettings::from(&config),
            )),
            favorite_service: Arc::new(FavoriteService::new(
                stores.favorites,
                stores.properties.clone(),
                cache.clone(),
                ttl,
            )),
            recommendation_service: Arc::new(RecommendationService::new(
                stores.recommendations,
                stores.properties,
                stores.users,
                cache.clone(),
                ttl,
            )),
            cache,
            config,
        }
    }
}
