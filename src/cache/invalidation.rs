//! Claves de cache e invalidación
//!
//! Todo lo que guarda copias de propiedades en listas lleva el número de
//! generación en la clave: listados (`properties:v{gen}:...`), favoritos
//! (`favorites:v{gen}:{user}`) y recomendaciones recibidas
//! (`recommendations:v{gen}:{user}`). Cualquier mutación de una propiedad es
//! un `INCR` del contador: las claves de la generación anterior quedan
//! huérfanas y además se borran con un patrón, sin garantías.

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::cache_aside::evict;
use super::CacheOperations;

pub const LIST_GENERATION_KEY: &str = "properties:generation";

const GENERATIONAL_PREFIXES: [&str; 3] = ["properties", "favorites", "recommendations"];

pub fn property_key(id: Uuid) -> String {
    format!("property:{}", id)
}

pub fn favorites_key(generation: i64, user_id: Uuid) -> String {
    format!("favorites:v{}:{}", generation, user_id)
}

pub fn recommendations_key(generation: i64, user_id: Uuid) -> String {
    format!("recommendations:v{}:{}", generation, user_id)
}

/// Clave de un listado: generación + filtro y paginación serializados
pub fn list_key<F: Serialize, P: Serialize>(generation: i64, filter: &F, pagination: &P) -> Option<String> {
    let filter = serde_json::to_string(filter).ok()?;
    let pagination = serde_json::to_string(pagination).ok()?;
    Some(format!("properties:v{}:{}:{}", generation, filter, pagination))
}

fn generation_pattern(prefix: &str, generation: i64) -> String {
    format!("{}:v{}:*", prefix, generation)
}

/// Generación actual de listados. `None` si no se puede leer: en ese caso
/// la lectura no usa el cache.
pub async fn current_list_generation(cache: &dyn CacheOperations) -> Option<i64> {
    match cache.get(LIST_GENERATION_KEY).await {
        Ok(None) => Some(0),
        Ok(Some(raw)) => match raw.trim().parse::<i64>() {
            Ok(generation) => Some(generation),
            Err(_) => {
                warn!("⚠️ Generación de listados ilegible: {}", raw);
                None
            }
        },
        Err(e) => {
            warn!("⚠️ No se pudo leer la generación de listados: {}", e);
            None
        }
    }
}

/// Invalidar listados, favoritos y recomendaciones cacheados
pub async fn invalidate_property_lists(cache: &dyn CacheOperations) {
    let generation = match cache.incr(LIST_GENERATION_KEY).await {
        Ok(generation) => generation,
        Err(e) => {
            warn!("⚠️ No se pudo incrementar la generación de listados: {}", e);
            return;
        }
    };

    debug!("🔄 Listados de propiedades en generación {}", generation);

    for prefix in GENERATIONAL_PREFIXES {
        match cache.delete_pattern(&generation_pattern(prefix, generation - 1)).await {
            Ok(count) => debug!("🧹 {} claves {} de la generación {} eliminadas", count, prefix, generation - 1),
            Err(e) => warn!("⚠️ Error limpiando claves {} antiguas: {}", prefix, e),
        }
    }
}

pub async fn on_property_created(cache: &dyn CacheOperations) {
    invalidate_property_lists(cache).await;
}

/// Update o delete: la entrada individual y todos los listados
pub async fn on_property_changed(cache: &dyn CacheOperations, id: Uuid) {
    evict(cache, &property_key(id)).await;
    invalidate_property_lists(cache).await;
}

/// Sin generación legible no hay nada que borrar: las lecturas tampoco usan el cache
pub async fn on_favorites_changed(cache: &dyn CacheOperations, user_id: Uuid) {
    if let Some(generation) = current_list_generation(cache).await {
        evict(cache, &favorites_key(generation, user_id)).await;
    }
}

pub async fn on_recommendations_changed(cache: &dyn CacheOperations, user_id: Uuid) {
    if let Some(generation) = current_list_generation(cache).await {
        evict(cache, &recommendations_key(generation, user_id)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{InMemoryCache, NoopCache};

    #[tokio::test]
    async fn test_generation_starts_at_zero() {
        let cache = InMemoryCache::new();
        assert_eq!(current_list_generation(&cache).await, Some(0));
    }

    #[tokio::test]
    async fn test_invalidation_moves_to_next_generation() {
        let cache = InMemoryCache::new();
        let key = list_key(0, &"filter", &"page").unwrap();
        cache.set(&key, "[]", 60).await.unwrap();

        invalidate_property_lists(&cache).await;

        assert_eq!(current_list_generation(&cache).await, Some(1));
        assert!(!cache.contains_key(&key).await);
    }

    #[tokio::test]
    async fn test_changed_property_evicts_entity_key() {
        let cache = InMemoryCache::new();
        let id = Uuid::new_v4();
        cache.set(&property_key(id), "{}", 60).await.unwrap();

        on_property_changed(&cache, id).await;

        assert!(!cache.contains_key(&property_key(id)).await);
        assert_eq!(current_list_generation(&cache).await, Some(1));
    }

    #[tokio::test]
    async fn test_unreadable_generation_bypasses_cache() {
        let cache = InMemoryCache::new();
        cache.set_unavailable(true);
        assert_eq!(current_list_generation(&cache).await, None);
    }

    #[tokio::test]
    async fn test_invalidation_tolerates_noop_backend() {
        invalidate_property_lists(&NoopCache).await;
        assert_eq!(current_list_generation(&NoopCache).await, Some(0));
    }

    #[tokio::test]
    async fn test_property_change_orphans_user_lists() {
        let cache = InMemoryCache::new();
        let user = Uuid::new_v4();
        cache.set(&favorites_key(0, user), "[]", 60).await.unwrap();
        cache.set(&recommendations_key(0, user), "[]", 60).await.unwrap();

        on_property_changed(&cache, Uuid::new_v4()).await;

        assert!(!cache.contains_key(&favorites_key(0, user)).await);
        assert!(!cache.contains_key(&recommendations_key(0, user)).await);
    }

    #[tokio::test]
    async fn test_favorites_change_evicts_current_generation() {
        let cache = InMemoryCache::new();
        let user = Uuid::new_v4();
        invalidate_property_lists(&cache).await;
        cache.set(&favorites_key(1, user), "[]", 60).await.unwrap();

        on_favorites_changed(&cache, user).await;

        assert!(!cache.contains_key(&favorites_key(1, user)).await);
    }

    #[test]
    fn test_list_key_layout() {
        let key = list_key(3, &serde_json::json!({"bedrooms": 2}), &serde_json::json!({"page": 1})).unwrap();
        assert_eq!(key, r#"properties:v3:{"bedrooms":2}:{"page":1}"#);
    }
}
