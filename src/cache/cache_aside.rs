//! Lectura cache-aside
//!
//! Buscar en cache, y en caso de miss ejecutar la consulta y poblar el cache.
//! Cualquier fallo del cache (conexión, payload corrupto) se degrada a miss.

use serde::{de::DeserializeOwned, Serialize};
use std::future::Future;
use tracing::{debug, warn};

use super::CacheOperations;
use crate::utils::errors::AppResult;

/// Leer y decodificar una entrada; `None` en miss o en cualquier fallo
pub async fn lookup<T: DeserializeOwned>(cache: &dyn CacheOperations, key: &str) -> Option<T> {
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str::<T>(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("⚠️ Payload de cache inválido para clave {}: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("⚠️ Error leyendo cache para clave {}: {}", key, e);
            None
        }
    }
}

/// Guardar un valor serializado; los fallos solo se registran
pub async fn populate<T: Serialize>(cache: &dyn CacheOperations, key: &str, value: &T, ttl_seconds: u64) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!("⚠️ No se pudo serializar valor para clave {}: {}", key, e);
            return;
        }
    };

    if let Err(e) = cache.set(key, &raw, ttl_seconds).await {
        warn!("⚠️ Error guardando en cache para clave {}: {}", key, e);
    }
}

/// Borrar una clave; los fallos solo se registran
pub async fn evict(cache: &dyn CacheOperations, key: &str) {
    if let Err(e) = cache.delete(key).await {
        warn!("⚠️ Error eliminando cache para clave {}: {}", key, e);
    }
}

/// Servir desde cache o cargar con `load` y poblar.
/// Los errores de `load` se propagan y no se cachean.
pub async fn read_through<T, F, Fut>(
    cache: &dyn CacheOperations,
    key: &str,
    ttl_seconds: u64,
    load: F,
) -> AppResult<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    if let Some(cached) = lookup::<T>(cache, key).await {
        debug!("📥 Servido desde cache: {}", key);
        return Ok(cached);
    }

    let value = load().await?;
    populate(cache, key, &value, ttl_seconds).await;
    Ok(value)
}
