//! Cache
//!
//! Este módulo contiene el cliente de cache y las políticas construidas
//! encima: lectura cache-aside e invalidación de listados.
//!
//! El cache trabaja con strings JSON. Los errores de cache nunca llegan al
//! cliente HTTP: quien llama los registra y sigue contra la base de datos.

use async_trait::async_trait;
use thiserror::Error;

pub mod cache_aside;
pub mod cache_config;
pub mod invalidation;
pub mod memory_cache;
pub mod redis_client;

pub use cache_config::CacheConfig;
pub use memory_cache::{InMemoryCache, NoopCache};
pub use redis_client::RedisClient;

/// Errores del backend de cache
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Cache backend unavailable: {0}")]
    Unavailable(String),
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Operaciones de cache sobre valores serializados
#[async_trait]
pub trait CacheOperations: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult<Option<String>>;

    async fn set(&self, key: &str, value: &str, ttl_seconds: u64) -> CacheResult<()>;

    async fn delete(&self, key: &str) -> CacheResult<()>;

    /// Borrar todas las claves que coinciden con un patrón glob (`*`).
    /// Devuelve el número de claves eliminadas.
    async fn delete_pattern(&self, pattern: &str) -> CacheResult<u64>;

    /// Incremento atómico; una clave inexistente empieza en 0.
    async fn incr(&self, key: &str) -> CacheResult<i64>;

    async fn health_check(&self) -> bool;

    fn backend_name(&self) -> &'static str;
}
