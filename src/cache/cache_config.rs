//! Configuración de cache
//!
//! Este módulo contiene la configuración para el sistema de cache.

use serde::{Deserialize, Serialize};

use crate::config::environment::EnvironmentConfig;

/// Configuración del cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub enabled: bool,
    pub redis_url: String,
}

impl From<&EnvironmentConfig> for CacheConfig {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            enabled: config.cache_enabled,
            redis_url: config.redis_url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_environment() {
        let mut env = EnvironmentConfig::for_tests();
        env.redis_url = "redis://cache:6379".to_string();
        env.cache_enabled = false;

        let config = CacheConfig::from(&env);
        assert_eq!(config.redis_url, "redis://cache:6379");
        assert!(!config.enabled);
    }
}
