//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    /// Segundos de validez del token (7 días por defecto)
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    pub database_url: String,
    pub redis_url: String,
    pub cache_enabled: bool,
    pub cache_ttl_seconds: u64,
    pub default_page_size: i64,
    pub max_page_size: i64,
    pub property_code_retries: u32,
    pub bcrypt_cost: u32,
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno
    pub fn from_env() -> Result<Self> {
        let config = Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: parse_var("PORT", 3000)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            jwt_expiration: parse_var("JWT_EXPIRATION", 7 * 24 * 3600)?,
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            cache_enabled: parse_var("CACHE_ENABLED", true)?,
            cache_ttl_seconds: parse_var("CACHE_TTL_SECONDS", 3600)?,
            default_page_size: parse_var("DEFAULT_PAGE_SIZE", 10)?,
            max_page_size: parse_var("MAX_PAGE_SIZE", 50)?,
            property_code_retries: parse_var("PROPERTY_CODE_RETRIES", 3)?,
            bcrypt_cost: parse_var("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Rechazar valores que romperían la paginación o el cache
    pub fn validate(&self) -> Result<()> {
        if self.default_page_size < 1 {
            anyhow::bail!("DEFAULT_PAGE_SIZE must be at least 1");
        }
        if self.max_page_size < 1 {
            anyhow::bail!("MAX_PAGE_SIZE must be at least 1");
        }
        // Redis no acepta SETEX con 0 segundos
        if self.cache_ttl_seconds == 0 {
            anyhow::bail!("CACHE_TTL_SECONDS must be at least 1");
        }
        Ok(())
    }

    /// Configuración fija para tests, sin tocar el entorno
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            jwt_secret: "test_jwt_secret".to_string(),
            jwt_expiration: 3600,
            cors_origins: vec!["*".to_string()],
            database_url: String::new(),
            redis_url: String::new(),
            cache_enabled: true,
            cache_ttl_seconds: 3600,
            default_page_size: 10,
            max_page_size: 50,
            property_code_retries: 3,
            bcrypt_cost: 4,
        }
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// CORS abierto cuando no hay orígenes o se usa "*"
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} must be a valid value: {}", name, e)),
        Err(_) => Ok(default),
    }
}
