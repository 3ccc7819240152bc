//! Repositorios
//!
//! Acceso a datos detrás de traits, con implementación PostgreSQL (sqlx)
//! y una implementación en memoria para tests y ejecuciones locales.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::{
    property::{Property, UpdatePropertyRequest},
    recommendation::{Recommendation, RecommendationView},
    user::User,
};
use crate::services::{pagination::Pagination, property_query::FilterExpr};
use crate::utils::errors::AppResult;

pub mod favorite_repository;
pub mod memory;
pub mod property_repository;
pub mod recommendation_repository;
pub mod user_repository;

pub use favorite_repository::FavoriteRepository;
pub use memory::MemoryStore;
pub use property_repository::PropertyRepository;
pub use recommendation_repository::RecommendationRepository;
pub use user_repository::UserRepository;

#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn find(&self, filter: &FilterExpr, pagination: &Pagination) -> AppResult<Vec<Property>>;

    async fn count(&self, filter: &FilterExpr) -> AppResult<i64>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>>;

    /// Mayor secuencia numérica entre los códigos con el prefijo del mes
    async fn latest_code_sequence(&self, prefix: &str) -> AppResult<Option<u32>>;

    /// Falla con violación de unicidad si el código ya existe
    async fn insert(&self, property: &Property) -> AppResult<Property>;

    /// Update atómico de los campos presentes; `None` si no existe
    async fn update(&self, id: Uuid, changes: &UpdatePropertyRequest) -> AppResult<Option<Property>>;

    /// `true` si se eliminó
    async fn delete(&self, id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `Conflict` si el email ya está registrado
    async fn create(&self, user: &User) -> AppResult<User>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
}

#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Insertar si no existe; `false` si ya estaba
    async fn add(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool>;

    /// `false` si no estaba
    async fn remove(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool>;

    async fn exists(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool>;

    async fn list_properties(&self, user_id: Uuid) -> AppResult<Vec<Property>>;
}

#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Insertar si no existe (remitente, destinatario, propiedad); `false` si ya estaba
    async fn add(&self, recommendation: &Recommendation) -> AppResult<bool>;

    async fn received(&self, to_user_id: Uuid) -> AppResult<Vec<RecommendationView>>;

    async fn recommended_properties(&self, to_user_id: Uuid) -> AppResult<Vec<Property>>;

    /// Recomendaciones recibidas agrupadas por remitente
    async fn count_by_sender(&self, to_user_id: Uuid) -> AppResult<Vec<(Uuid, i64)>>;
}
