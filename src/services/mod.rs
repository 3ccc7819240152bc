//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: búsqueda y
//! CRUD de propiedades, favoritos, recomendaciones y autenticación.

pub mod auth_service;
pub mod favorite_service;
pub mod pagination;
pub mod property_code;
pub mod property_query;
pub mod property_service;
pub mod recommendation_service;

pub use auth_service::AuthService;
pub use favorite_service::FavoriteService;
pub use property_service::{PropertyService, PropertySettings};
pub use recommendation_service::RecommendationService;
