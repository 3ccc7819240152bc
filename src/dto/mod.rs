//! DTOs de la API
//!
//! Sobres de respuesta y parámetros de entrada que no son modelos.

pub mod api_response;
pub mod auth_dto;
pub mod property_dto;

pub use api_response::{ApiResponse, ListResponse};
