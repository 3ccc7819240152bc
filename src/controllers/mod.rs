//! Controllers (handlers HTTP)
//!
//! Cada handler extrae la request, delega en el servicio y envuelve el
//! resultado en el sobre de respuesta.

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::utils::errors::{AppError, AppResult};

pub mod auth_controller;
pub mod favorite_controller;
pub mod property_controller;
pub mod recommendation_controller;

/// Cuerpo JSON mal formado o incompleto como 400 con el sobre de error
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}
