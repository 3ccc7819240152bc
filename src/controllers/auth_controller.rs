use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use super::json_body;
use crate::dto::{auth_dto::AuthResponse, ApiResponse};
use crate::models::user::{LoginRequest, RegisterRequest};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<AuthResponse>>)> {
    let request = json_body(payload)?;
    let response = state.auth_service.register(request).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<AuthResponse>>> {
    let request = json_body(payload)?;
    let response = state.auth_service.login(request).await?;
    Ok(Json(ApiResponse::success(response)))
}
