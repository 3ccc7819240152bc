use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::dto::{property_dto::FavoriteStatus, ApiResponse};
use crate::middleware::AuthenticatedUser;
use crate::models::property::Property;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<Property>>>> {
    let favorites = state.favorite_service.list(user.user_id).await?;
    Ok(Json(ApiResponse::success(favorites)))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(property_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let property = state.favorite_service.add(user.user_id, property_id).await?;
    Ok(Json(ApiResponse::success(property)))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(property_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.favorite_service.remove(user.user_id, property_id).await?;
    Ok(Json(ApiResponse::empty("Property removed from favorites")))
}

pub async fn favorite_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(property_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<FavoriteStatus>>> {
    let is_favorite = state.favorite_service.is_favorite(user.user_id, property_id).await?;
    Ok(Json(ApiResponse::success(FavoriteStatus { is_favorite })))
}
