use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::json_body;
use crate::dto::{property_dto::PropertyQuery, ApiResponse, ListResponse};
use crate::middleware::AuthenticatedUser;
use crate::models::property::{CreatePropertyRequest, Property, UpdatePropertyRequest};
use crate::state::AppState;
use crate::utils::errors::{bad_request_error, AppResult};

pub async fn search_properties(
    State(state): State<AppState>,
    query: Result<Query<PropertyQuery>, QueryRejection>,
) -> AppResult<Json<ListResponse<Property>>> {
    let Query(query) = query.map_err(|rejection| bad_request_error(&rejection.body_text()))?;
    let (filter, pagination) = query.into_parts(state.property_service.pagination_settings())?;

    let page = state.property_service.search(filter, pagination).await?;
    Ok(Json(ListResponse::from(page)))
}

pub async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let property = state.property_service.get_by_id(id).await?;
    Ok(Json(ApiResponse::success(property)))
}

pub async fn create_property(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreatePropertyRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<Property>>)> {
    let request = json_body(payload)?;
    let property = state.property_service.create(request, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(property))))
}

pub async fn update_property(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    payload: Result<Json<UpdatePropertyRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<Property>>> {
    let changes = json_body(payload)?;
    let property = state.property_service.update(id, changes, user.user_id).await?;
    Ok(Json(ApiResponse::success(property)))
}

pub async fn delete_property(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<()>>> {
    state.property_service.delete(id, user.user_id).await?;
    Ok(Json(ApiResponse::empty("Property deleted successfully")))
}
