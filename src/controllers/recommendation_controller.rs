use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use uuid::Uuid;

use super::json_body;
use crate::dto::ApiResponse;
use crate::middleware::AuthenticatedUser;
use crate::models::{
    property::Property,
    recommendation::{RecommendRequest, RecommendationStats, RecommendationView},
};
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub async fn received_recommendations(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<RecommendationView>>>> {
    let recommendations = state.recommendation_service.received(user.user_id).await?;
    Ok(Json(ApiResponse::success(recommendations)))
}

pub async fn recommended_properties(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<Vec<Property>>>> {
    let properties = state.recommendation_service.recommended_properties(user.user_id).await?;
    Ok(Json(ApiResponse::success(properties)))
}

pub async fn recommendation_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> AppResult<Json<ApiResponse<RecommendationStats>>> {
    let stats = state.recommendation_service.stats(user.user_id).await?;
    Ok(Json(ApiResponse::success(stats)))
}

pub async fn recommend_property(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(property_id): Path<Uuid>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> AppResult<Json<ApiResponse<()>>> {
    let request = json_body(payload)?;
    state
        .recommendation_service
        .recommend(user.user_id, property_id, request)
        .await?;
    Ok(Json(ApiResponse::empty("Property recommended successfully")))
}
