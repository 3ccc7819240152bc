use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::controllers::recommendation_controller::{
    received_recommendations, recommend_property, recommendation_stats, recommended_properties,
};
use crate::middleware::auth_middleware;
use crate::state::AppState;

pub fn create_recommendation_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(received_recommendations))
        .route("/properties", get(recommended_properties))
        .route("/stats", get(recommendation_stats))
        .route("/:property_id", post(recommend_property))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
