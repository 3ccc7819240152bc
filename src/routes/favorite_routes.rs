use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::controllers::favorite_controller::{add_favorite, favorite_status, list_favorites, remove_favorite};
use crate::middleware::auth_middleware;
use crate::state::AppState;

pub fn create_favorite_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/:property_id", post(add_favorite).delete(remove_favorite))
        .route("/:property_id/status", get(favorite_status))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
