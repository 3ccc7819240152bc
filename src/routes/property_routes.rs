use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::controllers::property_controller::{
    create_property, delete_property, get_property, search_properties, update_property,
};
use crate::middleware::auth_middleware;
use crate::state::AppState;

/// Lectura pública; crear, modificar y borrar requieren token
pub fn create_property_router(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, auth_middleware);

    Router::new()
        .route(
            "/",
            get(search_properties).merge(post(create_property).route_layer(auth.clone())),
        )
        .route(
            "/:id",
            get(get_property).merge(
                put(update_property)
                    .delete(delete_property)
                    .route_layer(auth),
            ),
        )
}
