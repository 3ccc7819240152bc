//! Rutas de la API
//!
//! Este módulo arma el router completo bajo `/api`.

pub mod auth_routes;
pub mod favorite_routes;
pub mod property_routes;
pub mod recommendation_routes;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;

use crate::middleware::cors_layer;
use crate::state::AppState;

/// Router principal con estado, CORS y trazas HTTP
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_routes::create_auth_router())
        .nest("/properties", property_routes::create_property_router(state.clone()))
        .nest("/favorites", favorite_routes::create_favorite_router(state.clone()))
        .nest(
            "/recommendations",
            recommendation_routes::create_recommendation_router(state.clone()),
        );

    Router::new()
        .nest("/api", api)
        .layer(cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let cache_healthy = state.cache.health_check().await;

    Json(json!({
        "success": true,
        "status": "OK",
        "environment": state.config.environment,
        "cache": {
            "backend": state.cache.backend_name(),
            "healthy": cache_healthy,
        },
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
