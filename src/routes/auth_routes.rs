use axum::{routing::post, Router};

use crate::controllers::auth_controller::{login, register};
use crate::state::AppState;

pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}
