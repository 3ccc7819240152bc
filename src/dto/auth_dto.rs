use serde::{Deserialize, Serialize};

use crate::models::user::UserSummary;

/// Respuesta de registro y login
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserSummary,
}
