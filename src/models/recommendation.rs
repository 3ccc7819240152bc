//! Modelo de Recommendation
//!
//! Recomendaciones de propiedades entre usuarios. Una recomendación es única
//! por (remitente, destinatario, propiedad).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

use crate::models::property::Property;
use crate::models::user::UserSummary;
use crate::utils::validation::validate_email_format;

/// Recommendation - mapea a la tabla recommendations
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Recommendation {
    pub id: Uuid,
    pub from_user_id: Uuid,
    pub to_user_id: Uuid,
    pub property_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Recommendation {
    pub fn new(from_user_id: Uuid, to_user_id: Uuid, property_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            from_user_id,
            to_user_id,
            property_id,
            created_at: Utc::now(),
        }
    }
}

/// Recomendación recibida con remitente y propiedad resueltos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationView {
    pub id: Uuid,
    pub from: UserSummary,
    pub property: Property,
    pub date: DateTime<Utc>,
}

/// Request para recomendar una propiedad a otro usuario
#[derive(Debug, Deserialize, Validate)]
pub struct RecommendRequest {
    #[validate(custom = "validate_email_format")]
    pub email: String,
}

/// Estadísticas de recomendaciones recibidas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationStats {
    pub total_recommendations: i64,
    pub recommendations_by_user: BTreeMap<String, i64>,
}

impl RecommendationStats {
    pub fn from_counts(counts: Vec<(Uuid, i64)>) -> Self {
        let mut stats = Self::default();
        for (sender, count) in counts {
            stats.total_recommendations += count;
            *stats.recommendations_by_user.entry(sender.to_string()).or_insert(0) += count;
        }
        stats
    }
}
