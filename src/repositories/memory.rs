//! Almacén en memoria
//!
//! Implementa los mismos traits que los repositorios PostgreSQL sobre
//! colecciones protegidas por `RwLock`. Las operaciones de unicidad
//! (email, código, favorito, recomendación) se comprueban bajo el lock de
//! escritura, así que son atómicas igual que en la base de datos.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{FavoriteStore, PropertyStore, RecommendationStore, UserStore};
use crate::models::{
    property::{Property, UpdatePropertyRequest},
    recommendation::{Recommendation, RecommendationView},
    user::{User, UserSummary},
};
use crate::services::{pagination::Pagination, property_code::max_sequence, property_query::FilterExpr};
use crate::utils::errors::{conflict_error, AppResult};

#[derive(Default)]
struct Collections {
    users: HashMap<Uuid, User>,
    properties: HashMap<Uuid, Property>,
    favorites: Vec<(Uuid, Uuid, DateTime<Utc>)>,
    recommendations: Vec<Recommendation>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<Collections>>,
    property_queries: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Número de consultas de lectura de propiedades (búsqueda, conteo, por id)
    pub fn property_queries(&self) -> usize {
        self.property_queries.load(Ordering::SeqCst)
    }

    fn record_property_query(&self) {
        self.property_queries.fetch_add(1, Ordering::SeqCst);
    }
}

fn sorted_by_creation(mut properties: Vec<Property>) -> Vec<Property> {
    properties.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    properties
}

#[async_trait]
impl PropertyStore for MemoryStore {
    async fn find(&self, filter: &FilterExpr, pagination: &Pagination) -> AppResult<Vec<Property>> {
        self.record_property_query();
        let data = self.inner.read().await;

        let mut matching: Vec<Property> = data
            .properties
            .values()
            .filter(|property| filter.matches(property))
            .cloned()
            .collect();
        matching.sort_by(|a, b| pagination.compare(a, b));

        Ok(matching
            .into_iter()
            .skip(pagination.offset().max(0) as usize)
            .take(pagination.limit.max(0) as usize)
            .collect())
    }

    async fn count(&self, filter: &FilterExpr) -> AppResult<i64> {
        self.record_property_query();
        let data = self.inner.read().await;
        Ok(data.properties.values().filter(|p| filter.matches(p)).count() as i64)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Property>> {
        self.record_property_query();
        Ok(self.inner.read().await.properties.get(&id).cloned())
    }

    async fn latest_code_sequence(&self, prefix: &str) -> AppResult<Option<u32>> {
        let data = self.inner.read().await;
        Ok(max_sequence(
            prefix,
            data.properties.values().map(|p| p.property_code.as_str()),
        ))
    }

    async fn insert(&self, property: &Property) -> AppResult<Property> {
        let mut data = self.inner.write().await;
        if data
            .properties
            .values()
            .any(|p| p.property_code == property.property_code)
        {
            return Err(conflict_error("Property", "propertyId", &property.property_code));
        }
        data.properties.insert(property.id, property.clone());
        Ok(property.clone())
    }

    async fn update(&self, id: Uuid, changes: &UpdatePropertyRequest) -> AppResult<Option<Property>> {
        let mut data = self.inner.write().await;
        Ok(data.properties.get_mut(&id).map(|property| {
            changes.apply_to(property);
            property.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let mut data = self.inner.write().await;
        let removed = data.properties.remove(&id).is_some();
        if removed {
            data.favorites.retain(|(_, property_id, _)| *property_id != id);
            data.recommendations.retain(|r| r.property_id != id);
        }
        Ok(removed)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: &User) -> AppResult<User> {
        let mut data = self.inner.write().await;
        if data.users.values().any(|u| u.email == user.email) {
            return Err(conflict_error("User", "email", &user.email));
        }
        data.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let data = self.inner.read().await;
        Ok(data.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl FavoriteStore for MemoryStore {
    async fn add(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool> {
        let mut data = self.inner.write().await;
        if data
            .favorites
            .iter()
            .any(|(u, p, _)| *u == user_id && *p == property_id)
        {
            return Ok(false);
        }
        data.favorites.push((user_id, property_id, Utc::now()));
        Ok(true)
    }

    async fn remove(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool> {
        let mut data = self.inner.write().await;
        let before = data.favorites.len();
        data.favorites
            .retain(|(u, p, _)| !(*u == user_id && *p == property_id));
        Ok(data.favorites.len() < before)
    }

    async fn exists(&self, user_id: Uuid, property_id: Uuid) -> AppResult<bool> {
        let data = self.inner.read().await;
        Ok(data
            .favorites
            .iter()
            .any(|(u, p, _)| *u == user_id && *p == property_id))
    }

    async fn list_properties(&self, user_id: Uuid) -> AppResult<Vec<Property>> {
        let data = self.inner.read().await;
        Ok(data
            .favorites
            .iter()
            .filter(|(u, _, _)| *u == user_id)
            .filter_map(|(_, p, _)| data.properties.get(p).cloned())
            .collect())
    }
}

#[async_trait]
impl RecommendationStore for MemoryStore {
    async fn add(&self, recommendation: &Recommendation) -> AppResult<bool> {
        let mut data = self.inner.write().await;
        if data.recommendations.iter().any(|r| {
            r.from_user_id == recommendation.from_user_id
                && r.to_user_id == recommendation.to_user_id
                && r.property_id == recommendation.property_id
        }) {
            return Ok(false);
        }
        data.recommendations.push(recommendation.clone());
        Ok(true)
    }

    async fn received(&self, to_user_id: Uuid) -> AppResult<Vec<RecommendationView>> {
        let data = self.inner.read().await;
        Ok(data
            .recommendations
            .iter()
            .filter(|r| r.to_user_id == to_user_id)
            .filter_map(|r| {
                let from = data.users.get(&r.from_user_id)?;
                let property = data.properties.get(&r.property_id)?;
                Some(RecommendationView {
                    id: r.id,
                    from: UserSummary::from(from),
                    property: property.clone(),
                    date: r.created_at,
                })
            })
            .collect())
    }

    async fn recommended_properties(&self, to_user_id: Uuid) -> AppResult<Vec<Property>> {
        let data = self.inner.read().await;
        let properties: Vec<Property> = data
            .properties
            .values()
            .filter(|p| {
                data.recommendations
                    .iter()
                    .any(|r| r.to_user_id == to_user_id && r.property_id == p.id)
            })
            .cloned()
            .collect();
        Ok(sorted_by_creation(properties))
    }

    async fn count_by_sender(&self, to_user_id: Uuid) -> AppResult<Vec<(Uuid, i64)>> {
        let data = self.inner.read().await;
        let mut counts: HashMap<Uuid, i64> = HashMap::new();
        for r in data.recommendations.iter().filter(|r| r.to_user_id == to_user_id) {
            *counts.entry(r.from_user_id).or_insert(0) += 1;
        }
        Ok(counts.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::property::fixtures::create_request;
    use crate::services::pagination::{PaginationSettings, SortField};
    use crate::services::property_query::{build_filter, PropertyFilter};
    use crate::utils::errors::AppError;

    fn property(code: &str, bedrooms: i32) -> Property {
        let mut request = create_request("Flat");
        request.bedrooms = bedrooms;
        Property::new(code.to_string(), request, Uuid::new_v4(), Utc::now())
    }

    #[tokio::test]
    async fn test_duplicate_code_is_unique_violation() {
        let store = MemoryStore::new();
        store.insert(&property("PROP-202401-001", 1)).await.unwrap();

        let err = store.insert(&property("PROP-202401-001", 2)).await.unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[tokio::test]
    async fn test_find_filters_sorts_and_pages() {
        let store = MemoryStore::new();
        for (i, bedrooms) in [3, 1, 2, 5].into_iter().enumerate() {
            store
                .insert(&property(&format!("PROP-202401-00{}", i + 1), bedrooms))
                .await
                .unwrap();
        }

        let pagination = Pagination::resolve(Some(1), Some(2), Some("bedrooms"), Some("desc"), PaginationSettings::default()).unwrap();
        assert_eq!(pagination.sort_by, Some(SortField::Bedrooms));
        let everything = build_filter(&PropertyFilter::default());

        let page = store.find(&everything, &pagination).await.unwrap();
        let bedrooms: Vec<i32> = page.iter().map(|p| p.bedrooms).collect();
        assert_eq!(bedrooms, vec![5, 3]);
        assert_eq!(store.count(&everything).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_latest_code_sequence_is_numeric() {
        let store = MemoryStore::new();
        store.insert(&property("PROP-202401-999", 1)).await.unwrap();
        store.insert(&property("PROP-202401-1000", 1)).await.unwrap();
        store.insert(&property("PROP-202402-005", 1)).await.unwrap();

        assert_eq!(store.latest_code_sequence("PROP-202401").await.unwrap(), Some(1000));
        assert_eq!(store.latest_code_sequence("PROP-202403").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_favorite_add_is_idempotent_and_delete_cascades() {
        let store = MemoryStore::new();
        let user = User::new("Asha".to_string(), "asha@example.com".to_string(), "hash".to_string());
        let flat = property("PROP-202401-001", 2);
        UserStore::create(&store, &user).await.unwrap();
        store.insert(&flat).await.unwrap();

        assert!(FavoriteStore::add(&store, user.id, flat.id).await.unwrap());
        assert!(!FavoriteStore::add(&store, user.id, flat.id).await.unwrap());

        assert!(PropertyStore::delete(&store, flat.id).await.unwrap());
        assert!(!store.exists(user.id, flat.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let store = MemoryStore::new();
        let user = User::new("Asha".to_string(), "asha@example.com".to_string(), "hash".to_string());
        UserStore::create(&store, &user).await.unwrap();

        let twin = User::new("Other".to_string(), "asha@example.com".to_string(), "hash".to_string());
        assert!(matches!(UserStore::create(&store, &twin).await, Err(AppError::Conflict(_))));
    }
}
