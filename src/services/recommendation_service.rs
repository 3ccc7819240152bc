//! Servicio de recomendaciones entre usuarios

use log::info;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::cache::{
    cache_aside::read_through,
    invalidation::{current_list_generation, on_recommendations_changed, recommendations_key},
    CacheOperations,
};
use crate::models::{
    property::Property,
    recommendation::{RecommendRequest, Recommendation, RecommendationStats, RecommendationView},
};
use crate::repositories::{PropertyStore, RecommendationStore, UserStore};
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::normalize_email;

pub struct RecommendationService {
    recommendations: Arc<dyn RecommendationStore>,
    properties: Arc<dyn PropertyStore>,
    users: Arc<dyn UserStore>,
    cache: Arc<dyn CacheOperations>,
    cache_ttl: u64,
}

impl RecommendationService {
    pub fn new(
        recommendations: Arc<dyn RecommendationStore>,
        properties: Arc<dyn PropertyStore>,
        users: Arc<dyn UserStore>,
        cache: Arc<dyn CacheOperations>,
        cache_ttl: u64,
    ) -> Self {
        Self {
            recommendations,
            properties,
            users,
            cache,
            cache_ttl,
        }
    }

    pub async fn recommend(&self, from_user_id: Uuid, property_id: Uuid, request: RecommendRequest) -> AppResult<()> {
        request.validate()?;

        if self.properties.find_by_id(property_id).await?.is_none() {
            return Err(AppError::NotFound("Property not found".to_string()));
        }

        let recipient = self
            .users
            .find_by_email(&normalize_email(&request.email))
            .await?
            .ok_or_else(|| AppError::NotFound("Recipient user not found".to_string()))?;

        let recommendation = Recommendation::new(from_user_id, recipient.id, property_id);
        if !self.recommendations.add(&recommendation).await? {
            return Err(AppError::Conflict(
                "Property already recommended to this user".to_string(),
            ));
        }

        info!("📨 Recomendación {} -> {} ({})", from_user_id, recipient.id, property_id);
        on_recommendations_changed(self.cache.as_ref(), recipient.id).await;
        Ok(())
    }

    pub async fn received(&self, user_id: Uuid) -> AppResult<Vec<RecommendationView>> {
        let recommendations = &self.recommendations;
        let load = move || async move { recommendations.received(user_id).await };

        match current_list_generation(self.cache.as_ref()).await {
            Some(generation) => {
                read_through(
                    self.cache.as_ref(),
                    &recommendations_key(generation, user_id),
                    self.cache_ttl,
                    load,
                )
                .await
            }
            None => load().await,
        }
    }

    pub async fn recommended_properties(&self, user_id: Uuid) -> AppResult<Vec<Property>> {
        self.recommendations.recommended_properties(user_id).await
    }

    pub async fn stats(&self, user_id: Uuid) -> AppResult<RecommendationStats> {
        let counts = self.recommendations.count_by_sender(user_id).await?;
        Ok(RecommendationStats::from_counts(counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryCache;
    use crate::models::property::fixtures::create_request;
    use crate::models::user::User;
    use crate::cache::invalidation::on_property_changed;
    use crate::repositories::MemoryStore;
    use chrono::Utc;

    struct Fixture {
        store: MemoryStore,
        cache: InMemoryCache,
        service: RecommendationService,
        sender: User,
        recipient: User,
        property: Property,
    }

    async fn setup() -> Fixture {
        let store = MemoryStore::new();
        let sender = User::new("Sender".to_string(), "sender@example.com".to_string(), "hash".to_string());
        let recipient = User::new("Recipient".to_string(), "recipient@example.com".to_string(), "hash".to_string());
        UserStore::create(&store, &sender).await.unwrap();
        UserStore::create(&store, &recipient).await.unwrap();

        let property = Property::new("PROP-202401-001".to_string(), create_request("Flat"), sender.id, Utc::now());
        store.insert(&property).await.unwrap();

        let cache = InMemoryCache::new();
        let service = RecommendationService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            Arc::new(cache.clone()),
            60,
        );

        Fixture {
            store,
            cache,
            service,
            sender,
            recipient,
            property,
        }
    }

    fn to(email: &str) -> RecommendRequest {
        RecommendRequest {
            email: email.to_string(),
        }
    }

    #[tokio::test]
    async fn test_recommendation_is_visible_to_recipient() {
        let f = setup().await;
        assert!(f.service.received(f.recipient.id).await.unwrap().is_empty());

        f.service
            .recommend(f.sender.id, f.property.id, to("Recipient@example.com"))
            .await
            .unwrap();

        let received = f.service.received(f.recipient.id).await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].from.email, "sender@example.com");
        assert_eq!(received[0].property.id, f.property.id);

        let stats = f.service.stats(f.recipient.id).await.unwrap();
        assert_eq!(stats.total_recommendations, 1);
        assert_eq!(stats.recommendations_by_user[&f.sender.id.to_string()], 1);

        let properties = f.service.recommended_properties(f.recipient.id).await.unwrap();
        assert_eq!(properties.len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_recommendation_conflicts() {
        let f = setup().await;
        f.service
            .recommend(f.sender.id, f.property.id, to("recipient@example.com"))
            .await
            .unwrap();

        let again = f
            .service
            .recommend(f.sender.id, f.property.id, to("recipient@example.com"))
            .await;
        assert!(matches!(again, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unknown_recipient_is_not_found() {
        let f = setup().await;
        let result = f
            .service
            .recommend(f.sender.id, f.property.id, to("nobody@example.com"))
            .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_received_drops_deleted_property() {
        let f = setup().await;
        f.service
            .recommend(f.sender.id, f.property.id, to("recipient@example.com"))
            .await
            .unwrap();
        assert_eq!(f.service.received(f.recipient.id).await.unwrap().len(), 1);

        PropertyStore::delete(&f.store, f.property.id).await.unwrap();
        on_property_changed(&f.cache, f.property.id).await;

        assert!(f.service.received(f.recipient.id).await.unwrap().is_empty());
    }
}
