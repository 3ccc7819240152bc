#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::Router;
use http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use rental_listings::cache::InMemoryCache;
use rental_listings::config::EnvironmentConfig;
use rental_listings::repositories::MemoryStore;
use rental_listings::routes::create_router;
use rental_listings::state::{AppState, Stores};

/// Aplicación completa sobre el store y el cache en memoria
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub cache: InMemoryCache,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryStore::new();
        let cache = InMemoryCache::new();
        let state = AppState::new(
            EnvironmentConfig::for_tests(),
            Stores::in_memory(store.clone()),
            Arc::new(cache.clone()),
        );

        Self {
            router: create_router(state),
            store,
            cache,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    /// Registrar un usuario y devolver (token, id)
    pub async fn register(&self, name: &str, email: &str) -> (String, String) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/auth/register",
                None,
                Some(json!({ "name": name, "email": email, "password": "secret123" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    pub async fn create_property(&self, token: &str, body: Value) -> Value {
        let (status, response) = self
            .request(Method::POST, "/api/properties", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", response);
        response["data"].clone()
    }
}

pub fn property_body(title: &str, price: f64, bedrooms: i32, amenities: &[&str]) -> Value {
    json!({
        "title": title,
        "propertyType": "Apartment",
        "price": price,
        "location": { "state": "Karnataka", "city": "Bangalore" },
        "area": 1100.0,
        "bedrooms": bedrooms,
        "bathrooms": 1,
        "amenities": amenities,
        "furnished": true,
        "availableFrom": "2024-06-01",
        "listedBy": "Owner",
        "tags": ["family"],
        "rating": 4.0,
        "listingType": "rent"
    })
}
