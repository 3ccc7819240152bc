//! Modelo de Property
//!
//! Este módulo contiene el struct Property y sus variantes para CRUD operations.
//! Mapea exactamente a la tabla `properties`; la ubicación se guarda en las
//! columnas `state` y `city`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::{validate_non_negative_price, validate_not_blank};

/// Ubicación de la propiedad
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Location {
    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub state: String,

    #[validate(length(min = 1, max = 100), custom = "validate_not_blank")]
    pub city: String,
}

/// Property principal - mapea exactamente a la tabla properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    /// Código legible `PROP-YYYYMM-NNN`
    #[serde(rename = "propertyId")]
    pub property_code: String,
    pub title: String,
    pub property_type: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[sqlx(flatten)]
    pub location: Location,
    pub area: f64,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub amenities: Vec<String>,
    pub furnished: bool,
    pub available_from: NaiveDate,
    pub listed_by: String,
    pub tags: Vec<String>,
    pub color_theme: Option<String>,
    pub rating: Option<f64>,
    pub is_verified: bool,
    pub listing_type: String,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Property {
    /// Construir una propiedad nueva a partir del request validado
    pub fn new(
        property_code: String,
        request: CreatePropertyRequest,
        created_by: Uuid,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            property_code,
            title: request.title.trim().to_string(),
            property_type: request.property_type,
            price: request.price,
            location: request.location,
            area: request.area,
            bedrooms: request.bedrooms,
            bathrooms: request.bathrooms,
            amenities: request.amenities,
            furnished: request.furnished,
            available_from: request.available_from,
            listed_by: request.listed_by,
            tags: request.tags,
            color_theme: request.color_theme,
            rating: request.rating,
            is_verified: false,
            listing_type: request.listing_type,
            created_by: Some(created_by),
            created_at,
        }
    }

    /// El creador es el único que puede modificar la propiedad.
    /// Una propiedad sin creador no pertenece a nadie.
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        match self.created_by {
            Some(creator) => creator.to_string() == user_id.to_string(),
            None => false,
        }
    }
}

/// Request para crear una nueva propiedad
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePropertyRequest {
    #[validate(length(min = 3, max = 100), custom = "validate_not_blank")]
    pub title: String,

    #[validate(length(min = 1, max = 50))]
    pub property_type: String,

    #[serde(with = "rust_decimal::serde::float")]
    #[validate(custom = "validate_non_negative_price")]
    pub price: Decimal,

    #[validate]
    pub location: Location,

    #[validate(range(min = 0.0))]
    pub area: f64,

    #[validate(range(min = 0, max = 100))]
    pub bedrooms: i32,

    #[validate(range(min = 0, max = 100))]
    pub bathrooms: i32,

    #[serde(default)]
    pub amenities: Vec<String>,

    #[serde(default)]
    pub furnished: bool,

    pub available_from: NaiveDate,

    #[validate(length(min = 1, max = 100))]
    pub listed_by: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(length(max = 32))]
    pub color_theme: Option<String>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,

    #[validate(length(min = 1, max = 50))]
    pub listing_type: String,
}

/// Request para actualizar parcialmente una propiedad existente
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePropertyRequest {
    #[validate(length(min = 3, max = 100), custom = "validate_not_blank")]
    pub title: Option<String>,

    #[validate(length(min = 1, max = 50))]
    pub property_type: Option<String>,

    #[serde(default, with = "rust_decimal::serde::float_option")]
    #[validate(custom = "validate_non_negative_price")]
    pub price: Option<Decimal>,

    #[validate]
    pub location: Option<Location>,

    #[validate(range(min = 0.0))]
    pub area: Option<f64>,

    #[validate(range(min = 0, max = 100))]
    pub bedrooms: Option<i32>,

    #[validate(range(min = 0, max = 100))]
    pub bathrooms: Option<i32>,

    pub amenities: Option<Vec<String>>,

    pub furnished: Option<bool>,

    pub available_from: Option<NaiveDate>,

    #[validate(length(min = 1, max = 100))]
    pub listed_by: Option<String>,

    pub tags: Option<Vec<String>>,

    #[validate(length(max = 32))]
    pub color_theme: Option<String>,

    #[validate(range(min = 0.0, max = 5.0))]
    pub rating: Option<f64>,

    #[validate(length(min = 1, max = 50))]
    pub listing_type: Option<String>,
}

impl UpdatePropertyRequest {
    /// Aplicar los campos presentes sobre la propiedad
    pub fn apply_to(&self, property: &mut Property) {
        if let Some(title) = &self.title {
            property.title = title.trim().to_string();
        }
        if let Some(property_type) = &self.property_type {
            property.property_type = property_type.clone();
        }
        if let Some(price) = self.price {
            property.price = price;
        }
        if let Some(location) = &self.location {
            property.location = location.clone();
        }
        if let Some(area) = self.area {
            property.area = area;
        }
        if let Some(bedrooms) = self.bedrooms {
            property.bedrooms = bedrooms;
        }
        if let Some(bathrooms) = self.bathrooms {
            property.bathrooms = bathrooms;
        }
        if let Some(amenities) = &self.amenities {
            property.amenities = amenities.clone();
        }
        if let Some(furnished) = self.furnished {
            property.furnished = furnished;
        }
        if let Some(available_from) = self.available_from {
            property.available_from = available_from;
        }
        if let Some(listed_by) = &self.listed_by {
            property.listed_by = listed_by.clone();
        }
        if let Some(tags) = &self.tags {
            property.tags = tags.clone();
        }
        if let Some(color_theme) = &self.color_theme {
            property.color_theme = Some(color_theme.clone());
        }
        if let Some(rating) = self.rating {
            property.rating = Some(rating);
        }
        if let Some(listing_type) = &self.listing_type {
            property.listing_type = listing_type.clone();
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.property_type.is_none()
            && self.price.is_none()
            && self.location.is_none()
            && self.area.is_none()
            && self.bedrooms.is_none()
            && self.bathrooms.is_none()
            && self.amenities.is_none()
            && self.furnished.is_none()
            && self.available_from.is_none()
            && self.listed_by.is_none()
            && self.tags.is_none()
            && self.color_theme.is_none()
            && self.rating.is_none()
            && self.listing_type.is_none()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn create_request(title: &str) -> CreatePropertyRequest {
        CreatePropertyRequest {
            title: title.to_string(),
            property_type: "Apartment".to_string(),
            price: Decimal::new(1500, 0),
            location: Location {
                state: "Karnataka".to_string(),
                city: "Bangalore".to_string(),
            },
            area: 1200.0,
            bedrooms: 2,
            bathrooms: 1,
            amenities: vec!["wifi".to_string(), "parking".to_string()],
            furnished: true,
            available_from: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            listed_by: "Owner".to_string(),
            tags: vec!["family".to_string()],
            color_theme: None,
            rating: Some(4.5),
            listing_type: "rent".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::create_request;
    use super::*;

    #[test]
    fn test_ownership_requires_matching_creator() {
        let owner = Uuid::new_v4();
        let property = Property::new("PROP-202401-001".to_string(), create_request("Flat"), owner, Utc::now());

        assert!(property.is_owned_by(owner));
        assert!(!property.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_property_without_creator_has_no_owner() {
        let mut property = Property::new("PROP-202401-001".to_string(), create_request("Flat"), Uuid::new_v4(), Utc::now());
        property.created_by = None;
        assert!(!property.is_owned_by(Uuid::new_v4()));
    }

    #[test]
    fn test_update_applies_only_present_fields() {
        let mut property = Property::new("PROP-202401-001".to_string(), create_request("Flat"), Uuid::new_v4(), Utc::now());
        let update = UpdatePropertyRequest {
            price: Some(Decimal::new(2000, 0)),
            furnished: Some(false),
            ..Default::default()
        };

        update.apply_to(&mut property);

        assert_eq!(property.price, Decimal::new(2000, 0));
        assert!(!property.furnished);
        assert_eq!(property.title, "Flat");
        assert_eq!(property.bedrooms, 2);
        assert!(!update.is_empty());
        assert!(UpdatePropertyRequest::default().is_empty());
    }

    #[test]
    fn test_create_request_validation() {
        assert!(create_request("Nice flat").validate().is_ok());
        assert!(create_request("ab").validate().is_err());

        let mut negative = create_request("Nice flat");
        negative.price = Decimal::new(-1, 0);
        assert!(negative.validate().is_err());
    }

    #[test]
    fn test_serializes_code_as_property_id() {
        let property = Property::new("PROP-202401-007".to_string(), create_request("Flat"), Uuid::new_v4(), Utc::now());
        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["propertyId"], "PROP-202401-007");
        assert_eq!(json["location"]["city"], "Bangalore");
        assert_eq!(json["price"], 1500.0);
    }
}
