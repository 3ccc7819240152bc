//! Parámetros de búsqueda de propiedades
//!
//! El query string es plano (`state`, `priceMin`, `amenities=wifi,parking`);
//! también se aceptan `location.state` y `location.city`.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::services::pagination::{Pagination, PaginationSettings};
use crate::services::property_query::PropertyFilter;
use crate::utils::errors::{bad_request_error, AppResult};
use crate::utils::validation::split_csv;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyQuery {
    #[serde(alias = "location.state")]
    pub state: Option<String>,
    #[serde(alias = "location.city")]
    pub city: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub bedrooms: Option<i32>,
    pub furnished: Option<bool>,
    pub property_type: Option<String>,
    pub amenities: Option<String>,
    pub tags: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

impl PropertyQuery {
    /// Separar en filtro y paginación validados
    pub fn into_parts(self, settings: PaginationSettings) -> AppResult<(PropertyFilter, Pagination)> {
        let pagination = Pagination::resolve(
            self.page,
            self.limit,
            self.sort_by.as_deref(),
            self.sort_order.as_deref(),
            settings,
        )?;

        let price_min = parse_price("priceMin", self.price_min)?;
        let price_max = parse_price("priceMax", self.price_max)?;
        if let (Some(min), Some(max)) = (price_min, price_max) {
            if min > max {
                return Err(bad_request_error("priceMin cannot be greater than priceMax"));
            }
        }

        let filter = PropertyFilter {
            state: self.state,
            city: self.city,
            price_min,
            price_max,
            bedrooms: self.bedrooms,
            furnished: self.furnished,
            property_type: self.property_type,
            amenities: self.amenities.as_deref().map(split_csv).unwrap_or_default(),
            tags: self.tags.as_deref().map(split_csv).unwrap_or_default(),
        };

        Ok((filter.normalized(), pagination))
    }
}

fn parse_price(name: &str, value: Option<f64>) -> AppResult<Option<Decimal>> {
    match value {
        None => Ok(None),
        Some(v) if v.is_finite() && v >= 0.0 => Decimal::from_f64(v)
            .map(Some)
            .ok_or_else(|| bad_request_error(&format!("{} is not a valid price", name))),
        Some(_) => Err(bad_request_error(&format!("{} must be a non-negative number", name))),
    }
}

/// `{ isFavorite }`
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteStatus {
    pub is_favorite: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::pagination::SortField;
    use axum::extract::Query;
    use axum::http::Uri;

    fn parse(query: &str) -> PropertyQuery {
        let uri: Uri = format!("http://localhost/api/properties?{}", query).parse().unwrap();
        Query::<PropertyQuery>::try_from_uri(&uri).unwrap().0
    }

    #[test]
    fn test_flat_and_dotted_location() {
        let (filter, _) = parse("location.city=Bangalore&state=Karnataka")
            .into_parts(PaginationSettings::default())
            .unwrap();
        assert_eq!(filter.city.as_deref(), Some("Bangalore"));
        assert_eq!(filter.state.as_deref(), Some("Karnataka"));
    }

    #[test]
    fn test_csv_sets_and_prices() {
        let (filter, pagination) = parse("amenities=wifi,%20parking&priceMin=100&priceMax=250.5&sortBy=price&page=2&limit=5")
            .into_parts(PaginationSettings::default())
            .unwrap();

        assert_eq!(filter.amenities, vec!["parking", "wifi"]);
        assert_eq!(filter.price_min, Some(Decimal::new(100, 0)));
        assert_eq!(filter.price_max, Some(Decimal::new(2505, 1)));
        assert_eq!(pagination.sort_by, Some(SortField::Price));
        assert_eq!(pagination.offset(), 5);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert!(parse("priceMin=10&priceMax=5")
            .into_parts(PaginationSettings::default())
            .is_err());
        assert!(parse("priceMin=-1")
            .into_parts(PaginationSettings::default())
            .is_err());
        assert!(parse("limit=0")
            .into_parts(PaginationSettings::default())
            .is_err());
    }
}
