//! Paginación y orden de listados
//!
//! Convierte `page`/`limit`/`sortBy`/`sortOrder` del cliente en una
//! `Pagination` normalizada y calcula el sobre de la respuesta.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::models::property::Property;
use crate::utils::errors::{bad_request_error, AppError, AppResult};

/// Límites de página configurables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_limit: 10,
            max_limit: 50,
        }
    }
}

/// Campos por los que se puede ordenar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortField {
    Price,
    Bedrooms,
    Bathrooms,
    Area,
    Rating,
    CreatedAt,
    AvailableFrom,
    Title,
    PropertyId,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Price => "price",
            SortField::Bedrooms => "bedrooms",
            SortField::Bathrooms => "bathrooms",
            SortField::Area => "area",
            SortField::Rating => "rating",
            SortField::CreatedAt => "created_at",
            SortField::AvailableFrom => "available_from",
            SortField::Title => "title",
            SortField::PropertyId => "property_code",
        }
    }

    fn compare(&self, a: &Property, b: &Property) -> Ordering {
        match self {
            SortField::Price => a.price.cmp(&b.price),
            SortField::Bedrooms => a.bedrooms.cmp(&b.bedrooms),
            SortField::Bathrooms => a.bathrooms.cmp(&b.bathrooms),
            SortField::Area => a.area.total_cmp(&b.area),
            SortField::Rating => match (a.rating, b.rating) {
                (Some(x), Some(y)) => x.total_cmp(&y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
            SortField::AvailableFrom => a.available_from.cmp(&b.available_from),
            SortField::Title => a.title.cmp(&b.title),
            SortField::PropertyId => a.property_code.cmp(&b.property_code),
        }
    }
}

impl FromStr for SortField {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "price" => Ok(SortField::Price),
            "bedrooms" => Ok(SortField::Bedrooms),
            "bathrooms" => Ok(SortField::Bathrooms),
            "area" => Ok(SortField::Area),
            "rating" => Ok(SortField::Rating),
            "createdAt" => Ok(SortField::CreatedAt),
            "availableFrom" => Ok(SortField::AvailableFrom),
            "title" => Ok(SortField::Title),
            "propertyId" => Ok(SortField::PropertyId),
            other => Err(bad_request_error(&format!("Cannot sort by '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    fn sql(&self) -> &'static str {
        // NULLs primero en ascendente, igual que Option en memoria
        match self {
            SortOrder::Asc => "ASC NULLS FIRST",
            SortOrder::Desc => "DESC NULLS LAST",
        }
    }
}

impl FromStr for SortOrder {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(bad_request_error(&format!("Invalid sort order '{}'", other))),
        }
    }
}

/// Página pedida, ya normalizada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortField>,
    pub sort_order: SortOrder,
}

impl Pagination {
    /// Normalizar parámetros del cliente: page < 1 pasa a 1, limit se recorta
    /// al máximo configurado, limit <= 0 es un error.
    pub fn resolve(
        page: Option<i64>,
        limit: Option<i64>,
        sort_by: Option<&str>,
        sort_order: Option<&str>,
        settings: PaginationSettings,
    ) -> AppResult<Self> {
        let page = page.unwrap_or(1).max(1);
        let max_limit = settings.max_limit.max(1);

        let limit = match limit {
            Some(limit) if limit <= 0 => return Err(bad_request_error("limit must be a positive number")),
            Some(limit) => limit.min(max_limit),
            None => settings.default_limit.clamp(1, max_limit),
        };

        let sort_by = sort_by
            .filter(|value| !value.trim().is_empty())
            .map(SortField::from_str)
            .transpose()?;

        let sort_order = sort_order
            .filter(|value| !value.trim().is_empty())
            .map(SortOrder::from_str)
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            page,
            limit,
            sort_by,
            sort_order,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Orden total: campo pedido y luego fecha de creación e id
    pub fn compare(&self, a: &Property, b: &Property) -> Ordering {
        let primary = match self.sort_by {
            Some(field) => {
                let ordering = field.compare(a, b);
                match self.sort_order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            }
            None => Ordering::Equal,
        };

        primary
            .then_with(|| a.created_at.cmp(&b.created_at))
            .then_with(|| a.id.cmp(&b.id))
    }

    pub fn push_order_and_limit(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" ORDER BY ");
        if let Some(field) = self.sort_by {
            builder.push(field.column());
            builder.push(" ");
            builder.push(self.sort_order.sql());
            builder.push(", ");
        }
        builder.push("created_at ASC, id ASC");
        builder.push(" LIMIT ");
        builder.push_bind(self.limit);
        builder.push(" OFFSET ");
        builder.push_bind(self.offset());
    }
}

/// Metadatos de paginación de la respuesta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

impl PageInfo {
    pub fn new(total: i64, pagination: &Pagination) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total + pagination.limit - 1) / pagination.limit
        };

        Self {
            total,
            page: pagination.page,
            limit: pagination.limit,
            pages,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PageInfo,
}
