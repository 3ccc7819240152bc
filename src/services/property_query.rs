//! Construcción de filtros de búsqueda
//!
//! `PropertyFilter` es la entrada del cliente; `build_filter` la traduce a un
//! `FilterExpr` (lista de cláusulas en AND). La misma expresión se renderiza a
//! SQL con parámetros enlazados o se evalúa en memoria sobre una `Property`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use crate::models::property::Property;

/// Filtro de búsqueda de propiedades
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_min: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_max: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub furnished: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl PropertyFilter {
    /// Forma canónica: textos recortados, vacíos descartados, conjuntos
    /// ordenados y sin duplicados. Dos filtros equivalentes producen la
    /// misma clave de cache.
    pub fn normalized(self) -> Self {
        Self {
            state: normalize_text(self.state),
            city: normalize_text(self.city),
            property_type: normalize_text(self.property_type),
            amenities: normalize_set(self.amenities),
            tags: normalize_set(self.tags),
            ..self
        }
    }
}

fn normalize_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_set(values: Vec<String>) -> Vec<String> {
    let mut values: Vec<String> = values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect();
    values.sort();
    values.dedup();
    values
}

/// Campos filtrables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    State,
    City,
    Price,
    Bedrooms,
    Furnished,
    PropertyType,
    Amenities,
    Tags,
}

impl Field {
    pub fn column(&self) -> &'static str {
        match self {
            Field::State => "state",
            Field::City => "city",
            Field::Price => "price",
            Field::Bedrooms => "bedrooms",
            Field::Furnished => "furnished",
            Field::PropertyType => "property_type",
            Field::Amenities => "amenities",
            Field::Tags => "tags",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i32),
    Bool(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    Equals(Field, Value),
    /// Rango inclusivo; cada extremo es opcional
    Range {
        field: Field,
        min: Option<Decimal>,
        max: Option<Decimal>,
    },
    /// Todos los valores deben estar presentes
    ContainsAll(Field, Vec<String>),
}

impl Clause {
    fn matches(&self, property: &Property) -> bool {
        match self {
            Clause::Equals(field, value) => match (field, value) {
                (Field::State, Value::Text(v)) => property.location.state == *v,
                (Field::City, Value::Text(v)) => property.location.city == *v,
                (Field::PropertyType, Value::Text(v)) => property.property_type == *v,
                (Field::Bedrooms, Value::Int(v)) => property.bedrooms == *v,
                (Field::Furnished, Value::Bool(v)) => property.furnished == *v,
                _ => false,
            },
            Clause::Range { field, min, max } => {
                let actual = match field {
                    Field::Price => property.price,
                    _ => return false,
                };
                min.map_or(true, |min| actual >= min) && max.map_or(true, |max| actual <= max)
            }
            Clause::ContainsAll(field, wanted) => {
                let present = match field {
                    Field::Amenities => &property.amenities,
                    Field::Tags => &property.tags,
                    _ => return false,
                };
                wanted.iter().all(|w| present.contains(w))
            }
        }
    }
}

/// Conjunción de cláusulas; vacía = sin restricciones
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterExpr {
    clauses: Vec<Clause>,
}

impl FilterExpr {
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn is_unconstrained(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn matches(&self, property: &Property) -> bool {
        self.clauses.iter().all(|clause| clause.matches(property))
    }

    /// Añadir ` WHERE ...` al builder con todos los valores como parámetros
    pub fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        let mut conditions = 0usize;

        for clause in &self.clauses {
            match clause {
                Clause::Equals(field, value) => {
                    push_separator(builder, &mut conditions);
                    builder.push(field.column());
                    builder.push(" = ");
                    match value {
                        Value::Text(v) => builder.push_bind(v.clone()),
                        Value::Int(v) => builder.push_bind(*v),
                        Value::Bool(v) => builder.push_bind(*v),
                    };
                }
                Clause::Range { field, min, max } => {
                    if let Some(min) = min {
                        push_separator(builder, &mut conditions);
                        builder.push(field.column());
                        builder.push(" >= ");
                        builder.push_bind(*min);
                    }
                    if let Some(max) = max {
                        push_separator(builder, &mut conditions);
                        builder.push(field.column());
                        builder.push(" <= ");
                        builder.push_bind(*max);
                    }
                }
                Clause::ContainsAll(field, values) => {
                    push_separator(builder, &mut conditions);
                    builder.push(field.column());
                    builder.push(" @> ");
                    builder.push_bind(values.clone());
                }
            }
        }
    }
}

fn push_separator(builder: &mut QueryBuilder<'_, Postgres>, conditions: &mut usize) {
    builder.push(if *conditions == 0 { " WHERE " } else { " AND " });
    *conditions += 1;
}

/// Traducir un filtro a su expresión. Los campos ausentes no añaden cláusula.
pub fn build_filter(filter: &PropertyFilter) -> FilterExpr {
    let mut clauses = Vec::new();

    if let Some(state) = &filter.state {
        clauses.push(Clause::Equals(Field::State, Value::Text(state.clone())));
    }
    if let Some(city) = &filter.city {
        clauses.push(Clause::Equals(Field::City, Value::Text(city.clone())));
    }
    if filter.price_min.is_some() || filter.price_max.is_some() {
        clauses.push(Clause::Range {
            field: Field::Price,
            min: filter.price_min,
            max: filter.price_max,
        });
    }
    if let Some(bedrooms) = filter.bedrooms {
        clauses.push(Clause::Equals(Field::Bedrooms, Value::Int(bedrooms)));
    }
    if let Some(furnished) = filter.furnished {
        clauses.push(Clause::Equals(Field::Furnished, Value::Bool(furnished)));
    }
    if let Some(property_type) = &filter.property_type {
        clauses.push(Clause::Equals(Field::PropertyType, Value::Text(property_type.clone())));
    }
    if !filter.amenities.is_empty() {
        clauses.push(Clause::ContainsAll(Field::Amenities, filter.amenities.clone()));
    }
    if !filter.tags.is_empty() {
        clauses.push(Clause::ContainsAll(Field::Tags, filter.tags.clone()));
    }

    FilterExpr { clauses }
}
