//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y normalización de entradas.

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::ValidationError;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[\w-]+(\.[\w-]+)*@([\w-]+\.)+[a-zA-Z]{2,7}$").unwrap();
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar formato de email
pub fn validate_email_format(value: &str) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value.trim()) {
        let mut error = ValidationError::new("email");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un precio no sea negativo
pub fn validate_non_negative_price(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Emails se guardan recortados y en minúsculas
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Partir una lista separada por comas ("wifi,parking")
pub fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|item| item.trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email_format() {
        assert!(validate_email_format("user@example.com").is_ok());
        assert!(validate_email_format("first.last@mail.example.org").is_ok());
        assert!(validate_email_format("user@").is_err());
        assert!(validate_email_format("no-at-sign.com").is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("  ").is_err());
        assert!(validate_not_blank("ok").is_ok());
    }

    #[test]
    fn test_validate_non_negative_price() {
        assert!(validate_non_negative_price(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_price(&Decimal::new(1999, 2)).is_ok());
        assert!(validate_non_negative_price(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  User@Example.COM "), "user@example.com");
    }

    #[test]
    fn test_split_csv() {
        assert_eq!(split_csv("wifi, parking,,gym "), vec!["wifi", "parking", "gym"]);
        assert!(split_csv("").is_empty());
    }
}
