//! Códigos legibles de propiedad: `PROP-{YYYY}{MM}-{NNN}`
//!
//! La secuencia se reinicia cada mes y continúa desde la mayor existente
//! con el prefijo del mes, comparada numéricamente.

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PROPERTY_CODE_RE: Regex = Regex::new(r"^PROP-(\d{4})(\d{2})-(\d+)$").unwrap();
}

/// Prefijo del mes, p.ej. `PROP-202401`
pub fn month_prefix(now: DateTime<Utc>) -> String {
    format!("PROP-{}", now.format("%Y%m"))
}

/// Secuencia de un código si pertenece al prefijo dado
pub fn sequence_of(code: &str, prefix: &str) -> Option<u32> {
    let captures = PROPERTY_CODE_RE.captures(code)?;
    let month = format!("PROP-{}{}", &captures[1], &captures[2]);
    if month != prefix {
        return None;
    }
    captures[3].parse().ok()
}

/// Mayor secuencia entre los códigos del mes
pub fn max_sequence<'a, I>(prefix: &str, codes: I) -> Option<u32>
where
    I: IntoIterator<Item = &'a str>,
{
    codes.into_iter().filter_map(|code| sequence_of(code, prefix)).max()
}

/// Siguiente código a partir de la mayor secuencia existente del mes
pub fn next_property_code(now: DateTime<Utc>, latest_sequence: Option<u32>) -> String {
    let sequence = latest_sequence.map_or(1, |latest| latest.saturating_add(1));
    format!("{}-{:03}", month_prefix(now), sequence)
}
