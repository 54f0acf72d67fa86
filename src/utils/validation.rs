//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de fechas entre texto ISO-8601 y `DateTime<Utc>`.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use validator::ValidationError;

/// Formatos ISO-8601 sin zona horaria aceptados (se interpretan como UTC)
const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Años que RFC 3339 puede escribir y volver a leer (cuatro dígitos, UTC)
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// Intenta interpretar un texto como fecha; `None` si no es una fecha válida.
///
/// Acepta RFC 3339 con offset, fecha-hora sin offset (UTC) y fecha sola
/// (medianoche UTC). Fechas fuera de los años 0000-9999 en UTC devuelven
/// `None`. Quien llama decide si un `None` se omite, se rechaza o se
/// considera corrupción.
pub fn parse_date_or_none(value: &str) -> Option<DateTime<Utc>> {
    parse_any_format(value).filter(|dt| STORABLE_YEARS.contains(&dt.year()))
}

fn parse_any_format(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Validar y convertir string a datetime
pub fn validate_datetime(value: &str) -> Result<DateTime<Utc>, ValidationError> {
    parse_date_or_none(value).ok_or_else(|| {
        let mut error = ValidationError::new("datetime");
        error.add_param("value".into(), &value.to_string());
        error.add_param("format".into(), &"ISO-8601".to_string());
        error
    })
}

/// Formato canónico de almacenamiento (RFC 3339, UTC con sufijo `Z`)
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Validar que un nombre sea un identificador SQL simple
pub fn validate_sql_identifier(value: &str) -> Result<(), ValidationError> {
    let mut chars = value.chars();
    let valid = match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    };

    if !valid {
        let mut error = ValidationError::new("sql_identifier");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}
