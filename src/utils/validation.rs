use chrono::{DateTime, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::errors::AppError;

lazy_static! {
    static ref WHATSAPP_RE: Regex = Regex::new(r"^\+?[0-9]{7,15}$").expect("valid regex");
    static ref PLAN_URL_RE: Regex =
        Regex::new(r"^https?://[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}(:[0-9]+)?(/[^\s]*)?$").expect("valid regex");
    static ref PLAN_PATH_RE: Regex =
        Regex::new(r"(?i)^[^\s]+\.(pdf|doc|docx)$").expect("valid regex");
}

/// bcrypt only reads the first 72 bytes of a password.
pub const MAX_PASSWORD_BYTES: usize = 72;

pub const DEFAULT_PAGE_LIMIT: i64 = 10;
pub const MAX_PAGE_LIMIT: i64 = 100;

pub fn validate_payload<T: Validate>(payload: &T) -> Result<(), AppError> {
    payload.validate()
        .map_err(|err| AppError::BadRequest(err.to_string()))
}

/// Used as a `validator` custom rule on new passwords.
pub fn validate_password_bytes(contrasena: &str) -> Result<(), ValidationError> {
    if contrasena.len() > MAX_PASSWORD_BYTES {
        let mut err = ValidationError::new("length");
        err.message = Some(Cow::from("La contraseña no puede superar 72 bytes"));
        return Err(err);
    }
    Ok(())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp. Dates after `today` are rejected.
pub fn parse_fecha_nacimiento(raw: &str, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let fecha = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| AppError::BadRequest("fechaNacimiento debe tener formato YYYY-MM-DD".to_string()))?;
    if fecha > today {
        return Err(AppError::BadRequest(
            "fechaNacimiento no puede estar en el futuro".to_string(),
        ));
    }
    Ok(fecha)
}

pub fn validate_whatsapp(numero: &str) -> Result<(), AppError> {
    if !WHATSAPP_RE.is_match(numero) {
        return Err(AppError::BadRequest("numeroWhatsapp inválido".to_string()));
    }
    Ok(())
}

/// A plan is either a download URL or a stored PDF/Word file path.
pub fn validate_plan(plan: &str) -> Result<(), AppError> {
    if PLAN_URL_RE.is_match(plan) || PLAN_PATH_RE.is_match(plan) {
        return Ok(());
    }
    Err(AppError::BadRequest(
        "plan debe ser una URL o la ruta de un archivo PDF o Word".to_string(),
    ))
}

/// Password and photo changes have their own endpoints.
pub fn reject_credential_fields(
    contrasena: &Option<serde_json::Value>,
    foto_perfil: &Option<serde_json::Value>,
) -> Result<(), AppError> {
    if contrasena.is_some() {
        return Err(AppError::BadRequest(
            "contrasena no puede modificarse por esta ruta".to_string(),
        ));
    }
    if foto_perfil.is_some() {
        return Err(AppError::BadRequest(
            "fotoPerfil no puede modificarse por esta ruta".to_string(),
        ));
    }
    Ok(())
}

#[derive(Deserialize, Debug, Default)]
pub struct PageQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
}

impl Pagination {
    pub fn from_query(page: Option<i64>, limit: Option<i64>) -> Result<Self, AppError> {
        let page = page.unwrap_or(1);
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT);
        if page < 1 {
            return Err(AppError::BadRequest("page debe ser mayor o igual a 1".to_string()));
        }
        if limit < 1 {
            return Err(AppError::BadRequest("limit debe ser mayor o igual a 1".to_string()));
        }
        Ok(Self {
            page,
            limit: limit.min(MAX_PAGE_LIMIT),
        })
    }

    pub fn skip(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub fn total_pages(&self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fecha_accepts_date_and_timestamp() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let expected = NaiveDate::from_ymd_opt(1990, 5, 15).unwrap();
        assert_eq!(parse_fecha_nacimiento("1990-05-15", today).unwrap(), expected);
        assert_eq!(parse_fecha_nacimiento("1990-05-15T00:00:00.000Z", today).unwrap(), expected);
        assert!(parse_fecha_nacimiento("15/05/1990", today).is_err());
    }

    #[test]
    fn fecha_in_the_future_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parse_fecha_nacimiento("2025-03-01", today).unwrap(), today);
        assert!(matches!(
            parse_fecha_nacimiento("2025-03-02", today),
            Err(AppError::BadRequest(_))
        ));
        assert!(parse_fecha_nacimiento("2999-01-01T00:00:00Z", today).is_err());
    }

    #[test]
    fn password_limit_counts_bytes() {
        assert!(validate_password_bytes(&"a".repeat(72)).is_ok());
        assert!(validate_password_bytes(&"a".repeat(73)).is_err());
        // 40 characters, 80 bytes.
        assert!(validate_password_bytes(&"ñ".repeat(40)).is_err());
        assert!(validate_password_bytes(&"ñ".repeat(36)).is_ok());
    }

    #[test]
    fn plan_accepts_urls_and_documents() {
        assert!(validate_plan("https://cdn.nutri.mx/planes/semana1.pdf").is_ok());
        assert!(validate_plan("uploads/plan-ana.DOCX").is_ok());
        assert!(validate_plan("uploads/plan.exe").is_err());
        assert!(validate_plan("").is_err());
    }

    #[test]
    fn whatsapp_numbers() {
        assert!(validate_whatsapp("+5215512345678").is_ok());
        assert!(validate_whatsapp("5512345678").is_ok());
        assert!(validate_whatsapp("55-1234").is_err());
    }

    #[test]
    fn pagination_defaults_and_bounds() {
        let p = Pagination::from_query(None, None).unwrap();
        assert_eq!(p, Pagination { page: 1, limit: DEFAULT_PAGE_LIMIT });
        assert_eq!(p.skip(), 0);

        let p = Pagination::from_query(Some(3), Some(500)).unwrap();
        assert_eq!(p.limit, MAX_PAGE_LIMIT);
        assert_eq!(p.skip(), 200);

        assert!(Pagination::from_query(Some(0), None).is_err());
        assert!(Pagination::from_query(None, Some(0)).is_err());
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination { page: 1, limit: 10 };
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(10), 1);
        assert_eq!(p.total_pages(11), 2);
    }
}
