use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;

use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    InvalidCredentials,
    Forbidden(String),
    Conflict(String),
    ServiceUnavailable(String),
    InternalServerError(String),
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::ServiceUnavailable(_) => "STORE_UNAVAILABLE",
            AppError::InternalServerError(_) => "INTERNAL_ERROR",
            AppError::BadRequest(_) => "VALIDATION_ERROR",
        }
    }

    fn message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Credenciales incorrectas".to_string(),
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::ServiceUnavailable(msg)
            | AppError::InternalServerError(msg)
            | AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InvalidCredentials => write!(f, "Unauthorized: invalid credentials"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let body = ErrorResponse {
            error: self.message(),
            code: self.code(),
        };
        match self {
            AppError::NotFound(_) => HttpResponse::NotFound().json(body),
            AppError::Unauthorized(_) | AppError::InvalidCredentials => {
                HttpResponse::Unauthorized().json(body)
            }
            AppError::Forbidden(_) => HttpResponse::Forbidden().json(body),
            AppError::Conflict(_) => HttpResponse::Conflict().json(body),
            AppError::ServiceUnavailable(_) => HttpResponse::ServiceUnavailable()
                .insert_header(("Retry-After", "5"))
                .json(body),
            AppError::InternalServerError(_) => HttpResponse::InternalServerError().json(body),
            AppError::BadRequest(_) => HttpResponse::BadRequest().json(body),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => AppError::Conflict("El correo ya está registrado".to_string()),
            StoreError::Unavailable(msg) => {
                log::error!("Store unavailable: {}", msg);
                AppError::ServiceUnavailable("Base de datos no disponible, intente de nuevo".to_string())
            }
            StoreError::Backend(msg) => {
                log::error!("Store error: {}", msg);
                AppError::InternalServerError("Database error".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn duplicate_maps_to_conflict() {
        let err: AppError = StoreError::Duplicate.into();
        assert_eq!(err.error_response().status(), StatusCode::CONFLICT);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn unavailable_store_is_retryable() {
        let err: AppError = StoreError::Unavailable("pool timed out".to_string()).into();
        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(resp.headers().contains_key("Retry-After"));
    }

    #[test]
    fn invalid_credentials_hides_reason() {
        let err = AppError::InvalidCredentials;
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(err.message(), "Credenciales incorrectas");
    }
}
