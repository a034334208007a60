use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use actix_web::dev::ServiceRequest;
use actix_web::{web, Error, HttpMessage};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::errors::AppError;
use crate::AppState;

/// Tokens expire one hour after issuance.
pub const TOKEN_TTL_HOURS: i64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Patient,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Patient => "patient",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::Forbidden("Se requiere rol de administrador".to_string()))
        }
    }

    /// Admins may act on any record; patients only on their own.
    pub fn require_self_or_admin(&self, id: Uuid) -> Result<(), AppError> {
        if self.is_admin() || (self.role == Role::Patient && self.id == id) {
            Ok(())
        } else {
            Err(AppError::Forbidden("No tiene acceso a este recurso".to_string()))
        }
    }

    /// Credential changes are reserved to the account owner.
    pub fn require_owner(&self, role: Role, id: Uuid) -> Result<(), AppError> {
        if self.role == role && self.id == id {
            Ok(())
        } else {
            Err(AppError::Forbidden("Solo el titular de la cuenta puede hacer este cambio".to_string()))
        }
    }
}

/// Signs and verifies HS256 tokens with a key supplied at construction.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Generates a token asserting `id` and `role`.
    pub fn generate_token(&self, id: Uuid, role: Role) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let claims = Claims {
            id,
            role,
            iat: now.timestamp(),
            exp: (now + chrono::Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Validates a token and returns the claims if valid.
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding, &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
    }
}

/// Validator function for the `HttpAuthentication::bearer` middleware.
/// Valid claims are stored in the request extensions for handlers.
pub async fn validator(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (Error, ServiceRequest)> {
    let claims = match req.app_data::<web::Data<AppState>>() {
        Some(state) => state.tokens.validate_token(credentials.token()),
        None => {
            log::error!("AppState missing from app data");
            return Err((AppError::InternalServerError("Server misconfigured".to_string()).into(), req));
        }
    };

    match claims {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Err(_) => Err((
            AppError::Unauthorized("Token inválido o expirado".to_string()).into(),
            req,
        )),
    }
}
