//! Unified login for nutritionists and patients.
//!
//! The role is decided by which collection owns the email: admins are
//! probed first, then usuarios. An email present in both resolves to admin.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{admin::Admin, usuario::Usuario};
use crate::store::{IdentityStore, StoreError};
use crate::utils::jwt::{Role, TokenService};
use crate::utils::password::PasswordHasher;

#[derive(Serialize, Debug)]
pub struct Session {
    pub token: String,
    pub role: Role,
    pub id: Uuid,
    pub nombre: String,
}

#[derive(Debug)]
pub enum AuthError {
    /// No admin or usuario owns the email.
    AccountNotFound,
    /// The email matched but the password did not.
    InvalidCredentials,
    Store(StoreError),
    Internal(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::AccountNotFound => write!(f, "account not found"),
            AuthError::InvalidCredentials => write!(f, "invalid credentials"),
            AuthError::Store(err) => write!(f, "{}", err),
            AuthError::Internal(msg) => write!(f, "{}", msg),
        }
    }
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        AuthError::Store(err)
    }
}

// Account-not-found and wrong-password map to the same 401.
impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AccountNotFound | AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::Store(err) => err.into(),
            AuthError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

struct Identity {
    id: Uuid,
    nombre: String,
    digest: String,
    role: Role,
}

#[derive(Clone)]
pub struct Authenticator {
    admins: Arc<dyn IdentityStore<Admin>>,
    usuarios: Arc<dyn IdentityStore<Usuario>>,
    passwords: PasswordHasher,
    tokens: TokenService,
}

impl Authenticator {
    pub fn new(
        admins: Arc<dyn IdentityStore<Admin>>,
        usuarios: Arc<dyn IdentityStore<Usuario>>,
        passwords: PasswordHasher,
        tokens: TokenService,
    ) -> Self {
        Self {
            admins,
            usuarios,
            passwords,
            tokens,
        }
    }

    async fn lookup(&self, correo: &str) -> Result<Option<Identity>, AuthError> {
        if let Some(admin) = self.admins.find_by_email(correo).await? {
            return Ok(Some(Identity {
                id: admin.id,
                nombre: admin.nombre,
                digest: admin.contrasena,
                role: Role::Admin,
            }));
        }

        Ok(self.usuarios.find_by_email(correo).await?.map(|usuario| Identity {
            id: usuario.id,
            nombre: usuario.nombre,
            digest: usuario.contrasena,
            role: Role::Patient,
        }))
    }

    pub async fn authenticate(&self, correo: &str, contrasena: &str) -> Result<Session, AuthError> {
        let identity = match self.lookup(correo).await? {
            Some(identity) => identity,
            None => {
                self.passwords.verify_dummy(contrasena).await;
                return Err(AuthError::AccountNotFound);
            }
        };

        let is_valid = self
            .passwords
            .verify(contrasena, &identity.digest)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        if !is_valid {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .generate_token(identity.id, identity.role)
            .map_err(|_| AuthError::Internal("Token generation error".to_string()))?;

        Ok(Session {
            token,
            role: identity.role,
            id: identity.id,
            nombre: identity.nombre,
        })
    }
}
