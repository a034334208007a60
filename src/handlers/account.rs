use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::Account;
use crate::store::{IdentityStore, Record};
use crate::utils::password::PasswordHasher;
use crate::utils::validation::{validate_password_bytes, validate_payload};

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    #[validate(length(min = 1, message = "contrasenaActual es obligatoria"))]
    contrasena_actual: String,

    #[validate(
        length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"),
        custom = "validate_password_bytes"
    )]
    contrasena_nueva: String,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUpdate {
    #[validate(url(message = "fotoPerfil debe ser una URL válida"))]
    foto_perfil: String,
}

/// Re-verifies the current password before storing the new hash.
pub(crate) async fn change_password<T: Record + Account>(
    store: &dyn IdentityStore<T>,
    passwords: &PasswordHasher,
    id: Uuid,
    req: PasswordChange,
    not_found: &str,
) -> Result<(), AppError> {
    validate_payload(&req)?;

    let mut record = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found.to_string()))?;

    if !passwords.verify(&req.contrasena_actual, record.contrasena()).await? {
        return Err(AppError::InvalidCredentials);
    }

    record.set_contrasena(passwords.hash(&req.contrasena_nueva).await?);
    record.touch(Utc::now());

    if !store.update(&record).await? {
        return Err(AppError::NotFound(not_found.to_string()));
    }
    Ok(())
}

pub(crate) async fn update_photo<T: Record + Account>(
    store: &dyn IdentityStore<T>,
    id: Uuid,
    req: PhotoUpdate,
    not_found: &str,
) -> Result<T, AppError> {
    validate_payload(&req)?;

    let mut record = store
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(not_found.to_string()))?;

    record.set_foto_perfil(Some(req.foto_perfil));
    record.touch(Utc::now());

    if !store.update(&record).await? {
        return Err(AppError::NotFound(not_found.to_string()));
    }
    Ok(record)
}
