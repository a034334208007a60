use actix_web::{web, HttpResponse};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::errors::AppError;
use crate::handlers::usuarios::{build_usuario, CreateUsuarioRequest};
use crate::models::usuario::Usuario;
use crate::services::auth::AuthError;
use crate::utils::jwt::Role;
use crate::utils::validation::validate_payload;
use crate::AppState;

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Formato de correo inválido"))]
    correo: String,

    #[validate(length(min = 1, message = "contrasena es obligatoria"))]
    contrasena: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    usuario: Usuario,
    token: String,
}

// POST /login-unificado
pub async fn login(
    req: web::Json<LoginRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    validate_payload(&*req)?;

    match state.auth.authenticate(&req.correo, &req.contrasena).await {
        Ok(session) => {
            info!("{} {} logged in", session.role.as_str(), session.id);
            Ok(HttpResponse::Ok().json(session))
        }
        Err(err) => {
            if matches!(err, AuthError::AccountNotFound | AuthError::InvalidCredentials) {
                warn!("Rejected login attempt: {}", err);
            }
            Err(err.into())
        }
    }
}

// POST /usuarios/register
pub async fn register(
    req: web::Json<CreateUsuarioRequest>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let usuario = build_usuario(&state, req.into_inner()).await?;
    state.usuarios.insert(&usuario).await?;

    let token = state
        .tokens
        .generate_token(usuario.id, Role::Patient)
        .map_err(|_| AppError::InternalServerError("Token generation failed".to_string()))?;

    info!("Usuario {} registered", usuario.id);
    Ok(HttpResponse::Created().json(RegisterResponse { usuario, token }))
}
