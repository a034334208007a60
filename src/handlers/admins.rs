use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::handlers::account::{self, PasswordChange, PhotoUpdate};
use crate::models::admin::Admin;
use crate::utils::jwt::{Claims, Role};
use crate::utils::validation::{
    parse_fecha_nacimiento, reject_credential_fields, validate_password_bytes, validate_payload,
    PageQuery, Pagination,
};
use crate::AppState;

const NOT_FOUND: &str = "Administrador no encontrado";

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAdminRequest {
    #[validate(email(message = "Formato de correo inválido"))]
    pub correo: String,

    #[validate(
        length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"),
        custom = "validate_password_bytes"
    )]
    pub contrasena: String,

    #[validate(length(min = 1, max = 100, message = "nombre debe tener entre 1 y 100 caracteres"))]
    pub nombre: String,

    #[validate(url(message = "fotoPerfil debe ser una URL válida"))]
    pub foto_perfil: Option<String>,

    pub peso: Option<f64>,
    pub altura: Option<f64>,
    pub fecha_nacimiento: Option<String>,
    pub genero: Option<String>,
}

#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAdminRequest {
    #[validate(email(message = "Formato de correo inválido"))]
    pub correo: Option<String>,

    #[validate(length(min = 1, max = 100, message = "nombre debe tener entre 1 y 100 caracteres"))]
    pub nombre: Option<String>,

    pub peso: Option<f64>,
    pub altura: Option<f64>,
    pub fecha_nacimiento: Option<String>,
    pub genero: Option<String>,

    pub contrasena: Option<serde_json::Value>,
    pub foto_perfil: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminsPage {
    page: i64,
    limit: i64,
    total_admins: i64,
    total_paginas: i64,
    admins: Vec<Admin>,
}

fn positive_or_none(value: Option<f64>, field: &str) -> Result<Option<f64>, AppError> {
    match value {
        Some(v) if !(v.is_finite() && v > 0.0) => {
            Err(AppError::BadRequest(format!("{} debe ser mayor que cero", field)))
        }
        other => Ok(other),
    }
}

pub fn apply_update(
    admin: &mut Admin,
    update: UpdateAdminRequest,
    today: NaiveDate,
) -> Result<(), AppError> {
    validate_payload(&update)?;
    reject_credential_fields(&update.contrasena, &update.foto_perfil)?;

    let peso = positive_or_none(update.peso, "peso")?;
    let altura = positive_or_none(update.altura, "altura")?;
    let fecha_nacimiento = update
        .fecha_nacimiento
        .as_deref()
        .map(|raw| parse_fecha_nacimiento(raw, today))
        .transpose()?;

    if let Some(correo) = update.correo {
        admin.correo = correo;
    }
    if let Some(nombre) = update.nombre {
        admin.nombre = nombre;
    }
    if peso.is_some() {
        admin.peso = peso;
    }
    if altura.is_some() {
        admin.altura = altura;
    }
    if fecha_nacimiento.is_some() {
        admin.fecha_nacimiento = fecha_nacimiento;
    }
    if update.genero.is_some() {
        admin.genero = update.genero;
    }
    Ok(())
}

// GET /admins
pub async fn list_admins(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;
    let pagination = Pagination::from_query(query.page, query.limit)?;

    let total = state.admins.count().await?;
    let admins = state
        .admins
        .list_page(pagination.skip(), pagination.limit)
        .await?;

    Ok(HttpResponse::Ok().json(AdminsPage {
        page: pagination.page,
        limit: pagination.limit,
        total_admins: total,
        total_paginas: pagination.total_pages(total),
        admins,
    }))
}

// GET /admins/{id}
pub async fn get_admin(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let admin = state
        .admins
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(admin))
}

/// Shared by the POST handler and the startup seed.
pub(crate) async fn build_admin(state: &AppState, req: CreateAdminRequest) -> Result<Admin, AppError> {
    validate_payload(&req)?;
    let peso = positive_or_none(req.peso, "peso")?;
    let altura = positive_or_none(req.altura, "altura")?;
    let now = Utc::now();
    let fecha_nacimiento = req
        .fecha_nacimiento
        .as_deref()
        .map(|raw| parse_fecha_nacimiento(raw, now.date_naive()))
        .transpose()?;

    let contrasena = state.passwords.hash(&req.contrasena).await?;

    Ok(Admin {
        id: Uuid::now_v7(),
        correo: req.correo,
        contrasena,
        nombre: req.nombre,
        foto_perfil: req.foto_perfil,
        peso,
        altura,
        fecha_nacimiento,
        genero: req.genero,
        created_at: now,
        updated_at: now,
    })
}

// POST /admins
pub async fn create_admin(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    req: web::Json<CreateAdminRequest>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let admin = build_admin(&state, req.into_inner()).await?;
    state.admins.insert(&admin).await?;

    info!("Admin {} created by admin {}", admin.id, claims.id);
    Ok(HttpResponse::Created().json(admin))
}

// PUT /admins/{id}
pub async fn update_admin(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<UpdateAdminRequest>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let mut admin = state
        .admins
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    let now = Utc::now();
    apply_update(&mut admin, req.into_inner(), now.date_naive())?;
    admin.updated_at = now;

    if !state.admins.update(&admin).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    info!("Admin {} updated", admin.id);
    Ok(HttpResponse::Ok().json(admin))
}

// DELETE /admins/{id}
pub async fn delete_admin(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    if !state.admins.delete_by_id(*id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    info!("Admin {} deleted by admin {}", id, claims.id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "mensaje": "Administrador eliminado correctamente" })))
}

// PUT /admins/{id}/contrasena
pub async fn change_password(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<PasswordChange>,
) -> Result<HttpResponse, AppError> {
    claims.require_owner(Role::Admin, *id)?;

    account::change_password(&*state.admins, &state.passwords, *id, req.into_inner(), NOT_FOUND).await?;

    info!("Admin {} changed password", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "mensaje": "Contraseña actualizada correctamente" })))
}

// PUT /admins/{id}/foto
pub async fn update_photo(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<PhotoUpdate>,
) -> Result<HttpResponse, AppError> {
    claims.require_owner(Role::Admin, *id)?;

    let admin = account::update_photo(&*state.admins, *id, req.into_inner(), NOT_FOUND).await?;
    Ok(HttpResponse::Ok().json(admin))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Admin {
        let now = Utc::now();
        Admin {
            id: Uuid::now_v7(),
            correo: "nutri@clinica.mx".to_string(),
            contrasena: "hash".to_string(),
            nombre: "Dra. Ruiz".to_string(),
            foto_perfil: None,
            peso: None,
            altura: None,
            fecha_nacimiento: None,
            genero: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn partial_update_merges_fields() {
        let mut a = admin();
        let update = UpdateAdminRequest {
            nombre: Some("Dra. Ruiz Pérez".to_string()),
            altura: Some(1.62),
            ..Default::default()
        };

        apply_update(&mut a, update, today()).unwrap();
        assert_eq!(a.nombre, "Dra. Ruiz Pérez");
        assert_eq!(a.altura, Some(1.62));
        assert_eq!(a.correo, "nutri@clinica.mx");
    }

    #[test]
    fn password_through_generic_update_is_rejected() {
        let mut a = admin();
        let update = UpdateAdminRequest {
            contrasena: Some(serde_json::json!("otra-clave-123")),
            ..Default::default()
        };

        assert!(matches!(apply_update(&mut a, update, today()), Err(AppError::BadRequest(_))));
        assert_eq!(a.contrasena, "hash");
    }

    #[test]
    fn negative_altura_is_rejected() {
        let mut a = admin();
        let update = UpdateAdminRequest {
            altura: Some(-1.0),
            ..Default::default()
        };
        assert!(apply_update(&mut a, update, today()).is_err());
        assert_eq!(a.altura, None);
    }

    #[test]
    fn future_birth_date_is_rejected() {
        let mut a = admin();
        let update = UpdateAdminRequest {
            fecha_nacimiento: Some("2999-01-01".to_string()),
            ..Default::default()
        };

        assert!(matches!(apply_update(&mut a, update, today()), Err(AppError::BadRequest(_))));
        assert_eq!(a.fecha_nacimiento, None);
    }
}
