use actix_web::{web, HttpResponse};
use chrono::{NaiveDate, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::handlers::account::{self, PasswordChange, PhotoUpdate};
use crate::models::usuario::Usuario;
use crate::services::health::derive_metrics;
use crate::utils::jwt::{Claims, Role};
use crate::utils::validation::{
    parse_fecha_nacimiento, reject_credential_fields, validate_password_bytes, validate_payload,
    validate_whatsapp, PageQuery, Pagination,
};
use crate::AppState;

const NOT_FOUND: &str = "Usuario no encontrado";

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsuarioRequest {
    #[validate(email(message = "Formato de correo inválido"))]
    pub correo: String,

    #[validate(
        length(min = 8, message = "La contraseña debe tener al menos 8 caracteres"),
        custom = "validate_password_bytes"
    )]
    pub contrasena: String,

    #[validate(length(min = 1, max = 100, message = "nombre debe tener entre 1 y 100 caracteres"))]
    pub nombre: String,

    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,

    #[validate(url(message = "fotoPerfil debe ser una URL válida"))]
    pub foto_perfil: Option<String>,

    pub peso: f64,
    pub altura: f64,
    pub fecha_nacimiento: String,

    #[validate(length(min = 1, message = "genero es obligatorio"))]
    pub genero: String,

    pub numero_identificacion: Option<String>,
    pub escolaridad: Option<String>,
    pub numero_whatsapp: Option<String>,
    pub direccion: Option<String>,
    pub ciudad: Option<String>,
    pub estado_provincia: Option<String>,
    pub descripcion_detallada: Option<String>,
}

/// Partial update. `imc` and `bmr` are not accepted; they are derived.
#[derive(Deserialize, Validate, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUsuarioRequest {
    #[validate(email(message = "Formato de correo inválido"))]
    pub correo: Option<String>,

    #[validate(length(min = 1, max = 100, message = "nombre debe tener entre 1 y 100 caracteres"))]
    pub nombre: Option<String>,

    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub peso: Option<f64>,
    pub altura: Option<f64>,
    pub fecha_nacimiento: Option<String>,

    #[validate(length(min = 1, message = "genero no puede estar vacío"))]
    pub genero: Option<String>,

    pub numero_identificacion: Option<String>,
    pub escolaridad: Option<String>,
    pub numero_whatsapp: Option<String>,
    pub direccion: Option<String>,
    pub ciudad: Option<String>,
    pub estado_provincia: Option<String>,
    pub descripcion_detallada: Option<String>,

    // Present only to be rejected.
    pub contrasena: Option<serde_json::Value>,
    pub foto_perfil: Option<serde_json::Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsuariosPage {
    page: i64,
    limit: i64,
    total_usuarios: i64,
    total_paginas: i64,
    usuarios: Vec<Usuario>,
}

/// Validates the payload, hashes the password and derives metrics.
pub(crate) async fn build_usuario(
    state: &AppState,
    req: CreateUsuarioRequest,
) -> Result<Usuario, AppError> {
    validate_payload(&req)?;
    if let Some(numero) = &req.numero_whatsapp {
        validate_whatsapp(numero)?;
    }
    let now = Utc::now();
    let fecha_nacimiento = parse_fecha_nacimiento(&req.fecha_nacimiento, now.date_naive())?;
    let metrics = derive_metrics(
        Some(req.peso),
        Some(req.altura),
        Some(fecha_nacimiento),
        &req.genero,
        now.date_naive(),
    )?;

    let contrasena = state.passwords.hash(&req.contrasena).await?;

    Ok(Usuario {
        id: Uuid::now_v7(),
        correo: req.correo,
        contrasena,
        nombre: req.nombre,
        apellido_paterno: req.apellido_paterno,
        apellido_materno: req.apellido_materno,
        foto_perfil: req.foto_perfil,
        peso: req.peso,
        altura: req.altura,
        fecha_nacimiento,
        genero: req.genero,
        imc: metrics.imc,
        bmr: metrics.bmr,
        numero_identificacion: req.numero_identificacion,
        escolaridad: req.escolaridad,
        numero_whatsapp: req.numero_whatsapp,
        direccion: req.direccion,
        ciudad: req.ciudad,
        estado_provincia: req.estado_provincia,
        descripcion_detallada: req.descripcion_detallada,
        created_at: now,
        updated_at: now,
    })
}

/// Merges `update` into `usuario`. Metrics are recomputed from the merged
/// values whenever a body measurement, birth date or sex is part of the update.
pub fn apply_update(
    usuario: &mut Usuario,
    update: UpdateUsuarioRequest,
    today: NaiveDate,
) -> Result<(), AppError> {
    validate_payload(&update)?;
    reject_credential_fields(&update.contrasena, &update.foto_perfil)?;
    if let Some(numero) = &update.numero_whatsapp {
        validate_whatsapp(numero)?;
    }

    let fecha_nacimiento = update
        .fecha_nacimiento
        .as_deref()
        .map(|raw| parse_fecha_nacimiento(raw, today))
        .transpose()?;

    let affects_metrics = update.peso.is_some()
        || update.altura.is_some()
        || fecha_nacimiento.is_some()
        || update.genero.is_some();

    if affects_metrics {
        let peso = update.peso.unwrap_or(usuario.peso);
        let altura = update.altura.unwrap_or(usuario.altura);
        let nacimiento = fecha_nacimiento.unwrap_or(usuario.fecha_nacimiento);
        let genero = update.genero.clone().unwrap_or_else(|| usuario.genero.clone());

        let metrics = derive_metrics(Some(peso), Some(altura), Some(nacimiento), &genero, today)?;

        usuario.peso = peso;
        usuario.altura = altura;
        usuario.fecha_nacimiento = nacimiento;
        usuario.genero = genero;
        usuario.imc = metrics.imc;
        usuario.bmr = metrics.bmr;
    }

    if let Some(correo) = update.correo {
        usuario.correo = correo;
    }
    if let Some(nombre) = update.nombre {
        usuario.nombre = nombre;
    }
    if update.apellido_paterno.is_some() {
        usuario.apellido_paterno = update.apellido_paterno;
    }
    if update.apellido_materno.is_some() {
        usuario.apellido_materno = update.apellido_materno;
    }
    if update.numero_identificacion.is_some() {
        usuario.numero_identificacion = update.numero_identificacion;
    }
    if update.escolaridad.is_some() {
        usuario.escolaridad = update.escolaridad;
    }
    if update.numero_whatsapp.is_some() {
        usuario.numero_whatsapp = update.numero_whatsapp;
    }
    if update.direccion.is_some() {
        usuario.direccion = update.direccion;
    }
    if update.ciudad.is_some() {
        usuario.ciudad = update.ciudad;
    }
    if update.estado_provincia.is_some() {
        usuario.estado_provincia = update.estado_provincia;
    }
    if update.descripcion_detallada.is_some() {
        usuario.descripcion_detallada = update.descripcion_detallada;
    }
    Ok(())
}

// GET /usuarios
pub async fn list_usuarios(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;
    let pagination = Pagination::from_query(query.page, query.limit)?;

    let total = state.usuarios.count().await?;
    let usuarios = state
        .usuarios
        .list_page(pagination.skip(), pagination.limit)
        .await?;

    Ok(HttpResponse::Ok().json(UsuariosPage {
        page: pagination.page,
        limit: pagination.limit,
        total_usuarios: total,
        total_paginas: pagination.total_pages(total),
        usuarios,
    }))
}

// GET /usuarios/{id}
pub async fn get_usuario(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_self_or_admin(*id)?;

    let usuario = state
        .usuarios
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    Ok(HttpResponse::Ok().json(usuario))
}

// POST /usuarios
pub async fn create_usuario(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    req: web::Json<CreateUsuarioRequest>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    let usuario = build_usuario(&state, req.into_inner()).await?;
    state.usuarios.insert(&usuario).await?;

    info!("Usuario {} created by admin {}", usuario.id, claims.id);
    Ok(HttpResponse::Created().json(usuario))
}

// PUT /usuarios/{id}
pub async fn update_usuario(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<UpdateUsuarioRequest>,
) -> Result<HttpResponse, AppError> {
    claims.require_self_or_admin(*id)?;

    let mut usuario = state
        .usuarios
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    let now = Utc::now();
    apply_update(&mut usuario, req.into_inner(), now.date_naive())?;
    usuario.updated_at = now;

    if !state.usuarios.update(&usuario).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    info!("Usuario {} updated", usuario.id);
    Ok(HttpResponse::Ok().json(usuario))
}

// DELETE /usuarios/{id}
pub async fn delete_usuario(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    if !state.usuarios.delete_by_id(*id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    info!("Usuario {} deleted by admin {}", id, claims.id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "mensaje": "Usuario eliminado correctamente" })))
}

// PUT /usuarios/{id}/contrasena
pub async fn change_password(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<PasswordChange>,
) -> Result<HttpResponse, AppError> {
    claims.require_owner(Role::Patient, *id)?;

    account::change_password(&*state.usuarios, &state.passwords, *id, req.into_inner(), NOT_FOUND).await?;

    info!("Usuario {} changed password", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "mensaje": "Contraseña actualizada correctamente" })))
}

// PUT /usuarios/{id}/foto
pub async fn update_photo(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<PhotoUpdate>,
) -> Result<HttpResponse, AppError> {
    claims.require_self_or_admin(*id)?;

    let usuario = account::update_photo(&*state.usuarios, *id, req.into_inner(), NOT_FOUND).await?;
    Ok(HttpResponse::Ok().json(usuario))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usuario() -> Usuario {
        let now = Utc::now();
        Usuario {
            id: Uuid::now_v7(),
            correo: "ana@correo.mx".to_string(),
            contrasena: "hash".to_string(),
            nombre: "Ana".to_string(),
            apellido_paterno: None,
            apellido_materno: None,
            foto_perfil: None,
            peso: 70.0,
            altura: 1.75,
            fecha_nacimiento: NaiveDate::from_ymd_opt(1995, 1, 10).unwrap(),
            genero: "masculino".to_string(),
            imc: 22.86,
            bmr: 1695,
            numero_identificacion: None,
            escolaridad: None,
            numero_whatsapp: None,
            direccion: None,
            ciudad: None,
            estado_provincia: None,
            descripcion_detallada: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn peso_change_recomputes_metrics() {
        let mut u = usuario();
        let update = UpdateUsuarioRequest {
            peso: Some(80.0),
            ..Default::default()
        };

        apply_update(&mut u, update, today()).unwrap();

        assert_eq!(u.peso, 80.0);
        assert_eq!(u.imc, 26.12);
        // 88.36 + 1072 + 840 - 171
        assert_eq!(u.bmr, 1829);
    }

    #[test]
    fn unrelated_change_leaves_metrics_untouched() {
        let mut u = usuario();
        u.imc = 99.0;
        u.bmr = 1;
        let update = UpdateUsuarioRequest {
            ciudad: Some("Puebla".to_string()),
            ..Default::default()
        };

        apply_update(&mut u, update, today()).unwrap();

        assert_eq!(u.ciudad.as_deref(), Some("Puebla"));
        assert_eq!(u.imc, 99.0);
        assert_eq!(u.bmr, 1);
    }

    #[test]
    fn genero_change_switches_formula() {
        let mut u = usuario();
        let update = UpdateUsuarioRequest {
            genero: Some("femenino".to_string()),
            ..Default::default()
        };

        apply_update(&mut u, update, today()).unwrap();
        assert_eq!(u.bmr, 1505);
        assert_eq!(u.imc, 22.86);
    }

    #[test]
    fn credential_fields_are_rejected() {
        let mut u = usuario();
        let update = UpdateUsuarioRequest {
            contrasena: Some(serde_json::json!("nueva-clave")),
            ..Default::default()
        };
        assert!(matches!(apply_update(&mut u, update, today()), Err(AppError::BadRequest(_))));

        let update = UpdateUsuarioRequest {
            foto_perfil: Some(serde_json::json!("https://cdn.nutri.mx/a.png")),
            ..Default::default()
        };
        assert!(matches!(apply_update(&mut u, update, today()), Err(AppError::BadRequest(_))));
        assert_eq!(u.contrasena, "hash");
    }

    #[test]
    fn non_positive_peso_is_rejected_without_mutation() {
        let mut u = usuario();
        let update = UpdateUsuarioRequest {
            peso: Some(0.0),
            ..Default::default()
        };

        assert!(apply_update(&mut u, update, today()).is_err());
        assert_eq!(u.peso, 70.0);
        assert_eq!(u.imc, 22.86);
    }
}
