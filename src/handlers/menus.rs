use actix_web::{web, HttpResponse};
use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::menu::Menu;
use crate::utils::jwt::Claims;
use crate::utils::validation::{validate_payload, validate_plan, Pagination};
use crate::AppState;

const NOT_FOUND: &str = "Menu no encontrado";

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuRequest {
    #[validate(length(min = 1, message = "plan es obligatorio"))]
    pub plan: String,
    pub id_usuario: Uuid,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuRequest {
    pub plan: Option<String>,
    pub id_usuario: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuQuery {
    page: Option<i64>,
    limit: Option<i64>,
    id_usuario: Option<Uuid>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenusPage {
    page: i64,
    limit: i64,
    total_menus: i64,
    total_paginas: i64,
    menus: Vec<Menu>,
}

async fn ensure_usuario_exists(state: &AppState, id_usuario: Uuid) -> Result<(), AppError> {
    match state.usuarios.find_by_id(id_usuario).await? {
        Some(_) => Ok(()),
        None => Err(AppError::NotFound("Usuario no encontrado".to_string())),
    }
}

// GET /menu
pub async fn list_menus(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    query: web::Query<MenuQuery>,
) -> Result<HttpResponse, AppError> {
    let pagination = Pagination::from_query(query.page, query.limit)?;

    // Patients only ever see their own plans.
    let owner = if claims.is_admin() {
        query.id_usuario
    } else {
        Some(claims.id)
    };

    let (total, menus) = match owner {
        Some(id_usuario) => (
            state.menus.count_for_usuario(id_usuario).await?,
            state
                .menus
                .list_page_for_usuario(id_usuario, pagination.skip(), pagination.limit)
                .await?,
        ),
        None => (
            state.menus.count().await?,
            state.menus.list_page(pagination.skip(), pagination.limit).await?,
        ),
    };

    Ok(HttpResponse::Ok().json(MenusPage {
        page: pagination.page,
        limit: pagination.limit,
        total_menus: total,
        total_paginas: pagination.total_pages(total),
        menus,
    }))
}

// GET /menu/{id}
pub async fn get_menu(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let menu = state
        .menus
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    claims.require_self_or_admin(menu.id_usuario)?;
    Ok(HttpResponse::Ok().json(menu))
}

// POST /menu
pub async fn create_menu(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    req: web::Json<CreateMenuRequest>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;
    let req = req.into_inner();
    validate_payload(&req)?;
    validate_plan(&req.plan)?;
    ensure_usuario_exists(&state, req.id_usuario).await?;

    let now = Utc::now();
    let menu = Menu {
        id: Uuid::now_v7(),
        plan: req.plan,
        id_usuario: req.id_usuario,
        created_at: now,
        updated_at: now,
    };
    state.menus.insert(&menu).await?;

    info!("Menu {} assigned to usuario {}", menu.id, menu.id_usuario);
    Ok(HttpResponse::Created().json(menu))
}

// PUT /menu/{id}
pub async fn update_menu(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: web::Json<UpdateMenuRequest>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;
    let req = req.into_inner();

    let mut menu = state
        .menus
        .find_by_id(*id)
        .await?
        .ok_or_else(|| AppError::NotFound(NOT_FOUND.to_string()))?;

    if let Some(plan) = req.plan {
        validate_plan(&plan)?;
        menu.plan = plan;
    }
    if let Some(id_usuario) = req.id_usuario {
        if id_usuario != menu.id_usuario {
            ensure_usuario_exists(&state, id_usuario).await?;
        }
        menu.id_usuario = id_usuario;
    }
    menu.updated_at = Utc::now();

    if !state.menus.update(&menu).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    info!("Menu {} updated", menu.id);
    Ok(HttpResponse::Ok().json(menu))
}

// DELETE /menu/{id}
pub async fn delete_menu(
    claims: web::ReqData<Claims>,
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    claims.require_admin()?;

    if !state.menus.delete_by_id(*id).await? {
        return Err(AppError::NotFound(NOT_FOUND.to_string()));
    }

    info!("Menu {} deleted", id);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "mensaje": "Menu eliminado correctamente" })))
}
