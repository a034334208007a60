use actix_web::{error, web};
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::errors::AppError;
use crate::handlers;

/// Registers every endpoint. Expects `web::Data<AppState>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let auth = HttpAuthentication::bearer(crate::utils::jwt::validator);

    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(err.to_string()))
    }))
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        error::Error::from(AppError::BadRequest(format!("Identificador inválido: {}", err)))
    }))
    .service(
        web::resource("/login-unificado")
            .route(web::post().to(handlers::auth::login)),
    )
    .service(
        web::resource("/usuarios/register")
            .route(web::post().to(handlers::auth::register)),
    )
    .service(
        web::resource("/usuarios")
            .wrap(auth.clone())
            .route(web::get().to(handlers::usuarios::list_usuarios))
            .route(web::post().to(handlers::usuarios::create_usuario)),
    )
    .service(
        web::resource("/usuarios/{id}")
            .wrap(auth.clone())
            .route(web::get().to(handlers::usuarios::get_usuario))
            .route(web::put().to(handlers::usuarios::update_usuario))
            .route(web::delete().to(handlers::usuarios::delete_usuario)),
    )
    .service(
        web::resource("/usuarios/{id}/contrasena")
            .wrap(auth.clone())
            .route(web::put().to(handlers::usuarios::change_password)),
    )
    .service(
        web::resource("/usuarios/{id}/foto")
            .wrap(auth.clone())
            .route(web::put().to(handlers::usuarios::update_photo)),
    )
    .service(
        web::resource("/admins")
            .wrap(auth.clone())
            .route(web::get().to(handlers::admins::list_admins))
            .route(web::post().to(handlers::admins::create_admin)),
    )
    .service(
        web::resource("/admins/{id}")
            .wrap(auth.clone())
            .route(web::get().to(handlers::admins::get_admin))
            .route(web::put().to(handlers::admins::update_admin))
            .route(web::delete().to(handlers::admins::delete_admin)),
    )
    .service(
        web::resource("/admins/{id}/contrasena")
            .wrap(auth.clone())
            .route(web::put().to(handlers::admins::change_password)),
    )
    .service(
        web::resource("/admins/{id}/foto")
            .wrap(auth.clone())
            .route(web::put().to(handlers::admins::update_photo)),
    )
    .service(
        web::resource("/menu")
            .wrap(auth.clone())
            .route(web::get().to(handlers::menus::list_menus))
            .route(web::post().to(handlers::menus::create_menu)),
    )
    .service(
        web::resource("/menu/{id}")
            .wrap(auth)
            .route(web::get().to(handlers::menus::get_menu))
            .route(web::put().to(handlers::menus::update_menu))
            .route(web::delete().to(handlers::menus::delete_menu)),
    );
}
