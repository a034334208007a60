use log::info;

use crate::config::AdminSeed;
use crate::errors::AppError;
use crate::handlers::admins::{build_admin, CreateAdminRequest};
use crate::AppState;

/// Creates the bootstrap admin unless an admin with that email already exists.
/// Returns whether an account was created.
pub async fn ensure_admin(state: &AppState, seed: &AdminSeed) -> Result<bool, AppError> {
    if state.admins.find_by_email(&seed.correo).await?.is_some() {
        return Ok(false);
    }

    let admin = build_admin(
        state,
        CreateAdminRequest {
            correo: seed.correo.clone(),
            contrasena: seed.contrasena.clone(),
            nombre: seed.nombre.clone(),
            foto_perfil: None,
            peso: None,
            altura: None,
            fecha_nacimiento: None,
            genero: None,
        },
    )
    .await?;
    state.admins.insert(&admin).await?;

    info!("Seeded admin {} ({})", admin.id, admin.correo);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jwt::TokenService;
    use crate::utils::password::PasswordHasher;

    fn seed() -> AdminSeed {
        AdminSeed {
            correo: "root@clinica.mx".to_string(),
            contrasena: "cambiar-esto-ya".to_string(),
            nombre: "Administrador".to_string(),
        }
    }

    #[actix_web::test]
    async fn seeds_once() {
        let state = AppState::in_memory(PasswordHasher::new(4).unwrap(), TokenService::new("seed"));

        assert!(ensure_admin(&state, &seed()).await.unwrap());
        assert!(!ensure_admin(&state, &seed()).await.unwrap());
        assert_eq!(state.admins.count().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn seeded_admin_can_log_in() {
        let state = AppState::in_memory(PasswordHasher::new(4).unwrap(), TokenService::new("seed"));
        ensure_admin(&state, &seed()).await.unwrap();

        let session = state.auth.authenticate("root@clinica.mx", "cambiar-esto-ya").await.unwrap();
        assert_eq!(session.role.as_str(), "admin");
    }
}
