use nutri_backend::config::AdminSeed;
use nutri_backend::utils::jwt::TokenService;
use nutri_backend::utils::password::PasswordHasher;
use nutri_backend::{seed, AppState};
use serde_json::{json, Value};

pub const ADMIN_CORREO: &str = "nutri@clinica.mx";
pub const ADMIN_CONTRASENA: &str = "clave-segura-1";

/// Builds the app around an in-memory `AppState`.
macro_rules! spawn_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state.clone()))
                .configure(nutri_backend::routes::configure),
        )
        .await
    };
}

/// In-memory state with one seeded admin. Returns the state and an admin token.
pub async fn create_test_app_state() -> (AppState, String) {
    let state = AppState::in_memory(
        PasswordHasher::new(4).expect("bcrypt cost 4"),
        TokenService::new("test_secret_key_for_integration_tests"),
    );
    seed::ensure_admin(
        &state,
        &AdminSeed {
            correo: ADMIN_CORREO.to_string(),
            contrasena: ADMIN_CONTRASENA.to_string(),
            nombre: "Dra. Ruiz".to_string(),
        },
    )
    .await
    .expect("Failed to seed admin");

    let session = state
        .auth
        .authenticate(ADMIN_CORREO, ADMIN_CONTRASENA)
        .await
        .expect("Failed to log in seeded admin");
    (state, session.token)
}

#[allow(dead_code)]
pub fn usuario_body(correo: &str) -> Value {
    json!({
        "correo": correo,
        "contrasena": "paciente-123",
        "nombre": "Ana",
        "apellidoPaterno": "López",
        "peso": 70.0,
        "altura": 1.75,
        "fechaNacimiento": "1995-01-10",
        "genero": "masculino",
        "ciudad": "CDMX"
    })
}

#[allow(dead_code)]
pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
