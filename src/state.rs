use std::sync::Arc;

use crate::models::{admin::Admin, menu::Menu, usuario::Usuario};
use crate::services::auth::Authenticator;
use crate::store::{IdentityStore, MemoryCollection, MenuStore, PgStore};
use crate::utils::jwt::TokenService;
use crate::utils::password::PasswordHasher;

/// Shared handles injected into every handler through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub admins: Arc<dyn IdentityStore<Admin>>,
    pub usuarios: Arc<dyn IdentityStore<Usuario>>,
    pub menus: Arc<dyn MenuStore>,
    pub passwords: PasswordHasher,
    pub tokens: TokenService,
    pub auth: Authenticator,
}

impl AppState {
    pub fn new(
        admins: Arc<dyn IdentityStore<Admin>>,
        usuarios: Arc<dyn IdentityStore<Usuario>>,
        menus: Arc<dyn MenuStore>,
        passwords: PasswordHasher,
        tokens: TokenService,
    ) -> Self {
        let auth = Authenticator::new(
            admins.clone(),
            usuarios.clone(),
            passwords.clone(),
            tokens.clone(),
        );
        Self {
            admins,
            usuarios,
            menus,
            passwords,
            tokens,
            auth,
        }
    }

    pub fn postgres(store: PgStore, passwords: PasswordHasher, tokens: TokenService) -> Self {
        let store = Arc::new(store);
        Self::new(store.clone(), store.clone(), store, passwords, tokens)
    }

    pub fn in_memory(passwords: PasswordHasher, tokens: TokenService) -> Self {
        Self::new(
            Arc::new(MemoryCollection::<Admin>::new()),
            Arc::new(MemoryCollection::<Usuario>::new()),
            Arc::new(MemoryCollection::<Menu>::new()),
            passwords,
            tokens,
        )
    }
}
