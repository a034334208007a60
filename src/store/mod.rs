//! Persistence seams for admins, usuarios and menus.
//!
//! Handlers only see the traits below; `PgStore` backs them with PostgreSQL
//! and `MemoryCollection` keeps everything in process.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use std::fmt;
use uuid::Uuid;

use crate::models::{admin::Admin, menu::Menu, usuario::Usuario};

pub use memory::MemoryCollection;
pub use postgres::PgStore;

#[derive(Debug)]
pub enum StoreError {
    /// Unique email already taken.
    Duplicate,
    /// The backing store could not be reached.
    Unavailable(String),
    Backend(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Duplicate => write!(f, "duplicate email"),
            StoreError::Unavailable(msg) => write!(f, "store unavailable: {}", msg),
            StoreError::Backend(msg) => write!(f, "store error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

pub type StoreResult<T> = Result<T, StoreError>;

/// A persisted entity addressable by its surrogate id.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    /// Unique natural key, if the entity has one.
    fn email(&self) -> Option<&str> {
        None
    }
}

impl Record for Admin {
    fn id(&self) -> Uuid {
        self.id
    }

    fn email(&self) -> Option<&str> {
        Some(&self.correo)
    }
}

impl Record for Usuario {
    fn id(&self) -> Uuid {
        self.id
    }

    fn email(&self) -> Option<&str> {
        Some(&self.correo)
    }
}

impl Record for Menu {
    fn id(&self) -> Uuid {
        self.id
    }
}

#[async_trait]
pub trait Collection<T: Record>: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>>;

    /// Fails with `StoreError::Duplicate` when the email is taken.
    async fn insert(&self, record: &T) -> StoreResult<()>;

    /// Replaces the stored record wholesale. Returns `false` if the id is unknown.
    async fn update(&self, record: &T) -> StoreResult<bool>;

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool>;

    async fn count(&self) -> StoreResult<i64>;

    /// Records in creation order.
    async fn list_page(&self, skip: i64, limit: i64) -> StoreResult<Vec<T>>;
}

#[async_trait]
pub trait IdentityStore<T: Record>: Collection<T> {
    /// Case-sensitive exact match.
    async fn find_by_email(&self, correo: &str) -> StoreResult<Option<T>>;
}

#[async_trait]
pub trait MenuStore: Collection<Menu> {
    async fn count_for_usuario(&self, id_usuario: Uuid) -> StoreResult<i64>;

    async fn list_page_for_usuario(
        &self,
        id_usuario: Uuid,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Menu>>;
}
