use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, IdentityStore, MenuStore, Record, StoreError, StoreResult};
use crate::models::menu::Menu;

/// In-process collection. Records are kept in insertion order.
pub struct MemoryCollection<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Record> MemoryCollection<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    fn email_taken(records: &[T], candidate: &T) -> bool {
        match candidate.email() {
            Some(email) => records
                .iter()
                .any(|r| r.id() != candidate.id() && r.email() == Some(email)),
            None => false,
        }
    }
}

impl<T: Record> Default for MemoryCollection<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn window<T: Clone>(items: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    items
        .skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl<T: Record> Collection<T> for MemoryCollection<T> {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.id() == id).cloned())
    }

    async fn insert(&self, record: &T) -> StoreResult<()> {
        let mut records = self.records.write().await;
        if Self::email_taken(&records, record) {
            return Err(StoreError::Duplicate);
        }
        records.push(record.clone());
        Ok(())
    }

    async fn update(&self, record: &T) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        if Self::email_taken(&records, record) {
            return Err(StoreError::Duplicate);
        }
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|r| r.id() != id);
        Ok(records.len() != before)
    }

    async fn count(&self) -> StoreResult<i64> {
        Ok(self.records.read().await.len() as i64)
    }

    async fn list_page(&self, skip: i64, limit: i64) -> StoreResult<Vec<T>> {
        let records = self.records.read().await;
        Ok(window(records.iter().cloned(), skip, limit))
    }
}

#[async_trait]
impl<T: Record> IdentityStore<T> for MemoryCollection<T> {
    async fn find_by_email(&self, correo: &str) -> StoreResult<Option<T>> {
        let records = self.records.read().await;
        Ok(records.iter().find(|r| r.email() == Some(correo)).cloned())
    }
}

#[async_trait]
impl MenuStore for MemoryCollection<Menu> {
    async fn count_for_usuario(&self, id_usuario: Uuid) -> StoreResult<i64> {
        let records = self.records.read().await;
        Ok(records.iter().filter(|m| m.id_usuario == id_usuario).count() as i64)
    }

    async fn list_page_for_usuario(
        &self,
        id_usuario: Uuid,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Menu>> {
        let records = self.records.read().await;
        Ok(window(
            records.iter().filter(|m| m.id_usuario == id_usuario).cloned(),
            skip,
            limit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::admin::Admin;
    use chrono::Utc;

    fn admin(correo: &str) -> Admin {
        let now = Utc::now();
        Admin {
            id: Uuid::now_v7(),
            correo: correo.to_string(),
            contrasena: "hash".to_string(),
            nombre: "Nutri".to_string(),
            foto_perfil: None,
            peso: None,
            altura: None,
            fecha_nacimiento: None,
            genero: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[actix_web::test]
    async fn insert_rejects_duplicate_email() {
        let store = MemoryCollection::<Admin>::new();
        store.insert(&admin("a@nutri.mx")).await.unwrap();

        let err = store.insert(&admin("a@nutri.mx")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[actix_web::test]
    async fn update_rejects_email_owned_by_another_record() {
        let store = MemoryCollection::<Admin>::new();
        let first = admin("a@nutri.mx");
        let mut second = admin("b@nutri.mx");
        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();

        second.correo = "a@nutri.mx".to_string();
        assert!(matches!(store.update(&second).await, Err(StoreError::Duplicate)));
    }

    #[actix_web::test]
    async fn find_by_email_is_case_sensitive() {
        let store = MemoryCollection::<Admin>::new();
        store.insert(&admin("Ana@nutri.mx")).await.unwrap();

        assert!(store.find_by_email("Ana@nutri.mx").await.unwrap().is_some());
        assert!(store.find_by_email("ana@nutri.mx").await.unwrap().is_none());
    }

    #[actix_web::test]
    async fn list_page_keeps_creation_order() {
        let store = MemoryCollection::<Admin>::new();
        for i in 0..5 {
            store.insert(&admin(&format!("{}@nutri.mx", i))).await.unwrap();
        }

        let page = store.list_page(2, 2).await.unwrap();
        let correos: Vec<_> = page.iter().map(|a| a.correo.as_str()).collect();
        assert_eq!(correos, vec!["2@nutri.mx", "3@nutri.mx"]);
        assert!(store.list_page(10, 2).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn delete_reports_missing_id() {
        let store = MemoryCollection::<Admin>::new();
        let a = admin("a@nutri.mx");
        store.insert(&a).await.unwrap();

        assert!(store.delete_by_id(a.id).await.unwrap());
        assert!(!store.delete_by_id(a.id).await.unwrap());
    }
}
