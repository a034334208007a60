use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{Collection, IdentityStore, MenuStore, StoreError, StoreResult};
use crate::models::{admin::Admin, menu::Menu, usuario::Usuario};

/// PostgreSQL-backed store for all three collections.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

fn map_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Duplicate;
        }
    }
    let unreachable = matches!(
        err,
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) | sqlx::Error::Tls(_)
    );
    if unreachable {
        StoreError::Unavailable(err.to_string())
    } else {
        StoreError::Backend(err.to_string())
    }
}

#[async_trait]
impl Collection<Admin> for PgStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn insert(&self, admin: &Admin) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO admins (id, correo, contrasena, nombre, foto_perfil, peso, altura, fecha_nacimiento, genero, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(admin.id)
        .bind(&admin.correo)
        .bind(&admin.contrasena)
        .bind(&admin.nombre)
        .bind(&admin.foto_perfil)
        .bind(admin.peso)
        .bind(admin.altura)
        .bind(admin.fecha_nacimiento)
        .bind(&admin.genero)
        .bind(admin.created_at)
        .bind(admin.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn update(&self, admin: &Admin) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE admins SET correo = $1, contrasena = $2, nombre = $3, foto_perfil = $4, peso = $5, altura = $6, fecha_nacimiento = $7, genero = $8, updated_at = $9 WHERE id = $10",
        )
        .bind(&admin.correo)
        .bind(&admin.contrasena)
        .bind(&admin.nombre)
        .bind(&admin.foto_perfil)
        .bind(admin.peso)
        .bind(admin.altura)
        .bind(admin.fecha_nacimiento)
        .bind(&admin.genero)
        .bind(admin.updated_at)
        .bind(admin.id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM admins WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admins")
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn list_page(&self, skip: i64, limit: i64) -> StoreResult<Vec<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins ORDER BY created_at, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }
}

#[async_trait]
impl IdentityStore<Admin> for PgStore {
    async fn find_by_email(&self, correo: &str) -> StoreResult<Option<Admin>> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE correo = $1")
            .bind(correo)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)
    }
}

#[async_trait]
impl Collection<Usuario> for PgStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Usuario>> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn insert(&self, u: &Usuario) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO usuarios (id, correo, contrasena, nombre, apellido_paterno, apellido_materno, foto_perfil,
                peso, altura, fecha_nacimiento, genero, imc, bmr, numero_identificacion, escolaridad,
                numero_whatsapp, direccion, ciudad, estado_provincia, descripcion_detallada, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21, $22)",
        )
        .bind(u.id)
        .bind(&u.correo)
        .bind(&u.contrasena)
        .bind(&u.nombre)
        .bind(&u.apellido_paterno)
        .bind(&u.apellido_materno)
        .bind(&u.foto_perfil)
        .bind(u.peso)
        .bind(u.altura)
        .bind(u.fecha_nacimiento)
        .bind(&u.genero)
        .bind(u.imc)
        .bind(u.bmr)
        .bind(&u.numero_identificacion)
        .bind(&u.escolaridad)
        .bind(&u.numero_whatsapp)
        .bind(&u.direccion)
        .bind(&u.ciudad)
        .bind(&u.estado_provincia)
        .bind(&u.descripcion_detallada)
        .bind(u.created_at)
        .bind(u.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn update(&self, u: &Usuario) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE usuarios SET correo = $1, contrasena = $2, nombre = $3, apellido_paterno = $4, apellido_materno = $5,
                foto_perfil = $6, peso = $7, altura = $8, fecha_nacimiento = $9, genero = $10, imc = $11, bmr = $12,
                numero_identificacion = $13, escolaridad = $14, numero_whatsapp = $15, direccion = $16, ciudad = $17,
                estado_provincia = $18, descripcion_detallada = $19, updated_at = $20
            WHERE id = $21",
        )
        .bind(&u.correo)
        .bind(&u.contrasena)
        .bind(&u.nombre)
        .bind(&u.apellido_paterno)
        .bind(&u.apellido_materno)
        .bind(&u.foto_perfil)
        .bind(u.peso)
        .bind(u.altura)
        .bind(u.fecha_nacimiento)
        .bind(&u.genero)
        .bind(u.imc)
        .bind(u.bmr)
        .bind(&u.numero_identificacion)
        .bind(&u.escolaridad)
        .bind(&u.numero_whatsapp)
        .bind(&u.direccion)
        .bind(&u.ciudad)
        .bind(&u.estado_provincia)
        .bind(&u.descripcion_detallada)
        .bind(u.updated_at)
        .bind(u.id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM usuarios WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM usuarios")
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn list_page(&self, skip: i64, limit: i64) -> StoreResult<Vec<Usuario>> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios ORDER BY created_at, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }
}

#[async_trait]
impl IdentityStore<Usuario> for PgStore {
    async fn find_by_email(&self, correo: &str) -> StoreResult<Option<Usuario>> {
        sqlx::query_as::<_, Usuario>("SELECT * FROM usuarios WHERE correo = $1")
            .bind(correo)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)
    }
}

#[async_trait]
impl Collection<Menu> for PgStore {
    async fn find_by_id(&self, id: Uuid) -> StoreResult<Option<Menu>> {
        sqlx::query_as::<_, Menu>("SELECT * FROM menus WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn insert(&self, menu: &Menu) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO menus (id, plan, id_usuario, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(menu.id)
        .bind(&menu.plan)
        .bind(menu.id_usuario)
        .bind(menu.created_at)
        .bind(menu.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(())
    }

    async fn update(&self, menu: &Menu) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE menus SET plan = $1, id_usuario = $2, updated_at = $3 WHERE id = $4",
        )
        .bind(&menu.plan)
        .bind(menu.id_usuario)
        .bind(menu.updated_at)
        .bind(menu.id)
        .execute(&self.pool)
        .await
        .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_id(&self, id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM menus WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err)?;
        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM menus")
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn list_page(&self, skip: i64, limit: i64) -> StoreResult<Vec<Menu>> {
        sqlx::query_as::<_, Menu>("SELECT * FROM menus ORDER BY created_at, id LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await
            .map_err(map_err)
    }
}

#[async_trait]
impl MenuStore for PgStore {
    async fn count_for_usuario(&self, id_usuario: Uuid) -> StoreResult<i64> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM menus WHERE id_usuario = $1")
            .bind(id_usuario)
            .fetch_one(&self.pool)
            .await
            .map_err(map_err)
    }

    async fn list_page_for_usuario(
        &self,
        id_usuario: Uuid,
        skip: i64,
        limit: i64,
    ) -> StoreResult<Vec<Menu>> {
        sqlx::query_as::<_, Menu>(
            "SELECT * FROM menus WHERE id_usuario = $1 ORDER BY created_at, id LIMIT $2 OFFSET $3",
        )
        .bind(id_usuario)
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await
        .map_err(map_err)
    }
}
