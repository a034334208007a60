use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Nutritionist account.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub correo: String,
    #[serde(skip_serializing)]
    pub contrasena: String,
    pub nombre: String,
    pub foto_perfil: Option<String>,
    pub peso: Option<f64>,
    pub altura: Option<f64>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub genero: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}
