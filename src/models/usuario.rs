use chrono::{NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Patient account. `imc` and `bmr` are always derived from
/// `peso`, `altura`, `fecha_nacimiento` and `genero`.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub correo: String,
    #[serde(skip_serializing)]
    pub contrasena: String,
    pub nombre: String,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub foto_perfil: Option<String>,
    pub peso: f64,
    pub altura: f64,
    pub fecha_nacimiento: NaiveDate,
    pub genero: String,
    pub imc: f64,
    pub bmr: i32,
    pub numero_identificacion: Option<String>,
    pub escolaridad: Option<String>,
    pub numero_whatsapp: Option<String>,
    pub direccion: Option<String>,
    pub ciudad: Option<String>,
    pub estado_provincia: Option<String>,
    pub descripcion_detallada: Option<String>,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}
