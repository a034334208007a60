use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

/// Diet plan document assigned to a patient. `id_usuario` is not enforced
/// after creation, so it may point at a deleted usuario.
#[derive(sqlx::FromRow, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub plan: String,
    pub id_usuario: Uuid,
    pub created_at: chrono::DateTime<Utc>,
    pub updated_at: chrono::DateTime<Utc>,
}
