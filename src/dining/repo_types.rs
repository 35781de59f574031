use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::repo::Entity;

/// A physical table in the dining room. `deleted_at` exists in the schema
/// but no code path writes it; tables are never deactivated or deleted.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Table {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub qr_code_token: Option<String>,
    pub status: String,
    pub deleted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for Table {
    const TABLE: &'static str = "tables";
    const COLUMNS: &'static str =
        "id, restaurant_id, name, qr_code_token, status, deleted_at, created_at, updated_at";

    fn id(&self) -> i32 {
        self.id
    }
}

/// Time-boxed ordering session opened by scanning a table's QR code.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QrSession {
    pub id: i32,
    pub table_id: i32,
    pub session_token: String,
    pub status: String,
    pub expires_at: Option<OffsetDateTime>,
    pub last_activity: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for QrSession {
    const TABLE: &'static str = "qr_sessions";
    const COLUMNS: &'static str =
        "id, table_id, session_token, status, expires_at, last_activity, created_at, updated_at";

    fn id(&self) -> i32 {
        self.id
    }
}
