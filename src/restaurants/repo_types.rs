use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::repo::{Entity, SoftDelete};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Restaurant {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub deleted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for Restaurant {
    const TABLE: &'static str = "restaurants";
    const COLUMNS: &'static str =
        "id, name, address, phone, email, description, is_active, deleted_at, created_at, updated_at";
    const ACTIVE_FLAG: Option<&'static str> = Some("is_active");

    fn id(&self) -> i32 {
        self.id
    }
}

impl SoftDelete for Restaurant {
    const FLAG: &'static str = "is_active";
}
