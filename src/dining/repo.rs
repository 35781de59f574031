use serde::Deserialize;
use sqlx::PgPool;

use crate::dining::repo_types::{QrSession, Table};
use crate::error::AppError;
use crate::repo;

fn default_table_status() -> String {
    "available".into()
}

fn default_session_status() -> String {
    "active".into()
}

// ---- Table ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewTable {
    pub restaurant_id: i32,
    pub name: String,
    pub qr_code_token: Option<String>,
    #[serde(default = "default_table_status")]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TablePatch {
    pub restaurant_id: Option<i32>,
    pub name: Option<String>,
    pub qr_code_token: Option<String>,
    pub status: Option<String>,
}

impl TablePatch {
    pub fn apply(self, row: &mut Table) {
        if let Some(v) = self.restaurant_id {
            row.restaurant_id = v;
        }
        if let Some(v) = self.name {
            row.name = v;
        }
        if let Some(v) = self.qr_code_token {
            row.qr_code_token = Some(v);
        }
        if let Some(v) = self.status {
            row.status = v;
        }
    }
}

pub async fn create_table(db: &PgPool, new: NewTable) -> Result<Table, AppError> {
    let row = sqlx::query_as::<_, Table>(
        r#"
        INSERT INTO tables (restaurant_id, name, qr_code_token, status)
        VALUES ($1, $2, $3, $4)
        RETURNING id, restaurant_id, name, qr_code_token, status, deleted_at, created_at, updated_at
        "#,
    )
    .bind(new.restaurant_id)
    .bind(&new.name)
    .bind(&new.qr_code_token)
    .bind(&new.status)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_table(db: &PgPool, id: i32, patch: TablePatch) -> Result<Option<Table>, AppError> {
    let Some(mut row) = repo::get_by_id::<Table>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, Table>(
        r#"
        UPDATE tables
           SET restaurant_id = $1, name = $2, qr_code_token = $3, status = $4, updated_at = now()
         WHERE id = $5
        RETURNING id, restaurant_id, name, qr_code_token, status, deleted_at, created_at, updated_at
        "#,
    )
    .bind(row.restaurant_id)
    .bind(&row.name)
    .bind(&row.qr_code_token)
    .bind(&row.status)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- QrSession ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewQrSession {
    pub table_id: i32,
    pub session_token: String,
    #[serde(default = "default_session_status")]
    pub status: String,
    pub expires_at: Option<time::OffsetDateTime>,
    pub last_activity: Option<time::OffsetDateTime>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QrSessionPatch {
    pub table_id: Option<i32>,
    pub session_token: Option<String>,
    pub status: Option<String>,
    pub expires_at: Option<time::OffsetDateTime>,
    pub last_activity: Option<time::OffsetDateTime>,
}

impl QrSessionPatch {
    pub fn apply(self, row: &mut QrSession) {
        if let Some(v) = self.table_id {
            row.table_id = v;
        }
        if let Some(v) = self.session_token {
            row.session_token = v;
        }
        if let Some(v) = self.status {
            row.status = v;
        }
        if let Some(v) = self.expires_at {
            row.expires_at = Some(v);
        }
        if let Some(v) = self.last_activity {
            row.last_activity = Some(v);
        }
    }
}

pub async fn create_qr_session(db: &PgPool, new: NewQrSession) -> Result<QrSession, AppError> {
    let row = sqlx::query_as::<_, QrSession>(
        r#"
        INSERT INTO qr_sessions (table_id, session_token, status, expires_at, last_activity)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, table_id, session_token, status, expires_at, last_activity, created_at, updated_at
        "#,
    )
    .bind(new.table_id)
    .bind(&new.session_token)
    .bind(&new.status)
    .bind(new.expires_at)
    .bind(new.last_activity)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_qr_session(
    db: &PgPool,
    id: i32,
    patch: QrSessionPatch,
) -> Result<Option<QrSession>, AppError> {
    let Some(mut row) = repo::get_by_id::<QrSession>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, QrSession>(
        r#"
        UPDATE qr_sessions
           SET table_id = $1, session_token = $2, status = $3, expires_at = $4,
               last_activity = $5, updated_at = now()
         WHERE id = $6
        RETURNING id, table_id, session_token, status, expires_at, last_activity, created_at, updated_at
        "#,
    )
    .bind(row.table_id)
    .bind(&row.session_token)
    .bind(&row.status)
    .bind(row.expires_at)
    .bind(row.last_activity)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

#[cfg(test)]
mod dining_tests {
    use super::*;

    #[test]
    fn new_table_defaults_status_to_available() {
        let new: NewTable =
            serde_json::from_str(r#"{"restaurant_id": 1, "name": "T1"}"#).unwrap();
        assert_eq!(new.status, "available");
        assert_eq!(new.qr_code_token, None);
    }

    #[test]
    fn new_session_defaults_status_to_active() {
        let new: NewQrSession =
            serde_json::from_str(r#"{"table_id": 2, "session_token": "tok-abc"}"#).unwrap();
        assert_eq!(new.status, "active");
    }

    #[test]
    fn table_patch_keeps_unset_fields() {
        let mut row = Table {
            id: 1,
            restaurant_id: 1,
            name: "T1".into(),
            qr_code_token: Some("tok".into()),
            status: "available".into(),
            deleted_at: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        let patch: TablePatch = serde_json::from_str(r#"{"status": "occupied"}"#).unwrap();
        patch.apply(&mut row);
        assert_eq!(row.status, "occupied");
        assert_eq!(row.name, "T1");
        assert_eq!(row.qr_code_token.as_deref(), Some("tok"));
    }
}
