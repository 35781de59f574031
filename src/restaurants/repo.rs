use serde::Deserialize;
use sqlx::PgPool;

use crate::error::AppError;
use crate::repo;
use crate::restaurants::repo_types::Restaurant;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewRestaurant {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

fn ensure_max_len(field: &'static str, value: &str, max: usize) -> Result<(), AppError> {
    if value.chars().count() > max {
        return Err(AppError::Validation(format!(
            "{field} exceeds {max} characters"
        )));
    }
    Ok(())
}

impl NewRestaurant {
    /// Checked before any storage call; mirrors the column length limits.
    pub fn validate(&self) -> Result<(), AppError> {
        ensure_max_len("name", &self.name, 50)?;
        if let Some(v) = &self.address {
            ensure_max_len("address", v, 50)?;
        }
        if let Some(v) = &self.phone {
            ensure_max_len("phone", v, 50)?;
        }
        if let Some(v) = &self.email {
            ensure_max_len("email", v, 50)?;
        }
        Ok(())
    }
}

/// Partial update: absent fields are left untouched.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
}

impl RestaurantPatch {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(v) = &self.name {
            ensure_max_len("name", v, 50)?;
        }
        if let Some(v) = &self.address {
            ensure_max_len("address", v, 50)?;
        }
        if let Some(v) = &self.phone {
            ensure_max_len("phone", v, 50)?;
        }
        if let Some(v) = &self.email {
            ensure_max_len("email", v, 50)?;
        }
        Ok(())
    }

    pub fn apply(self, row: &mut Restaurant) {
        if let Some(v) = self.name {
            row.name = v;
        }
        if let Some(v) = self.address {
            row.address = Some(v);
        }
        if let Some(v) = self.phone {
            row.phone = Some(v);
        }
        if let Some(v) = self.email {
            row.email = Some(v);
        }
        if let Some(v) = self.description {
            row.description = Some(v);
        }
    }
}

pub async fn create(db: &PgPool, new: NewRestaurant) -> Result<Restaurant, AppError> {
    let row = sqlx::query_as::<_, Restaurant>(
        r#"
        INSERT INTO restaurants (name, address, phone, email, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, address, phone, email, description, is_active, deleted_at, created_at, updated_at
        "#,
    )
    .bind(&new.name)
    .bind(&new.address)
    .bind(&new.phone)
    .bind(&new.email)
    .bind(&new.description)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Read-modify-write with no version column; concurrent writers race and
/// the last commit wins.
pub async fn update(
    db: &PgPool,
    id: i32,
    patch: RestaurantPatch,
) -> Result<Option<Restaurant>, AppError> {
    let Some(mut row) = repo::get_by_id::<Restaurant>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, Restaurant>(
        r#"
        UPDATE restaurants
           SET name = $1, address = $2, phone = $3, email = $4, description = $5,
               updated_at = now()
         WHERE id = $6
        RETURNING id, name, address, phone, email, description, is_active, deleted_at, created_at, updated_at
        "#,
    )
    .bind(&row.name)
    .bind(&row.address)
    .bind(&row.phone)
    .bind(&row.email)
    .bind(&row.description)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

#[cfg(test)]
mod patch_tests {
    use super::*;
    use time::OffsetDateTime;

    fn fixture() -> Restaurant {
        Restaurant {
            id: 1,
            name: "Golden Wok".into(),
            address: Some("12 High St".into()),
            phone: None,
            email: None,
            description: Some("Szechuan kitchen".into()),
            is_active: true,
            deleted_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        }
    }

    #[test]
    fn empty_patch_leaves_every_field_untouched() {
        let mut row = fixture();
        RestaurantPatch::default().apply(&mut row);
        assert_eq!(row.name, "Golden Wok");
        assert_eq!(row.address.as_deref(), Some("12 High St"));
        assert_eq!(row.phone, None);
        assert_eq!(row.description.as_deref(), Some("Szechuan kitchen"));
    }

    #[test]
    fn present_fields_overwrite_and_absent_fields_survive() {
        let mut row = fixture();
        let patch = RestaurantPatch {
            name: Some("Jade Wok".into()),
            phone: Some("555-0101".into()),
            ..Default::default()
        };
        patch.apply(&mut row);
        assert_eq!(row.name, "Jade Wok");
        assert_eq!(row.phone.as_deref(), Some("555-0101"));
        assert_eq!(row.address.as_deref(), Some("12 High St"));
    }

    #[test]
    fn unknown_fields_are_rejected_at_the_edge() {
        let err = serde_json::from_str::<RestaurantPatch>(r#"{"name": "x", "owner": "y"}"#);
        assert!(err.is_err());
        let err = serde_json::from_str::<NewRestaurant>(r#"{"name": "x", "cuisine": "thai"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn over_length_fields_fail_validation() {
        let new = NewRestaurant {
            name: "x".repeat(51),
            address: None,
            phone: None,
            email: None,
            description: None,
        };
        assert!(new.validate().is_err());

        let patch = RestaurantPatch {
            phone: Some("5".repeat(51)),
            ..Default::default()
        };
        assert!(patch.validate().is_err());

        let ok = NewRestaurant {
            name: "x".repeat(50),
            address: None,
            phone: None,
            email: None,
            description: Some("long-form text is unbounded ".repeat(20)),
        };
        assert!(ok.validate().is_ok());
    }
}
