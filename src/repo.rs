use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};

use crate::error::AppError;

/// A row type mapped one-to-one onto a table with an integer surrogate key.
///
/// `ACTIVE_FLAG` names the visibility column (`is_active`/`is_available`)
/// for entities whose lookups exclude deactivated rows; entities without
/// one are listed and fetched unfiltered.
pub trait Entity: for<'r> FromRow<'r, PgRow> + Send + Unpin {
    const TABLE: &'static str;
    /// Column list used by every SELECT and RETURNING clause.
    const COLUMNS: &'static str;
    const ID_COLUMN: &'static str = "id";
    const ACTIVE_FLAG: Option<&'static str> = None;

    fn id(&self) -> i32;
}

/// Entities that are deactivated instead of deleted. The flag is the same
/// column named by `Entity::ACTIVE_FLAG`; `deleted_at` is never written.
pub trait SoftDelete: Entity {
    const FLAG: &'static str;
}

fn select_all_sql<T: Entity>() -> String {
    match T::ACTIVE_FLAG {
        Some(flag) => format!(
            "SELECT {} FROM {} WHERE {} = TRUE",
            T::COLUMNS,
            T::TABLE,
            flag
        ),
        None => format!("SELECT {} FROM {}", T::COLUMNS, T::TABLE),
    }
}

fn select_by_id_sql<T: Entity>() -> String {
    match T::ACTIVE_FLAG {
        Some(flag) => format!(
            "SELECT {} FROM {} WHERE {} = $1 AND {} = TRUE",
            T::COLUMNS,
            T::TABLE,
            T::ID_COLUMN,
            flag
        ),
        None => format!(
            "SELECT {} FROM {} WHERE {} = $1",
            T::COLUMNS,
            T::TABLE,
            T::ID_COLUMN
        ),
    }
}

fn deactivate_sql<T: SoftDelete>() -> String {
    format!(
        "UPDATE {} SET {} = FALSE, updated_at = now() WHERE {} = $1",
        T::TABLE,
        T::FLAG,
        T::ID_COLUMN
    )
}

/// All rows, restricted to active ones when the entity declares a flag.
/// Ordering is left to the caller's query where it matters.
pub async fn list_active<T: Entity>(db: &PgPool) -> Result<Vec<T>, AppError> {
    let rows = sqlx::query_as::<_, T>(&select_all_sql::<T>())
        .fetch_all(db)
        .await?;
    Ok(rows)
}

/// Fetch one row by primary key, honoring the active filter. Absence is a
/// valid outcome, not an error.
pub async fn get_by_id<T: Entity>(db: &PgPool, id: i32) -> Result<Option<T>, AppError> {
    let row = sqlx::query_as::<_, T>(&select_by_id_sql::<T>())
        .bind(id)
        .fetch_optional(db)
        .await?;
    Ok(row)
}

/// Flip the active flag to FALSE. Returns false when the active-filtered
/// lookup misses — a genuinely absent id and an already-inactive one are
/// indistinguishable here on purpose.
pub async fn soft_delete<T: SoftDelete>(db: &PgPool, id: i32) -> Result<bool, AppError> {
    if get_by_id::<T>(db, id).await?.is_none() {
        return Ok(false);
    }
    sqlx::query(&deactivate_sql::<T>())
        .bind(id)
        .execute(db)
        .await?;
    Ok(true)
}

#[cfg(test)]
mod sql_tests {
    use super::*;

    #[derive(sqlx::FromRow)]
    struct Flagged {
        id: i32,
    }

    impl Entity for Flagged {
        const TABLE: &'static str = "widgets";
        const COLUMNS: &'static str = "id, name, is_active";
        const ACTIVE_FLAG: Option<&'static str> = Some("is_active");
        fn id(&self) -> i32 {
            self.id
        }
    }

    impl SoftDelete for Flagged {
        const FLAG: &'static str = "is_active";
    }

    #[derive(sqlx::FromRow)]
    struct Plain {
        entry_id: i32,
    }

    impl Entity for Plain {
        const TABLE: &'static str = "entries";
        const COLUMNS: &'static str = "entry_id, payload";
        const ID_COLUMN: &'static str = "entry_id";
        fn id(&self) -> i32 {
            self.entry_id
        }
    }

    #[test]
    fn flagged_selects_filter_on_the_flag() {
        assert_eq!(
            select_all_sql::<Flagged>(),
            "SELECT id, name, is_active FROM widgets WHERE is_active = TRUE"
        );
        assert_eq!(
            select_by_id_sql::<Flagged>(),
            "SELECT id, name, is_active FROM widgets WHERE id = $1 AND is_active = TRUE"
        );
    }

    #[test]
    fn plain_selects_are_unfiltered_and_honor_the_id_column() {
        assert_eq!(select_all_sql::<Plain>(), "SELECT entry_id, payload FROM entries");
        assert_eq!(
            select_by_id_sql::<Plain>(),
            "SELECT entry_id, payload FROM entries WHERE entry_id = $1"
        );
    }

    #[test]
    fn deactivate_clears_the_flag_and_touches_updated_at() {
        assert_eq!(
            deactivate_sql::<Flagged>(),
            "UPDATE widgets SET is_active = FALSE, updated_at = now() WHERE id = $1"
        );
    }
}
