use serde::Deserialize;
use sqlx::types::Decimal;
use sqlx::PgPool;

use crate::catalog::repo_types::{
    Allergen, Category, ContaminationRisk, CustomizationChoice, CustomizationOption, MenuItem,
    MenuItemAllergen,
};
use crate::error::AppError;
use crate::repo;

fn default_true() -> bool {
    true
}

fn default_severity() -> i32 {
    1
}

fn default_max_selections() -> i32 {
    1
}

// ---- Category ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCategory {
    pub restaurant_id: i32,
    pub name: String,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CategoryPatch {
    pub restaurant_id: Option<i32>,
    pub name: Option<String>,
    pub sort_order: Option<i32>,
}

impl CategoryPatch {
    pub fn apply(self, row: &mut Category) {
        if let Some(v) = self.restaurant_id {
            row.restaurant_id = v;
        }
        if let Some(v) = self.name {
            row.name = v;
        }
        if let Some(v) = self.sort_order {
            row.sort_order = v;
        }
    }
}

pub async fn create_category(db: &PgPool, new: NewCategory) -> Result<Category, AppError> {
    let row = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (restaurant_id, name, sort_order)
        VALUES ($1, $2, $3)
        RETURNING id, restaurant_id, name, sort_order, is_active, deleted_at, created_at, updated_at
        "#,
    )
    .bind(new.restaurant_id)
    .bind(&new.name)
    .bind(new.sort_order)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_category(
    db: &PgPool,
    id: i32,
    patch: CategoryPatch,
) -> Result<Option<Category>, AppError> {
    let Some(mut row) = repo::get_by_id::<Category>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories
           SET restaurant_id = $1, name = $2, sort_order = $3, updated_at = now()
         WHERE id = $4
        RETURNING id, restaurant_id, name, sort_order, is_active, deleted_at, created_at, updated_at
        "#,
    )
    .bind(row.restaurant_id)
    .bind(&row.name)
    .bind(row.sort_order)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- MenuItem ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMenuItem {
    pub restaurant_id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    #[serde(default)]
    pub spice_level: i32,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItemPatch {
    pub restaurant_id: Option<i32>,
    pub category_id: Option<i32>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub image_url: Option<String>,
    pub spice_level: Option<i32>,
    pub sort_order: Option<i32>,
}

impl MenuItemPatch {
    pub fn apply(self, row: &mut MenuItem) {
        if let Some(v) = self.restaurant_id {
            row.restaurant_id = v;
        }
        if let Some(v) = self.category_id {
            row.category_id = v;
        }
        if let Some(v) = self.name {
            row.name = v;
        }
        if let Some(v) = self.description {
            row.description = Some(v);
        }
        if let Some(v) = self.price {
            row.price = v;
        }
        if let Some(v) = self.image_url {
            row.image_url = Some(v);
        }
        if let Some(v) = self.spice_level {
            row.spice_level = v;
        }
        if let Some(v) = self.sort_order {
            row.sort_order = v;
        }
    }
}

pub async fn create_menu_item(db: &PgPool, new: NewMenuItem) -> Result<MenuItem, AppError> {
    let row = sqlx::query_as::<_, MenuItem>(
        r#"
        INSERT INTO menu_items (restaurant_id, category_id, name, description, price,
                                image_url, spice_level, sort_order)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, restaurant_id, category_id, name, description, price,
                  image_url, spice_level, is_available, sort_order, deleted_at, created_at, updated_at
        "#,
    )
    .bind(new.restaurant_id)
    .bind(new.category_id)
    .bind(&new.name)
    .bind(&new.description)
    .bind(new.price)
    .bind(&new.image_url)
    .bind(new.spice_level)
    .bind(new.sort_order)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_menu_item(
    db: &PgPool,
    id: i32,
    patch: MenuItemPatch,
) -> Result<Option<MenuItem>, AppError> {
    let Some(mut row) = repo::get_by_id::<MenuItem>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, MenuItem>(
        r#"
        UPDATE menu_items
           SET restaurant_id = $1, category_id = $2, name = $3, description = $4,
               price = $5, image_url = $6, spice_level = $7, sort_order = $8,
               updated_at = now()
         WHERE id = $9
        RETURNING id, restaurant_id, category_id, name, description, price,
                  image_url, spice_level, is_available, sort_order, deleted_at, created_at, updated_at
        "#,
    )
    .bind(row.restaurant_id)
    .bind(row.category_id)
    .bind(&row.name)
    .bind(&row.description)
    .bind(row.price)
    .bind(&row.image_url)
    .bind(row.spice_level)
    .bind(row.sort_order)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- Allergen ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewAllergen {
    pub i18n_key: String,
    pub name: String,
    pub icon_url: Option<String>,
    #[serde(default = "default_severity")]
    pub severity_level: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AllergenPatch {
    pub i18n_key: Option<String>,
    pub name: Option<String>,
    pub icon_url: Option<String>,
    pub severity_level: Option<i32>,
}

impl AllergenPatch {
    pub fn apply(self, row: &mut Allergen) {
        if let Some(v) = self.i18n_key {
            row.i18n_key = v;
        }
        if let Some(v) = self.name {
            row.name = v;
        }
        if let Some(v) = self.icon_url {
            row.icon_url = Some(v);
        }
        if let Some(v) = self.severity_level {
            row.severity_level = v;
        }
    }
}

pub async fn create_allergen(db: &PgPool, new: NewAllergen) -> Result<Allergen, AppError> {
    let row = sqlx::query_as::<_, Allergen>(
        r#"
        INSERT INTO allergens (i18n_key, name, icon_url, severity_level)
        VALUES ($1, $2, $3, $4)
        RETURNING id, i18n_key, name, icon_url, severity_level, created_at, updated_at
        "#,
    )
    .bind(&new.i18n_key)
    .bind(&new.name)
    .bind(&new.icon_url)
    .bind(new.severity_level)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_allergen(
    db: &PgPool,
    id: i32,
    patch: AllergenPatch,
) -> Result<Option<Allergen>, AppError> {
    let Some(mut row) = repo::get_by_id::<Allergen>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, Allergen>(
        r#"
        UPDATE allergens
           SET i18n_key = $1, name = $2, icon_url = $3, severity_level = $4, updated_at = now()
         WHERE id = $5
        RETURNING id, i18n_key, name, icon_url, severity_level, created_at, updated_at
        "#,
    )
    .bind(&row.i18n_key)
    .bind(&row.name)
    .bind(&row.icon_url)
    .bind(row.severity_level)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- MenuItemAllergen (composite key) ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMenuItemAllergen {
    pub menu_item_id: i32,
    pub allergen_id: i32,
    pub contamination_risk: ContaminationRisk,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItemAllergenPatch {
    pub contamination_risk: Option<ContaminationRisk>,
}

impl MenuItemAllergenPatch {
    pub fn apply(self, row: &mut MenuItemAllergen) {
        if let Some(v) = self.contamination_risk {
            row.contamination_risk = v;
        }
    }
}

pub async fn list_menu_item_allergens(db: &PgPool) -> Result<Vec<MenuItemAllergen>, AppError> {
    let rows = sqlx::query_as::<_, MenuItemAllergen>(
        "SELECT menu_item_id, allergen_id, contamination_risk FROM menu_item_allergens",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn get_menu_item_allergen(
    db: &PgPool,
    menu_item_id: i32,
    allergen_id: i32,
) -> Result<Option<MenuItemAllergen>, AppError> {
    let row = sqlx::query_as::<_, MenuItemAllergen>(
        r#"
        SELECT menu_item_id, allergen_id, contamination_risk
          FROM menu_item_allergens
         WHERE menu_item_id = $1 AND allergen_id = $2
        "#,
    )
    .bind(menu_item_id)
    .bind(allergen_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

pub async fn create_menu_item_allergen(
    db: &PgPool,
    new: NewMenuItemAllergen,
) -> Result<MenuItemAllergen, AppError> {
    let row = sqlx::query_as::<_, MenuItemAllergen>(
        r#"
        INSERT INTO menu_item_allergens (menu_item_id, allergen_id, contamination_risk)
        VALUES ($1, $2, $3)
        RETURNING menu_item_id, allergen_id, contamination_risk
        "#,
    )
    .bind(new.menu_item_id)
    .bind(new.allergen_id)
    .bind(new.contamination_risk)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_menu_item_allergen(
    db: &PgPool,
    menu_item_id: i32,
    allergen_id: i32,
    patch: MenuItemAllergenPatch,
) -> Result<Option<MenuItemAllergen>, AppError> {
    let Some(mut row) = get_menu_item_allergen(db, menu_item_id, allergen_id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, MenuItemAllergen>(
        r#"
        UPDATE menu_item_allergens
           SET contamination_risk = $1
         WHERE menu_item_id = $2 AND allergen_id = $3
        RETURNING menu_item_id, allergen_id, contamination_risk
        "#,
    )
    .bind(row.contamination_risk)
    .bind(menu_item_id)
    .bind(allergen_id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- CustomizationOption ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCustomizationOption {
    pub item_id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub is_required: bool,
    #[serde(default = "default_max_selections")]
    pub max_selections: i32,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomizationOptionPatch {
    pub item_id: Option<i32>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_required: Option<bool>,
    pub max_selections: Option<i32>,
    pub sort_order: Option<i32>,
}

impl CustomizationOptionPatch {
    pub fn apply(self, row: &mut CustomizationOption) {
        if let Some(v) = self.item_id {
            row.item_id = v;
        }
        if let Some(v) = self.name {
            row.name = v;
        }
        if let Some(v) = self.kind {
            row.kind = v;
        }
        if let Some(v) = self.is_required {
            row.is_required = v;
        }
        if let Some(v) = self.max_selections {
            row.max_selections = v;
        }
        if let Some(v) = self.sort_order {
            row.sort_order = v;
        }
    }
}

pub async fn create_customization_option(
    db: &PgPool,
    new: NewCustomizationOption,
) -> Result<CustomizationOption, AppError> {
    let row = sqlx::query_as::<_, CustomizationOption>(
        r#"
        INSERT INTO customization_options (item_id, name, type, is_required, max_selections, sort_order)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, item_id, name, type, is_required, max_selections,
                  sort_order, is_active, created_at, updated_at
        "#,
    )
    .bind(new.item_id)
    .bind(&new.name)
    .bind(&new.kind)
    .bind(new.is_required)
    .bind(new.max_selections)
    .bind(new.sort_order)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_customization_option(
    db: &PgPool,
    id: i32,
    patch: CustomizationOptionPatch,
) -> Result<Option<CustomizationOption>, AppError> {
    let Some(mut row) = repo::get_by_id::<CustomizationOption>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, CustomizationOption>(
        r#"
        UPDATE customization_options
           SET item_id = $1, name = $2, type = $3, is_required = $4,
               max_selections = $5, sort_order = $6, updated_at = now()
         WHERE id = $7
        RETURNING id, item_id, name, type, is_required, max_selections,
                  sort_order, is_active, created_at, updated_at
        "#,
    )
    .bind(row.item_id)
    .bind(&row.name)
    .bind(&row.kind)
    .bind(row.is_required)
    .bind(row.max_selections)
    .bind(row.sort_order)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- CustomizationChoice ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewCustomizationChoice {
    pub option_id: i32,
    pub name: String,
    #[serde(default)]
    pub price_modifier: Decimal,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomizationChoicePatch {
    pub option_id: Option<i32>,
    pub name: Option<String>,
    pub price_modifier: Option<Decimal>,
    pub is_available: Option<bool>,
    pub sort_order: Option<i32>,
}

impl CustomizationChoicePatch {
    pub fn apply(self, row: &mut CustomizationChoice) {
        if let Some(v) = self.option_id {
            row.option_id = v;
        }
        if let Some(v) = self.name {
            row.name = v;
        }
        if let Some(v) = self.price_modifier {
            row.price_modifier = v;
        }
        if let Some(v) = self.is_available {
            row.is_available = v;
        }
        if let Some(v) = self.sort_order {
            row.sort_order = v;
        }
    }
}

pub async fn create_customization_choice(
    db: &PgPool,
    new: NewCustomizationChoice,
) -> Result<CustomizationChoice, AppError> {
    let row = sqlx::query_as::<_, CustomizationChoice>(
        r#"
        INSERT INTO customization_choices (option_id, name, price_modifier, is_available, sort_order)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, option_id, name, price_modifier, is_available, sort_order, created_at, updated_at
        "#,
    )
    .bind(new.option_id)
    .bind(&new.name)
    .bind(new.price_modifier)
    .bind(new.is_available)
    .bind(new.sort_order)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_customization_choice(
    db: &PgPool,
    id: i32,
    patch: CustomizationChoicePatch,
) -> Result<Option<CustomizationChoice>, AppError> {
    let Some(mut row) = repo::get_by_id::<CustomizationChoice>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, CustomizationChoice>(
        r#"
        UPDATE customization_choices
           SET option_id = $1, name = $2, price_modifier = $3, is_available = $4,
               sort_order = $5, updated_at = now()
         WHERE id = $6
        RETURNING id, option_id, name, price_modifier, is_available, sort_order, created_at, updated_at
        "#,
    )
    .bind(row.option_id)
    .bind(&row.name)
    .bind(row.price_modifier)
    .bind(row.is_available)
    .bind(row.sort_order)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- Menu and allergen rollup queries ----

/// Active categories of one restaurant in display order.
pub const CATEGORIES_FOR_RESTAURANT_SQL: &str = "\
    SELECT id, restaurant_id, name, sort_order, is_active, deleted_at, created_at, updated_at \
      FROM categories \
     WHERE restaurant_id = $1 AND is_active = TRUE \
     ORDER BY sort_order ASC, name ASC";

/// Available items of one category in display order.
pub const ITEMS_FOR_CATEGORY_SQL: &str = "\
    SELECT id, restaurant_id, category_id, name, description, price, \
           image_url, spice_level, is_available, sort_order, deleted_at, created_at, updated_at \
      FROM menu_items \
     WHERE category_id = $1 AND is_available = TRUE \
     ORDER BY sort_order ASC, name ASC";

/// Distinct allergens referenced by a restaurant's menu, alphabetical.
pub const ALLERGENS_FOR_RESTAURANT_SQL: &str = "\
    SELECT DISTINCT a.id, a.i18n_key, a.name, a.icon_url, a.severity_level, a.created_at, a.updated_at \
      FROM allergens a \
      JOIN menu_item_allergens mia ON mia.allergen_id = a.id \
      JOIN menu_items mi ON mi.id = mia.menu_item_id \
     WHERE mi.restaurant_id = $1 \
     ORDER BY a.name ASC";

pub async fn categories_for_restaurant(
    db: &PgPool,
    restaurant_id: i32,
) -> Result<Vec<Category>, AppError> {
    let rows = sqlx::query_as::<_, Category>(CATEGORIES_FOR_RESTAURANT_SQL)
        .bind(restaurant_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn items_for_category(db: &PgPool, category_id: i32) -> Result<Vec<MenuItem>, AppError> {
    let rows = sqlx::query_as::<_, MenuItem>(ITEMS_FOR_CATEGORY_SQL)
        .bind(category_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

pub async fn allergens_for_restaurant(
    db: &PgPool,
    restaurant_id: i32,
) -> Result<Vec<Allergen>, AppError> {
    let rows = sqlx::query_as::<_, Allergen>(ALLERGENS_FOR_RESTAURANT_SQL)
        .bind(restaurant_id)
        .fetch_all(db)
        .await?;
    Ok(rows)
}

#[cfg(test)]
mod catalog_tests {
    use super::*;
    use std::str::FromStr;
    use time::OffsetDateTime;

    #[test]
    fn new_category_defaults_sort_order_to_zero() {
        let new: NewCategory =
            serde_json::from_str(r#"{"restaurant_id": 1, "name": "Mains"}"#).unwrap();
        assert_eq!(new.sort_order, 0);
    }

    #[test]
    fn new_choice_defaults_follow_the_schema() {
        let new: NewCustomizationChoice =
            serde_json::from_str(r#"{"option_id": 3, "name": "Large"}"#).unwrap();
        assert_eq!(new.price_modifier, Decimal::ZERO);
        assert!(new.is_available);
        assert_eq!(new.sort_order, 0);
    }

    #[test]
    fn menu_item_patch_merges_only_present_fields() {
        let mut row = MenuItem {
            id: 7,
            restaurant_id: 1,
            category_id: 2,
            name: "Spicy Noodles".into(),
            description: None,
            price: Decimal::from_str("9.50").unwrap(),
            image_url: None,
            spice_level: 2,
            is_available: true,
            sort_order: 5,
            deleted_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        let patch: MenuItemPatch =
            serde_json::from_str(r#"{"price": "11.00", "spice_level": 3}"#).unwrap();
        patch.apply(&mut row);
        assert_eq!(row.price, Decimal::from_str("11.00").unwrap());
        assert_eq!(row.spice_level, 3);
        assert_eq!(row.name, "Spicy Noodles");
        assert_eq!(row.sort_order, 5);
    }

    #[test]
    fn menu_queries_impose_display_order() {
        assert!(CATEGORIES_FOR_RESTAURANT_SQL.contains("ORDER BY sort_order ASC, name ASC"));
        assert!(CATEGORIES_FOR_RESTAURANT_SQL.contains("is_active = TRUE"));
        assert!(ITEMS_FOR_CATEGORY_SQL.contains("ORDER BY sort_order ASC, name ASC"));
        assert!(ITEMS_FOR_CATEGORY_SQL.contains("is_available = TRUE"));
    }

    #[test]
    fn allergen_rollup_dedups_and_sorts_by_name() {
        assert!(ALLERGENS_FOR_RESTAURANT_SQL.starts_with("SELECT DISTINCT"));
        assert!(ALLERGENS_FOR_RESTAURANT_SQL.contains("ORDER BY a.name ASC"));
        assert!(ALLERGENS_FOR_RESTAURANT_SQL.contains("WHERE mi.restaurant_id = $1"));
    }

    #[test]
    fn composite_patch_only_touches_contamination_risk() {
        let mut row = MenuItemAllergen {
            menu_item_id: 4,
            allergen_id: 9,
            contamination_risk: ContaminationRisk::Contains,
        };
        let patch: MenuItemAllergenPatch =
            serde_json::from_str(r#"{"contamination_risk": "may_contain"}"#).unwrap();
        patch.apply(&mut row);
        assert_eq!(row.contamination_risk, ContaminationRisk::MayContain);
        assert_eq!(row.menu_item_id, 4);
    }
}
