use serde::Deserialize;
use sqlx::types::Decimal;
use sqlx::PgPool;

use crate::error::AppError;
use crate::inventory::repo_types::{Ingredient, InventoryTransaction, MenuItemRecipe, TransactionType};
use crate::repo;

// ---- Ingredient ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewIngredient {
    pub restaurant_id: i32,
    pub name: String,
    pub sku_code: Option<String>,
    pub unit: Option<String>,
    pub unit_cost: Option<Decimal>,
    #[serde(default)]
    pub min_threshold: i32,
    pub max_capacity: Option<i32>,
    pub category: Option<String>,
    pub storage_location: Option<String>,
    pub shelf_life_days: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IngredientPatch {
    pub restaurant_id: Option<i32>,
    pub name: Option<String>,
    pub sku_code: Option<String>,
    pub unit: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub min_threshold: Option<i32>,
    pub max_capacity: Option<i32>,
    pub category: Option<String>,
    pub storage_location: Option<String>,
    pub shelf_life_days: Option<i32>,
}

impl IngredientPatch {
    pub fn apply(self, row: &mut Ingredient) {
        if let Some(v) = self.restaurant_id {
            row.restaurant_id = v;
        }
        if let Some(v) = self.name {
            row.name = v;
        }
        if let Some(v) = self.sku_code {
            row.sku_code = Some(v);
        }
        if let Some(v) = self.unit {
            row.unit = Some(v);
        }
        if let Some(v) = self.unit_cost {
            row.unit_cost = Some(v);
        }
        if let Some(v) = self.min_threshold {
            row.min_threshold = v;
        }
        if let Some(v) = self.max_capacity {
            row.max_capacity = Some(v);
        }
        if let Some(v) = self.category {
            row.category = Some(v);
        }
        if let Some(v) = self.storage_location {
            row.storage_location = Some(v);
        }
        if let Some(v) = self.shelf_life_days {
            row.shelf_life_days = Some(v);
        }
    }
}

pub async fn create_ingredient(db: &PgPool, new: NewIngredient) -> Result<Ingredient, AppError> {
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        INSERT INTO ingredients (restaurant_id, name, sku_code, unit, unit_cost, min_threshold,
                                 max_capacity, category, storage_location, shelf_life_days)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, restaurant_id, name, sku_code, unit, unit_cost, min_threshold,
                  max_capacity, category, storage_location, shelf_life_days,
                  is_active, deleted_at, created_at, updated_at
        "#,
    )
    .bind(new.restaurant_id)
    .bind(&new.name)
    .bind(&new.sku_code)
    .bind(&new.unit)
    .bind(new.unit_cost)
    .bind(new.min_threshold)
    .bind(new.max_capacity)
    .bind(&new.category)
    .bind(&new.storage_location)
    .bind(new.shelf_life_days)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_ingredient(
    db: &PgPool,
    id: i32,
    patch: IngredientPatch,
) -> Result<Option<Ingredient>, AppError> {
    let Some(mut row) = repo::get_by_id::<Ingredient>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, Ingredient>(
        r#"
        UPDATE ingredients
           SET restaurant_id = $1, name = $2, sku_code = $3, unit = $4, unit_cost = $5,
               min_threshold = $6, max_capacity = $7, category = $8, storage_location = $9,
               shelf_life_days = $10, updated_at = now()
         WHERE id = $11
        RETURNING id, restaurant_id, name, sku_code, unit, unit_cost, min_threshold,
                  max_capacity, category, storage_location, shelf_life_days,
                  is_active, deleted_at, created_at, updated_at
        "#,
    )
    .bind(row.restaurant_id)
    .bind(&row.name)
    .bind(&row.sku_code)
    .bind(&row.unit)
    .bind(row.unit_cost)
    .bind(row.min_threshold)
    .bind(row.max_capacity)
    .bind(&row.category)
    .bind(&row.storage_location)
    .bind(row.shelf_life_days)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- MenuItemRecipe ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewMenuItemRecipe {
    pub menu_item_id: i32,
    pub ingredient_id: i32,
    pub quantity_needed: Decimal,
    pub unit: Option<String>,
    #[serde(default)]
    pub is_critical: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MenuItemRecipePatch {
    pub menu_item_id: Option<i32>,
    pub ingredient_id: Option<i32>,
    pub quantity_needed: Option<Decimal>,
    pub unit: Option<String>,
    pub is_critical: Option<bool>,
    pub notes: Option<String>,
}

impl MenuItemRecipePatch {
    pub fn apply(self, row: &mut MenuItemRecipe) {
        if let Some(v) = self.menu_item_id {
            row.menu_item_id = v;
        }
        if let Some(v) = self.ingredient_id {
            row.ingredient_id = v;
        }
        if let Some(v) = self.quantity_needed {
            row.quantity_needed = v;
        }
        if let Some(v) = self.unit {
            row.unit = Some(v);
        }
        if let Some(v) = self.is_critical {
            row.is_critical = v;
        }
        if let Some(v) = self.notes {
            row.notes = Some(v);
        }
    }
}

pub async fn create_menu_item_recipe(
    db: &PgPool,
    new: NewMenuItemRecipe,
) -> Result<MenuItemRecipe, AppError> {
    let row = sqlx::query_as::<_, MenuItemRecipe>(
        r#"
        INSERT INTO menu_item_recipes (menu_item_id, ingredient_id, quantity_needed, unit, is_critical, notes)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, menu_item_id, ingredient_id, quantity_needed, unit, is_critical, notes,
                  created_at, updated_at
        "#,
    )
    .bind(new.menu_item_id)
    .bind(new.ingredient_id)
    .bind(new.quantity_needed)
    .bind(&new.unit)
    .bind(new.is_critical)
    .bind(&new.notes)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_menu_item_recipe(
    db: &PgPool,
    id: i32,
    patch: MenuItemRecipePatch,
) -> Result<Option<MenuItemRecipe>, AppError> {
    let Some(mut row) = repo::get_by_id::<MenuItemRecipe>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, MenuItemRecipe>(
        r#"
        UPDATE menu_item_recipes
           SET menu_item_id = $1, ingredient_id = $2, quantity_needed = $3, unit = $4,
               is_critical = $5, notes = $6, updated_at = now()
         WHERE id = $7
        RETURNING id, menu_item_id, ingredient_id, quantity_needed, unit, is_critical, notes,
                  created_at, updated_at
        "#,
    )
    .bind(row.menu_item_id)
    .bind(row.ingredient_id)
    .bind(row.quantity_needed)
    .bind(&row.unit)
    .bind(row.is_critical)
    .bind(&row.notes)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- InventoryTransaction ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewInventoryTransaction {
    pub ingredient_id: i32,
    pub order_id: Option<i32>,
    pub order_item_id: Option<i32>,
    pub transaction_type: TransactionType,
    pub quantity_change: Decimal,
    pub quantity_before: Decimal,
    pub quantity_after: Decimal,
    pub notes: Option<String>,
    pub staff_id: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryTransactionPatch {
    pub ingredient_id: Option<i32>,
    pub order_id: Option<i32>,
    pub order_item_id: Option<i32>,
    pub transaction_type: Option<TransactionType>,
    pub quantity_change: Option<Decimal>,
    pub quantity_before: Option<Decimal>,
    pub quantity_after: Option<Decimal>,
    pub notes: Option<String>,
    pub staff_id: Option<i32>,
}

impl InventoryTransactionPatch {
    pub fn apply(self, row: &mut InventoryTransaction) {
        if let Some(v) = self.ingredient_id {
            row.ingredient_id = v;
        }
        if let Some(v) = self.order_id {
            row.order_id = Some(v);
        }
        if let Some(v) = self.order_item_id {
            row.order_item_id = Some(v);
        }
        if let Some(v) = self.transaction_type {
            row.transaction_type = v;
        }
        if let Some(v) = self.quantity_change {
            row.quantity_change = v;
        }
        if let Some(v) = self.quantity_before {
            row.quantity_before = v;
        }
        if let Some(v) = self.quantity_after {
            row.quantity_after = v;
        }
        if let Some(v) = self.notes {
            row.notes = Some(v);
        }
        if let Some(v) = self.staff_id {
            row.staff_id = Some(v);
        }
    }
}

pub async fn create_inventory_transaction(
    db: &PgPool,
    new: NewInventoryTransaction,
) -> Result<InventoryTransaction, AppError> {
    let row = sqlx::query_as::<_, InventoryTransaction>(
        r#"
        INSERT INTO inventory_transactions (ingredient_id, order_id, order_item_id, transaction_type,
                                            quantity_change, quantity_before, quantity_after, notes, staff_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, ingredient_id, order_id, order_item_id, transaction_type,
                  quantity_change, quantity_before, quantity_after, notes, staff_id,
                  created_at, updated_at
        "#,
    )
    .bind(new.ingredient_id)
    .bind(new.order_id)
    .bind(new.order_item_id)
    .bind(new.transaction_type)
    .bind(new.quantity_change)
    .bind(new.quantity_before)
    .bind(new.quantity_after)
    .bind(&new.notes)
    .bind(new.staff_id)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_inventory_transaction(
    db: &PgPool,
    id: i32,
    patch: InventoryTransactionPatch,
) -> Result<Option<InventoryTransaction>, AppError> {
    let Some(mut row) = repo::get_by_id::<InventoryTransaction>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, InventoryTransaction>(
        r#"
        UPDATE inventory_transactions
           SET ingredient_id = $1, order_id = $2, order_item_id = $3, transaction_type = $4,
               quantity_change = $5, quantity_before = $6, quantity_after = $7, notes = $8,
               staff_id = $9, updated_at = now()
         WHERE id = $10
        RETURNING id, ingredient_id, order_id, order_item_id, transaction_type,
                  quantity_change, quantity_before, quantity_after, notes, staff_id,
                  created_at, updated_at
        "#,
    )
    .bind(row.ingredient_id)
    .bind(row.order_id)
    .bind(row.order_item_id)
    .bind(row.transaction_type)
    .bind(row.quantity_change)
    .bind(row.quantity_before)
    .bind(row.quantity_after)
    .bind(&row.notes)
    .bind(row.staff_id)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

#[cfg(test)]
mod inventory_tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn new_transaction_parses_three_scale_quantities() {
        let new: NewInventoryTransaction = serde_json::from_str(
            r#"{
                "ingredient_id": 1,
                "transaction_type": "restock",
                "quantity_change": "2.500",
                "quantity_before": "0.250",
                "quantity_after": "2.750"
            }"#,
        )
        .unwrap();
        assert_eq!(new.transaction_type, TransactionType::Restock);
        assert_eq!(new.quantity_after, Decimal::from_str("2.750").unwrap());
        assert_eq!(new.order_id, None);
        assert_eq!(new.staff_id, None);
    }

    #[test]
    fn ingredient_patch_keeps_thresholds_unless_present() {
        let mut row = Ingredient {
            id: 3,
            restaurant_id: 1,
            name: "Flour".into(),
            sku_code: None,
            unit: Some("kg".into()),
            unit_cost: None,
            min_threshold: 5,
            max_capacity: Some(50),
            category: None,
            storage_location: None,
            shelf_life_days: Some(180),
            is_active: true,
            deleted_at: None,
            created_at: time::OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        let patch: IngredientPatch = serde_json::from_str(r#"{"min_threshold": 10}"#).unwrap();
        patch.apply(&mut row);
        assert_eq!(row.min_threshold, 10);
        assert_eq!(row.max_capacity, Some(50));
        assert_eq!(row.unit.as_deref(), Some("kg"));
    }

    #[test]
    fn unknown_transaction_type_is_rejected() {
        let err = serde_json::from_str::<NewInventoryTransaction>(
            r#"{
                "ingredient_id": 1,
                "transaction_type": "theft",
                "quantity_change": "1.000",
                "quantity_before": "1.000",
                "quantity_after": "2.000"
            }"#,
        );
        assert!(err.is_err());
    }
}
