use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::repo::{Entity, SoftDelete};

/// Stock-keeping unit of a restaurant. `min_threshold`/`max_capacity` are
/// informational; nothing enforces them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ingredient {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub sku_code: Option<String>,
    pub unit: Option<String>,
    pub unit_cost: Option<Decimal>,
    pub min_threshold: i32,
    pub max_capacity: Option<i32>,
    pub category: Option<String>,
    pub storage_location: Option<String>,
    pub shelf_life_days: Option<i32>,
    pub is_active: bool,
    pub deleted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for Ingredient {
    const TABLE: &'static str = "ingredients";
    const COLUMNS: &'static str = "id, restaurant_id, name, sku_code, unit, unit_cost, \
         min_threshold, max_capacity, category, storage_location, shelf_life_days, \
         is_active, deleted_at, created_at, updated_at";
    const ACTIVE_FLAG: Option<&'static str> = Some("is_active");

    fn id(&self) -> i32 {
        self.id
    }
}

impl SoftDelete for Ingredient {
    const FLAG: &'static str = "is_active";
}

/// Links a menu item to one ingredient it consumes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItemRecipe {
    pub id: i32,
    pub menu_item_id: i32,
    pub ingredient_id: i32,
    pub quantity_needed: Decimal,
    pub unit: Option<String>,
    pub is_critical: bool,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for MenuItemRecipe {
    const TABLE: &'static str = "menu_item_recipes";
    const COLUMNS: &'static str = "id, menu_item_id, ingredient_id, quantity_needed, unit, \
         is_critical, notes, created_at, updated_at";

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum TransactionType {
    Waste,
    OrderConsumption,
    Adjustment,
    Restock,
}

/// Ledger entry against an ingredient. `quantity_after` is expected to be
/// `quantity_before + quantity_change`; recorded as given, not enforced.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryTransaction {
    pub id: i32,
    pub ingredient_id: i32,
    pub order_id: Option<i32>,
    pub order_item_id: Option<i32>,
    pub transaction_type: TransactionType,
    pub quantity_change: Decimal,
    pub quantity_before: Decimal,
    pub quantity_after: Decimal,
    pub notes: Option<String>,
    pub staff_id: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for InventoryTransaction {
    const TABLE: &'static str = "inventory_transactions";
    const COLUMNS: &'static str = "id, ingredient_id, order_id, order_item_id, transaction_type, \
         quantity_change, quantity_before, quantity_after, notes, staff_id, created_at, updated_at";

    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(test)]
mod enum_tests {
    use super::*;

    #[test]
    fn transaction_type_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&TransactionType::OrderConsumption).unwrap(),
            r#""order_consumption""#
        );
        let parsed: TransactionType = serde_json::from_str(r#""restock""#).unwrap();
        assert_eq!(parsed, TransactionType::Restock);
    }
}
