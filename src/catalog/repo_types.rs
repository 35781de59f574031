use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::repo::{Entity, SoftDelete};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: i32,
    pub restaurant_id: i32,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub deleted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for Category {
    const TABLE: &'static str = "categories";
    const COLUMNS: &'static str =
        "id, restaurant_id, name, sort_order, is_active, deleted_at, created_at, updated_at";
    const ACTIVE_FLAG: Option<&'static str> = Some("is_active");

    fn id(&self) -> i32 {
        self.id
    }
}

impl SoftDelete for Category {
    const FLAG: &'static str = "is_active";
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItem {
    pub id: i32,
    pub restaurant_id: i32,
    pub category_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub spice_level: i32,
    pub is_available: bool,
    pub sort_order: i32,
    pub deleted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for MenuItem {
    const TABLE: &'static str = "menu_items";
    const COLUMNS: &'static str = "id, restaurant_id, category_id, name, description, price, \
         image_url, spice_level, is_available, sort_order, deleted_at, created_at, updated_at";
    const ACTIVE_FLAG: Option<&'static str> = Some("is_available");

    fn id(&self) -> i32 {
        self.id
    }
}

impl SoftDelete for MenuItem {
    const FLAG: &'static str = "is_available";
}

/// Shared reference data: not restaurant-scoped, never deactivated.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Allergen {
    pub id: i32,
    pub i18n_key: String,
    pub name: String,
    pub icon_url: Option<String>,
    pub severity_level: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for Allergen {
    const TABLE: &'static str = "allergens";
    const COLUMNS: &'static str =
        "id, i18n_key, name, icon_url, severity_level, created_at, updated_at";

    fn id(&self) -> i32 {
        self.id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ContaminationRisk {
    Contains,
    MayContain,
}

/// Join row between menu items and allergens. Keyed by the composite
/// (menu_item_id, allergen_id); no surrogate id, no timestamps.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MenuItemAllergen {
    pub menu_item_id: i32,
    pub allergen_id: i32,
    pub contamination_risk: ContaminationRisk,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomizationOption {
    pub id: i32,
    pub item_id: i32,
    pub name: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub is_required: bool,
    pub max_selections: i32,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for CustomizationOption {
    const TABLE: &'static str = "customization_options";
    const COLUMNS: &'static str = "id, item_id, name, type, is_required, max_selections, \
         sort_order, is_active, created_at, updated_at";
    const ACTIVE_FLAG: Option<&'static str> = Some("is_active");

    fn id(&self) -> i32 {
        self.id
    }
}

impl SoftDelete for CustomizationOption {
    const FLAG: &'static str = "is_active";
}

/// `is_available` here is plain data; lookups do not filter on it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CustomizationChoice {
    pub id: i32,
    pub option_id: i32,
    pub name: String,
    pub price_modifier: Decimal,
    pub is_available: bool,
    pub sort_order: i32,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for CustomizationChoice {
    const TABLE: &'static str = "customization_choices";
    const COLUMNS: &'static str = "id, option_id, name, price_modifier, is_available, \
         sort_order, created_at, updated_at";

    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(test)]
mod enum_tests {
    use super::*;

    #[test]
    fn contamination_risk_uses_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_string(&ContaminationRisk::MayContain).unwrap(),
            r#""may_contain""#
        );
        let parsed: ContaminationRisk = serde_json::from_str(r#""contains""#).unwrap();
        assert_eq!(parsed, ContaminationRisk::Contains);
    }
}
