use serde::Serialize;
use sqlx::types::Decimal;
use time::OffsetDateTime;

use crate::catalog::repo_types::{Allergen, Category, MenuItem};
use crate::restaurants::repo_types::Restaurant;

#[derive(Debug, Serialize)]
pub struct RestaurantResponse {
    pub id: i32,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl From<Restaurant> for RestaurantResponse {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.id,
            name: r.name,
            address: r.address,
            phone: r.phone,
            email: r.email,
            description: r.description,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AllergenResponse {
    pub id: i32,
    pub i18n_key: String,
    pub name: String,
    pub icon_url: Option<String>,
}

impl From<Allergen> for AllergenResponse {
    fn from(a: Allergen) -> Self {
        Self {
            id: a.id,
            i18n_key: a.i18n_key,
            name: a.name,
            icon_url: a.icon_url,
        }
    }
}

/// Decimal prices serialize as strings, keeping exact cents on the wire.
#[derive(Debug, Serialize)]
pub struct MenuItemEntry {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub image_url: Option<String>,
    pub spice_level: i32,
    pub sort_order: i32,
}

impl From<MenuItem> for MenuItemEntry {
    fn from(m: MenuItem) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            price: m.price,
            image_url: m.image_url,
            spice_level: m.spice_level,
            sort_order: m.sort_order,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MenuCategory {
    pub id: i32,
    pub name: String,
    pub sort_order: i32,
    pub items: Vec<MenuItemEntry>,
}

impl MenuCategory {
    pub fn from_rows(category: Category, items: Vec<MenuItem>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            sort_order: category.sort_order,
            items: items.into_iter().map(MenuItemEntry::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RestaurantMenuResponse {
    pub restaurant_id: i32,
    pub restaurant_name: String,
    pub categories: Vec<MenuCategory>,
}

#[cfg(test)]
mod dto_tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn menu_prices_serialize_as_decimal_strings() {
        let entry = MenuItemEntry {
            id: 1,
            name: "Pad Thai".into(),
            description: None,
            price: Decimal::from_str("12.30").unwrap(),
            image_url: None,
            spice_level: 1,
            sort_order: 0,
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["price"], serde_json::json!("12.30"));
    }

    #[test]
    fn menu_category_nests_its_items() {
        let category = Category {
            id: 2,
            restaurant_id: 1,
            name: "Mains".into(),
            sort_order: 1,
            is_active: true,
            deleted_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        let item = MenuItem {
            id: 9,
            restaurant_id: 1,
            category_id: 2,
            name: "Spicy Noodles".into(),
            description: Some("wok fried".into()),
            price: Decimal::from_str("9.50").unwrap(),
            image_url: None,
            spice_level: 3,
            is_available: true,
            sort_order: 0,
            deleted_at: None,
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        };
        let group = MenuCategory::from_rows(category, vec![item]);
        assert_eq!(group.name, "Mains");
        assert_eq!(group.items.len(), 1);
        assert_eq!(group.items[0].name, "Spicy Noodles");
    }

    #[test]
    fn menu_response_keeps_category_order_and_string_prices() {
        let response = RestaurantMenuResponse {
            restaurant_id: 1,
            restaurant_name: "Golden Wok".into(),
            categories: vec![
                MenuCategory {
                    id: 3,
                    name: "Mains".into(),
                    sort_order: 1,
                    items: vec![MenuItemEntry {
                        id: 9,
                        name: "Spicy Noodles".into(),
                        description: None,
                        price: Decimal::from_str("9.50").unwrap(),
                        image_url: None,
                        spice_level: 3,
                        sort_order: 0,
                    }],
                },
                MenuCategory {
                    id: 2,
                    name: "Drinks".into(),
                    sort_order: 2,
                    items: vec![],
                },
            ],
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["restaurant_name"], "Golden Wok");
        assert_eq!(json["categories"][0]["name"], "Mains");
        assert_eq!(json["categories"][1]["name"], "Drinks");
        assert_eq!(
            json["categories"][0]["items"][0]["price"],
            serde_json::json!("9.50")
        );
    }
}
