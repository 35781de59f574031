use serde::{Deserialize, Serialize};
use sqlx::types::Decimal;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::repo::Entity;

/// `total_amount` is expected to equal `subtotal + service_charge`; the
/// storage layer records what it is given and does not enforce it.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: i32,
    pub restaurant_id: i32,
    pub table_id: i32,
    pub subtotal: Decimal,
    pub service_charge: Decimal,
    pub total_amount: Decimal,
    pub status: String,
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub special_requests: Option<String>,
    pub order_time: Option<OffsetDateTime>,
    pub estimated_ready_time: Option<OffsetDateTime>,
    pub completed_time: Option<OffsetDateTime>,
    pub deleted_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for Order {
    const TABLE: &'static str = "orders";
    const COLUMNS: &'static str = "id, restaurant_id, table_id, subtotal, service_charge, \
         total_amount, status, payment_status, payment_method, special_requests, order_time, \
         estimated_ready_time, completed_time, deleted_at, created_at, updated_at";

    fn id(&self) -> i32 {
        self.id
    }
}

/// One line of an order. The primary key column is `order_item_id`, and
/// rows carry no `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderItem {
    pub order_item_id: i32,
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub status: String,
    pub created_at: OffsetDateTime,
}

impl Entity for OrderItem {
    const TABLE: &'static str = "order_items";
    const COLUMNS: &'static str =
        "order_item_id, order_id, item_id, quantity, unit_price, total_price, status, created_at";
    const ID_COLUMN: &'static str = "order_item_id";

    fn id(&self) -> i32 {
        self.order_item_id
    }
}

/// Snapshot of a chosen customization: `price_modifier` is copied at order
/// time so later edits to the choice do not rewrite history.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OrderCustomization {
    pub id: i32,
    pub order_item_id: i32,
    pub option_id: i32,
    pub choice_id: i32,
    pub price_modifier: Decimal,
    pub created_at: OffsetDateTime,
    pub updated_at: Option<OffsetDateTime>,
}

impl Entity for OrderCustomization {
    const TABLE: &'static str = "order_customizations";
    const COLUMNS: &'static str =
        "id, order_item_id, option_id, choice_id, price_modifier, created_at, updated_at";

    fn id(&self) -> i32 {
        self.id
    }
}
