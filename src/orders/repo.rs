use serde::Deserialize;
use sqlx::types::Decimal;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::error::AppError;
use crate::orders::repo_types::{Order, OrderCustomization, OrderItem};
use crate::repo;

fn default_pending() -> String {
    "pending".into()
}

// ---- Order ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewOrder {
    pub restaurant_id: i32,
    pub table_id: i32,
    pub subtotal: Decimal,
    #[serde(default)]
    pub service_charge: Decimal,
    pub total_amount: Decimal,
    #[serde(default = "default_pending")]
    pub status: String,
    #[serde(default = "default_pending")]
    pub payment_status: String,
    pub payment_method: Option<String>,
    pub special_requests: Option<String>,
    pub order_time: Option<OffsetDateTime>,
    pub estimated_ready_time: Option<OffsetDateTime>,
    pub completed_time: Option<OffsetDateTime>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderPatch {
    pub restaurant_id: Option<i32>,
    pub table_id: Option<i32>,
    pub subtotal: Option<Decimal>,
    pub service_charge: Option<Decimal>,
    pub total_amount: Option<Decimal>,
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub special_requests: Option<String>,
    pub order_time: Option<OffsetDateTime>,
    pub estimated_ready_time: Option<OffsetDateTime>,
    pub completed_time: Option<OffsetDateTime>,
}

impl OrderPatch {
    pub fn apply(self, row: &mut Order) {
        if let Some(v) = self.restaurant_id {
            row.restaurant_id = v;
        }
        if let Some(v) = self.table_id {
            row.table_id = v;
        }
        if let Some(v) = self.subtotal {
            row.subtotal = v;
        }
        if let Some(v) = self.service_charge {
            row.service_charge = v;
        }
        if let Some(v) = self.total_amount {
            row.total_amount = v;
        }
        if let Some(v) = self.status {
            row.status = v;
        }
        if let Some(v) = self.payment_status {
            row.payment_status = v;
        }
        if let Some(v) = self.payment_method {
            row.payment_method = Some(v);
        }
        if let Some(v) = self.special_requests {
            row.special_requests = Some(v);
        }
        if let Some(v) = self.order_time {
            row.order_time = Some(v);
        }
        if let Some(v) = self.estimated_ready_time {
            row.estimated_ready_time = Some(v);
        }
        if let Some(v) = self.completed_time {
            row.completed_time = Some(v);
        }
    }
}

pub async fn create_order(db: &PgPool, new: NewOrder) -> Result<Order, AppError> {
    let row = sqlx::query_as::<_, Order>(
        r#"
        INSERT INTO orders (restaurant_id, table_id, subtotal, service_charge, total_amount,
                            status, payment_status, payment_method, special_requests,
                            order_time, estimated_ready_time, completed_time)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING id, restaurant_id, table_id, subtotal, service_charge, total_amount,
                  status, payment_status, payment_method, special_requests, order_time,
                  estimated_ready_time, completed_time, deleted_at, created_at, updated_at
        "#,
    )
    .bind(new.restaurant_id)
    .bind(new.table_id)
    .bind(new.subtotal)
    .bind(new.service_charge)
    .bind(new.total_amount)
    .bind(&new.status)
    .bind(&new.payment_status)
    .bind(&new.payment_method)
    .bind(&new.special_requests)
    .bind(new.order_time)
    .bind(new.estimated_ready_time)
    .bind(new.completed_time)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_order(db: &PgPool, id: i32, patch: OrderPatch) -> Result<Option<Order>, AppError> {
    let Some(mut row) = repo::get_by_id::<Order>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, Order>(
        r#"
        UPDATE orders
           SET restaurant_id = $1, table_id = $2, subtotal = $3, service_charge = $4,
               total_amount = $5, status = $6, payment_status = $7, payment_method = $8,
               special_requests = $9, order_time = $10, estimated_ready_time = $11,
               completed_time = $12, updated_at = now()
         WHERE id = $13
        RETURNING id, restaurant_id, table_id, subtotal, service_charge, total_amount,
                  status, payment_status, payment_method, special_requests, order_time,
                  estimated_ready_time, completed_time, deleted_at, created_at, updated_at
        "#,
    )
    .bind(row.restaurant_id)
    .bind(row.table_id)
    .bind(row.subtotal)
    .bind(row.service_charge)
    .bind(row.total_amount)
    .bind(&row.status)
    .bind(&row.payment_status)
    .bind(&row.payment_method)
    .bind(&row.special_requests)
    .bind(row.order_time)
    .bind(row.estimated_ready_time)
    .bind(row.completed_time)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- OrderItem ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewOrderItem {
    pub order_id: i32,
    pub item_id: i32,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    #[serde(default = "default_pending")]
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderItemPatch {
    pub order_id: Option<i32>,
    pub item_id: Option<i32>,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
    pub total_price: Option<Decimal>,
    pub status: Option<String>,
}

impl OrderItemPatch {
    pub fn apply(self, row: &mut OrderItem) {
        if let Some(v) = self.order_id {
            row.order_id = v;
        }
        if let Some(v) = self.item_id {
            row.item_id = v;
        }
        if let Some(v) = self.quantity {
            row.quantity = v;
        }
        if let Some(v) = self.unit_price {
            row.unit_price = v;
        }
        if let Some(v) = self.total_price {
            row.total_price = v;
        }
        if let Some(v) = self.status {
            row.status = v;
        }
    }
}

pub async fn create_order_item(db: &PgPool, new: NewOrderItem) -> Result<OrderItem, AppError> {
    let row = sqlx::query_as::<_, OrderItem>(
        r#"
        INSERT INTO order_items (order_id, item_id, quantity, unit_price, total_price, status)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING order_item_id, order_id, item_id, quantity, unit_price, total_price, status, created_at
        "#,
    )
    .bind(new.order_id)
    .bind(new.item_id)
    .bind(new.quantity)
    .bind(new.unit_price)
    .bind(new.total_price)
    .bind(&new.status)
    .fetch_one(db)
    .await?;
    Ok(row)
}

/// Order items carry no `updated_at`, so the write sets only the data columns.
pub async fn update_order_item(
    db: &PgPool,
    id: i32,
    patch: OrderItemPatch,
) -> Result<Option<OrderItem>, AppError> {
    let Some(mut row) = repo::get_by_id::<OrderItem>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, OrderItem>(
        r#"
        UPDATE order_items
           SET order_id = $1, item_id = $2, quantity = $3, unit_price = $4,
               total_price = $5, status = $6
         WHERE order_item_id = $7
        RETURNING order_item_id, order_id, item_id, quantity, unit_price, total_price, status, created_at
        "#,
    )
    .bind(row.order_id)
    .bind(row.item_id)
    .bind(row.quantity)
    .bind(row.unit_price)
    .bind(row.total_price)
    .bind(&row.status)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

// ---- OrderCustomization ----

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NewOrderCustomization {
    pub order_item_id: i32,
    pub option_id: i32,
    pub choice_id: i32,
    #[serde(default)]
    pub price_modifier: Decimal,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderCustomizationPatch {
    pub order_item_id: Option<i32>,
    pub option_id: Option<i32>,
    pub choice_id: Option<i32>,
    pub price_modifier: Option<Decimal>,
}

impl OrderCustomizationPatch {
    pub fn apply(self, row: &mut OrderCustomization) {
        if let Some(v) = self.order_item_id {
            row.order_item_id = v;
        }
        if let Some(v) = self.option_id {
            row.option_id = v;
        }
        if let Some(v) = self.choice_id {
            row.choice_id = v;
        }
        if let Some(v) = self.price_modifier {
            row.price_modifier = v;
        }
    }
}

pub async fn create_order_customization(
    db: &PgPool,
    new: NewOrderCustomization,
) -> Result<OrderCustomization, AppError> {
    let row = sqlx::query_as::<_, OrderCustomization>(
        r#"
        INSERT INTO order_customizations (order_item_id, option_id, choice_id, price_modifier)
        VALUES ($1, $2, $3, $4)
        RETURNING id, order_item_id, option_id, choice_id, price_modifier, created_at, updated_at
        "#,
    )
    .bind(new.order_item_id)
    .bind(new.option_id)
    .bind(new.choice_id)
    .bind(new.price_modifier)
    .fetch_one(db)
    .await?;
    Ok(row)
}

pub async fn update_order_customization(
    db: &PgPool,
    id: i32,
    patch: OrderCustomizationPatch,
) -> Result<Option<OrderCustomization>, AppError> {
    let Some(mut row) = repo::get_by_id::<OrderCustomization>(db, id).await? else {
        return Ok(None);
    };
    patch.apply(&mut row);
    let row = sqlx::query_as::<_, OrderCustomization>(
        r#"
        UPDATE order_customizations
           SET order_item_id = $1, option_id = $2, choice_id = $3, price_modifier = $4,
               updated_at = now()
         WHERE id = $5
        RETURNING id, order_item_id, option_id, choice_id, price_modifier, created_at, updated_at
        "#,
    )
    .bind(row.order_item_id)
    .bind(row.option_id)
    .bind(row.choice_id)
    .bind(row.price_modifier)
    .bind(id)
    .fetch_one(db)
    .await?;
    Ok(Some(row))
}

#[cfg(test)]
mod orders_tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn new_order_defaults_statuses_and_service_charge() {
        let new: NewOrder = serde_json::from_str(
            r#"{"restaurant_id": 1, "table_id": 2, "subtotal": "20.00", "total_amount": "20.00"}"#,
        )
        .unwrap();
        assert_eq!(new.status, "pending");
        assert_eq!(new.payment_status, "pending");
        assert_eq!(new.service_charge, Decimal::ZERO);
        assert_eq!(new.subtotal, Decimal::from_str("20.00").unwrap());
    }

    #[test]
    fn order_item_patch_is_a_partial_merge() {
        let mut row = OrderItem {
            order_item_id: 10,
            order_id: 5,
            item_id: 7,
            quantity: 2,
            unit_price: Decimal::from_str("4.50").unwrap(),
            total_price: Decimal::from_str("9.00").unwrap(),
            status: "pending".into(),
            created_at: time::OffsetDateTime::UNIX_EPOCH,
        };
        let patch: OrderItemPatch = serde_json::from_str(r#"{"status": "served"}"#).unwrap();
        patch.apply(&mut row);
        assert_eq!(row.status, "served");
        assert_eq!(row.quantity, 2);
        assert_eq!(row.total_price, Decimal::from_str("9.00").unwrap());
    }

    #[test]
    fn decimals_deserialize_from_strings() {
        let new: NewOrderCustomization = serde_json::from_str(
            r#"{"order_item_id": 1, "option_id": 2, "choice_id": 3, "price_modifier": "1.25"}"#,
        )
        .unwrap();
        assert_eq!(new.price_modifier, Decimal::from_str("1.25").unwrap());
    }
}
