//! Service item model: one billed line within a service order, linked to
//! exactly one inventory item.

use super::InventoryItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A line item. While the row exists, `quantity` units of the linked
/// inventory item are reserved (already subtracted from its stock).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ServiceItem {
    pub service_item_id: Uuid,
    pub order_id: Uuid,
    pub inventory_item_id: Uuid,
    pub description: String,
    pub quantity: i32,
    pub unit_price: i64,
    pub created_utc: DateTime<Utc>,
}

/// Line item with its resolved inventory item (for responses).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceItemDetail {
    pub item: ServiceItem,
    pub inventory_item: InventoryItem,
}

/// Input for adding a line item, either inside an order creation or via the
/// standalone add-item operation.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateServiceItem {
    #[validate(length(min = 1, max = 500))]
    pub description: String,
    #[validate(range(min = 1))]
    pub quantity: i32,
    #[validate(range(min = 0))]
    pub unit_price: i64,
    pub inventory_item_id: Uuid,
}

/// Input for updating a line item. A quantity change reconciles the stock
/// delta; an inventory-reference change releases the old reservation and
/// takes a new one.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateServiceItem {
    #[validate(length(min = 1, max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0))]
    pub unit_price: Option<i64>,
    pub inventory_item_id: Option<Uuid>,
}
