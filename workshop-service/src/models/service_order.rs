//! Service order model: one workshop visit with its line items.

use super::{CreateServiceItem, Customer, ServiceItemDetail, Staff, Vehicle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// A service order. `total_cost` is caller-supplied and not recomputed from
/// line items (discounts and fees may be folded in by the caller).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub order_id: Uuid,
    pub service_date: DateTime<Utc>,
    pub total_cost: i64,
    pub notes: Option<String>,
    pub staff_id: Uuid,
    pub vehicle_id: Uuid,
    pub created_utc: DateTime<Utc>,
}

/// Vehicle with its owning customer (for nested responses).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleWithCustomer {
    pub vehicle: Vehicle,
    pub customer: Customer,
}

/// Fully resolved order: author, vehicle with customer, and line items with
/// their inventory items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrderDetail {
    pub order: ServiceOrder,
    pub staff: Staff,
    pub vehicle: VehicleWithCustomer,
    pub items: Vec<ServiceItemDetail>,
}

/// Input for creating an order together with its initial line items.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateServiceOrder {
    pub service_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub total_cost: i64,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub vehicle_id: Uuid,
    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateServiceItem>,
}

/// Input for updating an order's own scalar fields. Line items are managed
/// through the service-item operations, never through this path.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateServiceOrder {
    pub service_date: Option<DateTime<Utc>>,
    #[validate(range(min = 0))]
    pub total_cost: Option<i64>,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub staff_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
}
