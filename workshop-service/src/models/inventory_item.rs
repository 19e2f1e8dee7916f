//! Inventory item model: a stocked part identified by SKU.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;
use workshop_core::utils::pagination::PaginationParams;

/// A stocked part. `stock` is never negative and, outside of the
/// administrative update path, is only mutated through the stock ledger.
/// Prices are integers in minor currency units.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct InventoryItem {
    pub item_id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock: i32,
    pub selling_price: i64,
    pub created_utc: DateTime<Utc>,
}

/// Input for creating an inventory item.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInventoryItem {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 50))]
    pub sku: String,
    #[validate(range(min = 0))]
    pub stock: i32,
    #[validate(range(min = 0))]
    pub selling_price: i64,
}

/// Input for the administrative update path. Setting `stock` here bypasses
/// the ledger and overwrites the counter.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateInventoryItem {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub sku: Option<String>,
    #[validate(range(min = 0))]
    pub stock: Option<i32>,
    #[validate(range(min = 0))]
    pub selling_price: Option<i64>,
}

/// Stock-level filter for inventory listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockFilter {
    /// 1..=10 units on hand.
    Low,
    /// Zero units on hand.
    Out,
    /// At least one unit on hand.
    Available,
}

/// Sortable inventory columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Name,
    Sku,
    Stock,
    SellingPrice,
}

impl SortField {
    pub fn as_column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Sku => "sku",
            Self::Stock => "stock",
            Self::SellingPrice => "selling_price",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Query parameters for the inventory listing. Pagination fields are spelled
/// out rather than flattened; serde_urlencoded cannot deserialize numbers
/// through a flattened struct.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventoryListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub search: Option<String>,
    pub stock_filter: Option<StockFilter>,
    pub sort_by: Option<SortField>,
    pub sort_order: Option<SortOrder>,
}

impl InventoryListParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            limit: self.limit,
        }
    }
}
