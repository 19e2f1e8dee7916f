//! Inventory item operations.
//!
//! The update path here is administrative: it may overwrite `stock`
//! directly without going through the stock ledger.

use crate::models::{
    CreateInventoryItem, InventoryItem, InventoryListParams, SortOrder, StockFilter,
    UpdateInventoryItem,
};
use crate::services::metrics::DB_QUERY_DURATION;
use crate::services::Database;
use tracing::{info, instrument};
use uuid::Uuid;
use workshop_core::error::AppError;

impl Database {
    /// Create a new inventory item. SKU uniqueness is case-insensitive.
    #[instrument(skip(self, input), fields(sku = %input.sku))]
    pub async fn create_inventory_item(
        &self,
        input: &CreateInventoryItem,
    ) -> Result<InventoryItem, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_inventory_item"])
            .start_timer();

        if self.find_inventory_item_by_sku(&input.sku).await?.is_some() {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "SKU '{}' already exists",
                input.sku
            )));
        }

        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            INSERT INTO inventory_items (item_id, name, sku, stock, selling_price)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING item_id, name, sku, stock, selling_price, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.sku)
        .bind(input.stock)
        .bind(input.selling_price)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("SKU '{}' already exists", input.sku))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to create inventory item: {}", e)),
        })?;

        timer.observe_duration();

        info!(item_id = %item.item_id, sku = %item.sku, stock = item.stock, "Inventory item created");

        Ok(item)
    }

    /// Get an inventory item by ID.
    pub async fn get_inventory_item(
        &self,
        item_id: Uuid,
    ) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT item_id, name, sku, stock, selling_price, created_utc FROM inventory_items WHERE item_id = $1",
        )
        .bind(item_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get inventory item: {}", e)))?;

        Ok(item)
    }

    /// Case-insensitive SKU lookup.
    pub async fn find_inventory_item_by_sku(
        &self,
        sku: &str,
    ) -> Result<Option<InventoryItem>, AppError> {
        let item = sqlx::query_as::<_, InventoryItem>(
            "SELECT item_id, name, sku, stock, selling_price, created_utc FROM inventory_items WHERE lower(sku) = lower($1)",
        )
        .bind(sku)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to look up SKU: {}", e)))?;

        Ok(item)
    }

    /// Administrative update. May set stock to an arbitrary non-negative
    /// value; this path does not reconcile against existing reservations.
    #[instrument(skip(self, input), fields(item_id = %item_id))]
    pub async fn update_inventory_item(
        &self,
        item_id: Uuid,
        input: &UpdateInventoryItem,
    ) -> Result<InventoryItem, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_inventory_item"])
            .start_timer();

        let existing = self
            .get_inventory_item(item_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Inventory item not found")))?;

        if let Some(ref new_sku) = input.sku {
            if !new_sku.eq_ignore_ascii_case(&existing.sku)
                && self.find_inventory_item_by_sku(new_sku).await?.is_some()
            {
                return Err(AppError::Conflict(anyhow::anyhow!(
                    "SKU '{}' already exists",
                    new_sku
                )));
            }
        }

        let item = sqlx::query_as::<_, InventoryItem>(
            r#"
            UPDATE inventory_items
            SET name = COALESCE($2, name),
                sku = COALESCE($3, sku),
                stock = COALESCE($4, stock),
                selling_price = COALESCE($5, selling_price)
            WHERE item_id = $1
            RETURNING item_id, name, sku, stock, selling_price, created_utc
            "#,
        )
        .bind(item_id)
        .bind(&input.name)
        .bind(&input.sku)
        .bind(input.stock)
        .bind(input.selling_price)
        .fetch_one(self.pool())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                AppError::Conflict(anyhow::anyhow!("SKU already exists"))
            }
            _ => AppError::DatabaseError(anyhow::anyhow!("Failed to update inventory item: {}", e)),
        })?;

        timer.observe_duration();

        Ok(item)
    }

    /// Delete an inventory item. Items referenced by service items are
    /// protected by the foreign key and surface as a conflict.
    #[instrument(skip(self), fields(item_id = %item_id))]
    pub async fn delete_inventory_item(&self, item_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM inventory_items WHERE item_id = $1")
            .bind(item_id)
            .execute(self.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Inventory item is referenced by service items and cannot be deleted"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!(
                    "Failed to delete inventory item: {}",
                    e
                )),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!(
                "Inventory item not found"
            )));
        }

        info!(item_id = %item_id, "Inventory item deleted");

        Ok(())
    }

    /// List inventory items with search, stock filtering and sorting.
    /// Returns the page of items and the total matching count.
    #[instrument(skip(self, params))]
    pub async fn list_inventory_items(
        &self,
        params: &InventoryListParams,
    ) -> Result<(Vec<InventoryItem>, i64), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_inventory_items"])
            .start_timer();

        let (min_stock, max_stock) = match params.stock_filter {
            Some(StockFilter::Low) => (Some(1), Some(10)),
            Some(StockFilter::Out) => (Some(0), Some(0)),
            Some(StockFilter::Available) => (Some(1), None),
            None => (None, None),
        };

        // Sort column comes from a closed enum, never from raw input.
        let sort_column = params.sort_by.map(|s| s.as_column()).unwrap_or("name");
        let sort_order = params.sort_order.unwrap_or(SortOrder::Asc).as_sql();

        let filter_clause = r#"
            ($1::varchar IS NULL OR name ILIKE '%' || $1 || '%' OR sku ILIKE '%' || $1 || '%')
              AND ($2::int4 IS NULL OR stock >= $2)
              AND ($3::int4 IS NULL OR stock <= $3)
        "#;

        let items = sqlx::query_as::<_, InventoryItem>(&format!(
            r#"
            SELECT item_id, name, sku, stock, selling_price, created_utc
            FROM inventory_items
            WHERE {}
            ORDER BY {} {}
            LIMIT $4 OFFSET $5
            "#,
            filter_clause, sort_column, sort_order
        ))
        .bind(&params.search)
        .bind(min_stock)
        .bind(max_stock)
        .bind(params.pagination().limit())
        .bind(params.pagination().offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list inventory items: {}", e))
        })?;

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM inventory_items WHERE {}",
            filter_clause
        ))
        .bind(&params.search)
        .bind(min_stock)
        .bind(max_stock)
        .fetch_one(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to count inventory items: {}", e))
        })?;

        timer.observe_duration();

        Ok((items, total))
    }

    /// Items with 1..=10 units on hand, lowest stock first.
    pub async fn low_stock_items(&self) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT item_id, name, sku, stock, selling_price, created_utc
            FROM inventory_items
            WHERE stock > 0 AND stock <= 10
            ORDER BY stock ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list low stock items: {}", e))
        })?;

        Ok(items)
    }

    /// Items with zero units on hand, by name.
    pub async fn out_of_stock_items(&self) -> Result<Vec<InventoryItem>, AppError> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT item_id, name, sku, stock, selling_price, created_utc
            FROM inventory_items
            WHERE stock = 0
            ORDER BY name ASC
            "#,
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list out of stock items: {}", e))
        })?;

        Ok(items)
    }
}
