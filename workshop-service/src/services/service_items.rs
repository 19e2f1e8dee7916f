//! Service item manager: CRUD over a single line item, keeping the owning
//! order's stock reservation consistent.
//!
//! Every mutating operation runs its row change and its stock-ledger
//! mutation inside one transaction. Partial application (item row changed
//! but stock untouched, or the reverse) is a correctness violation.

use crate::models::{CreateServiceItem, ServiceItem, ServiceItemDetail, UpdateServiceItem};
use crate::services::metrics::{DB_QUERY_DURATION, ERRORS_TOTAL};
use crate::services::{Database, StockLedger};
use tracing::{info, instrument};
use uuid::Uuid;
use workshop_core::error::AppError;

const SERVICE_ITEM_COLUMNS: &str =
    "service_item_id, order_id, inventory_item_id, description, quantity, unit_price, created_utc";

impl Database {
    /// Add a line item to an existing order, reserving its stock.
    #[instrument(skip(self, input), fields(order_id = %order_id, inventory_item_id = %input.inventory_item_id))]
    pub async fn create_service_item(
        &self,
        order_id: Uuid,
        input: &CreateServiceItem,
    ) -> Result<ServiceItemDetail, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_service_item"])
            .start_timer();

        self.get_service_order_row(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service order not found")))?;

        {
            let mut conn = self.pool().acquire().await.map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to acquire connection: {}", e))
            })?;
            let check =
                StockLedger::check_available(&mut conn, input.inventory_item_id, input.quantity)
                    .await?;
            if !check.sufficient {
                ERRORS_TOTAL.with_label_values(&["insufficient_stock"]).inc();
                return Err(AppError::InsufficientStock {
                    item: check.name,
                    available: check.stock,
                    requested: input.quantity,
                });
            }
        }

        let mut tx = self.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let item = sqlx::query_as::<_, ServiceItem>(&format!(
            r#"
            INSERT INTO service_items (service_item_id, order_id, inventory_item_id, description, quantity, unit_price)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SERVICE_ITEM_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(order_id)
        .bind(input.inventory_item_id)
        .bind(&input.description)
        .bind(input.quantity)
        .bind(input.unit_price)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert service item: {}", e)))?;

        StockLedger::decrement(&mut tx, input.inventory_item_id, input.quantity).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            service_item_id = %item.service_item_id,
            quantity = item.quantity,
            "Service item created"
        );

        let inventory_item = self
            .get_inventory_item(item.inventory_item_id)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!("Inventory item missing after reserve"))
            })?;

        Ok(ServiceItemDetail {
            item,
            inventory_item,
        })
    }

    /// Get a line item with its resolved inventory item.
    pub async fn get_service_item(
        &self,
        service_item_id: Uuid,
    ) -> Result<Option<ServiceItemDetail>, AppError> {
        let item = sqlx::query_as::<_, ServiceItem>(&format!(
            "SELECT {} FROM service_items WHERE service_item_id = $1",
            SERVICE_ITEM_COLUMNS
        ))
        .bind(service_item_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get service item: {}", e)))?;

        let item = match item {
            Some(i) => i,
            None => return Ok(None),
        };

        let inventory_item = self
            .get_inventory_item(item.inventory_item_id)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Inventory item {} missing for service item {}",
                    item.inventory_item_id,
                    service_item_id
                ))
            })?;

        Ok(Some(ServiceItemDetail {
            item,
            inventory_item,
        }))
    }

    /// Update a line item. A quantity change applies the inverse delta to
    /// stock; an inventory-reference change releases the old reservation
    /// and takes a new one on the new item. Scalar fields persist in the
    /// same transaction.
    #[instrument(skip(self, input), fields(service_item_id = %service_item_id))]
    pub async fn update_service_item(
        &self,
        service_item_id: Uuid,
        input: &UpdateServiceItem,
    ) -> Result<ServiceItemDetail, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_service_item"])
            .start_timer();

        let existing = sqlx::query_as::<_, ServiceItem>(&format!(
            "SELECT {} FROM service_items WHERE service_item_id = $1",
            SERVICE_ITEM_COLUMNS
        ))
        .bind(service_item_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get service item: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service item not found")))?;

        let new_quantity = input.quantity.unwrap_or(existing.quantity);
        let new_inventory_id = input.inventory_item_id.unwrap_or(existing.inventory_item_id);

        let mut tx = self.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        if new_inventory_id != existing.inventory_item_id {
            // Restore-then-reserve: return the old reservation, then take
            // the full new quantity from the new item.
            let check =
                StockLedger::check_available(&mut tx, new_inventory_id, new_quantity).await?;
            if !check.sufficient {
                ERRORS_TOTAL.with_label_values(&["insufficient_stock"]).inc();
                return Err(AppError::InsufficientStock {
                    item: check.name,
                    available: check.stock,
                    requested: new_quantity,
                });
            }
            StockLedger::increment(&mut tx, existing.inventory_item_id, existing.quantity).await?;
            StockLedger::decrement(&mut tx, new_inventory_id, new_quantity).await?;
        } else if new_quantity != existing.quantity {
            // Stock moves opposite to the quantity: shrinking the line
            // releases units, growing it reserves more.
            StockLedger::adjust(
                &mut tx,
                existing.inventory_item_id,
                existing.quantity - new_quantity,
            )
            .await?;
        }

        let item = sqlx::query_as::<_, ServiceItem>(&format!(
            r#"
            UPDATE service_items
            SET description = COALESCE($2, description),
                quantity = $3,
                unit_price = COALESCE($4, unit_price),
                inventory_item_id = $5
            WHERE service_item_id = $1
            RETURNING {}
            "#,
            SERVICE_ITEM_COLUMNS
        ))
        .bind(service_item_id)
        .bind(&input.description)
        .bind(new_quantity)
        .bind(input.unit_price)
        .bind(new_inventory_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update service item: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        let inventory_item = self
            .get_inventory_item(item.inventory_item_id)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!("Inventory item missing after update"))
            })?;

        Ok(ServiceItemDetail {
            item,
            inventory_item,
        })
    }

    /// Delete a line item, restoring its reserved quantity to stock.
    #[instrument(skip(self), fields(service_item_id = %service_item_id))]
    pub async fn delete_service_item(&self, service_item_id: Uuid) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_service_item"])
            .start_timer();

        let existing = sqlx::query_as::<_, ServiceItem>(&format!(
            "SELECT {} FROM service_items WHERE service_item_id = $1",
            SERVICE_ITEM_COLUMNS
        ))
        .bind(service_item_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get service item: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service item not found")))?;

        let mut tx = self.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        StockLedger::increment(&mut tx, existing.inventory_item_id, existing.quantity).await?;

        sqlx::query("DELETE FROM service_items WHERE service_item_id = $1")
            .bind(service_item_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to delete service item: {}", e))
            })?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            service_item_id = %service_item_id,
            restored = existing.quantity,
            "Service item deleted, stock restored"
        );

        Ok(())
    }

    /// List an order's line items, sorted by inventory item name.
    pub async fn list_service_items(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<ServiceItemDetail>, AppError> {
        self.get_service_order_row(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service order not found")))?;

        self.order_item_details(order_id).await
    }

    /// Line items for an order with their inventory items, inventory item
    /// name ascending. No order existence check.
    pub(crate) async fn order_item_details(
        &self,
        order_id: Uuid,
    ) -> Result<Vec<ServiceItemDetail>, AppError> {
        let items = sqlx::query_as::<_, ServiceItem>(
            r#"
            SELECT si.service_item_id, si.order_id, si.inventory_item_id, si.description,
                   si.quantity, si.unit_price, si.created_utc
            FROM service_items si
            JOIN inventory_items ii ON ii.item_id = si.inventory_item_id
            WHERE si.order_id = $1
            ORDER BY ii.name ASC
            "#,
        )
        .bind(order_id)
        .fetch_all(self.pool())
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list service items: {}", e))
        })?;

        let mut details = Vec::with_capacity(items.len());
        for item in items {
            let inventory_item = self
                .get_inventory_item(item.inventory_item_id)
                .await?
                .ok_or_else(|| {
                    AppError::DatabaseError(anyhow::anyhow!(
                        "Inventory item {} missing for service item {}",
                        item.inventory_item_id,
                        item.service_item_id
                    ))
                })?;
            details.push(ServiceItemDetail {
                item,
                inventory_item,
            });
        }

        Ok(details)
    }
}
