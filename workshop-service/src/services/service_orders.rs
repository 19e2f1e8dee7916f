//! Service order manager.
//!
//! Order creation reserves stock for every line item atomically: either the
//! order row, all item rows and all stock decrements commit together, or
//! nothing does. Deletion is the mirror image and restores every reserved
//! unit before the rows go away.

use crate::models::{
    CreateServiceOrder, ServiceOrder, ServiceOrderDetail, UpdateServiceOrder,
};
use crate::services::metrics::{DB_QUERY_DURATION, ERRORS_TOTAL, ORDERS_TOTAL};
use crate::services::{Database, StockLedger};
use tracing::{info, instrument};
use uuid::Uuid;
use workshop_core::error::AppError;
use workshop_core::utils::pagination::PaginationParams;

const SERVICE_ORDER_COLUMNS: &str =
    "order_id, service_date, total_cost, notes, staff_id, vehicle_id, created_utc";

impl Database {
    /// Create an order with its initial line items, reserving stock for
    /// each. Availability is checked for every item before anything is
    /// written; the conditional decrements inside the transaction remain
    /// the authoritative guard under concurrency.
    #[instrument(skip(self, input), fields(staff_id = %staff_id, vehicle_id = %input.vehicle_id, item_count = input.items.len()))]
    pub async fn create_service_order(
        &self,
        staff_id: Uuid,
        input: &CreateServiceOrder,
    ) -> Result<ServiceOrderDetail, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_service_order"])
            .start_timer();

        self.get_staff(staff_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Staff member not found")))?;

        self.get_vehicle(input.vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Vehicle not found")))?;

        {
            let mut conn = self.pool().acquire().await.map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to acquire connection: {}", e))
            })?;
            for item in &input.items {
                let check =
                    StockLedger::check_available(&mut conn, item.inventory_item_id, item.quantity)
                        .await?;
                if !check.sufficient {
                    ERRORS_TOTAL.with_label_values(&["insufficient_stock"]).inc();
                    return Err(AppError::InsufficientStock {
                        item: check.name,
                        available: check.stock,
                        requested: item.quantity,
                    });
                }
            }
        }

        let mut tx = self.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            r#"
            INSERT INTO service_orders (order_id, service_date, total_cost, notes, staff_id, vehicle_id)
            VALUES ($1, COALESCE($2, now()), $3, $4, $5, $6)
            RETURNING {}
            "#,
            SERVICE_ORDER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(input.service_date)
        .bind(input.total_cost)
        .bind(&input.notes)
        .bind(staff_id)
        .bind(input.vehicle_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert order: {}", e)))?;

        for item in &input.items {
            sqlx::query(
                r#"
                INSERT INTO service_items (service_item_id, order_id, inventory_item_id, description, quantity, unit_price)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(order.order_id)
            .bind(item.inventory_item_id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert service item: {}", e))
            })?;

            StockLedger::decrement(&mut tx, item.inventory_item_id, item.quantity).await?;
        }

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        ORDERS_TOTAL.with_label_values(&["create", "ok"]).inc();

        info!(
            order_id = %order.order_id,
            items = input.items.len(),
            total_cost = order.total_cost,
            "Service order created"
        );

        self.assemble_order_detail(order).await
    }

    /// Bare order row, no joins.
    pub async fn get_service_order_row(
        &self,
        order_id: Uuid,
    ) -> Result<Option<ServiceOrder>, AppError> {
        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            "SELECT {} FROM service_orders WHERE order_id = $1",
            SERVICE_ORDER_COLUMNS
        ))
        .bind(order_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get order: {}", e)))?;

        Ok(order)
    }

    /// Fully resolved order: staff, vehicle with customer, line items.
    pub async fn get_service_order(
        &self,
        order_id: Uuid,
    ) -> Result<Option<ServiceOrderDetail>, AppError> {
        match self.get_service_order_row(order_id).await? {
            Some(order) => Ok(Some(self.assemble_order_detail(order).await?)),
            None => Ok(None),
        }
    }

    /// Page of orders, most recent service date first.
    pub async fn list_service_orders(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<ServiceOrderDetail>, i64), AppError> {
        let orders = sqlx::query_as::<_, ServiceOrder>(&format!(
            r#"
            SELECT {}
            FROM service_orders
            ORDER BY service_date DESC
            LIMIT $1 OFFSET $2
            "#,
            SERVICE_ORDER_COLUMNS
        ))
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list orders: {}", e)))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM service_orders")
            .fetch_one(self.pool())
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to count orders: {}", e)))?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.assemble_order_detail(order).await?);
        }

        Ok((details, total))
    }

    /// Update an order's scalar fields. Line items and their stock are
    /// untouched; those move only through the service-item operations.
    #[instrument(skip(self, input), fields(order_id = %order_id))]
    pub async fn update_service_order(
        &self,
        order_id: Uuid,
        input: &UpdateServiceOrder,
    ) -> Result<ServiceOrderDetail, AppError> {
        self.get_service_order_row(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service order not found")))?;

        if let Some(staff_id) = input.staff_id {
            self.get_staff(staff_id)
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Staff member not found")))?;
        }
        if let Some(vehicle_id) = input.vehicle_id {
            self.get_vehicle(vehicle_id)
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Vehicle not found")))?;
        }

        let order = sqlx::query_as::<_, ServiceOrder>(&format!(
            r#"
            UPDATE service_orders
            SET service_date = COALESCE($2, service_date),
                total_cost = COALESCE($3, total_cost),
                notes = COALESCE($4, notes),
                staff_id = COALESCE($5, staff_id),
                vehicle_id = COALESCE($6, vehicle_id)
            WHERE order_id = $1
            RETURNING {}
            "#,
            SERVICE_ORDER_COLUMNS
        ))
        .bind(order_id)
        .bind(input.service_date)
        .bind(input.total_cost)
        .bind(&input.notes)
        .bind(input.staff_id)
        .bind(input.vehicle_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update order: {}", e)))?;

        ORDERS_TOTAL.with_label_values(&["update", "ok"]).inc();

        self.assemble_order_detail(order).await
    }

    /// Delete an order, restoring the stock of every line item in the same
    /// transaction. The item rows themselves go with the order cascade.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn delete_service_order(&self, order_id: Uuid) -> Result<(), AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["delete_service_order"])
            .start_timer();

        self.get_service_order_row(order_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service order not found")))?;

        let mut tx = self.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let reservations: Vec<(Uuid, i32)> = sqlx::query_as(
            "SELECT inventory_item_id, quantity FROM service_items WHERE order_id = $1",
        )
        .bind(order_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to read order items: {}", e))
        })?;

        for (inventory_item_id, quantity) in &reservations {
            StockLedger::increment(&mut tx, *inventory_item_id, *quantity).await?;
        }

        sqlx::query("DELETE FROM service_orders WHERE order_id = $1")
            .bind(order_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to delete order: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();
        ORDERS_TOTAL.with_label_values(&["delete", "ok"]).inc();

        info!(
            order_id = %order_id,
            restored_items = reservations.len(),
            "Service order deleted, stock restored"
        );

        Ok(())
    }

    async fn assemble_order_detail(
        &self,
        order: ServiceOrder,
    ) -> Result<ServiceOrderDetail, AppError> {
        let staff = self.get_staff(order.staff_id).await?.ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Staff {} missing for order {}",
                order.staff_id,
                order.order_id
            ))
        })?;

        let vehicle = self
            .get_vehicle_with_customer(order.vehicle_id)
            .await?
            .ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Vehicle {} missing for order {}",
                    order.vehicle_id,
                    order.order_id
                ))
            })?;

        let items = self.order_item_details(order.order_id).await?;

        Ok(ServiceOrderDetail {
            order,
            staff,
            vehicle,
            items,
        })
    }
}
