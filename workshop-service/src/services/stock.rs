//! Stock ledger: the single point of truth for inventory stock mutation.
//!
//! Every mutating operation takes a `&mut PgConnection` so it executes on
//! the caller's transaction. A stock decrement is a single conditional
//! update (`SET stock = stock - qty WHERE ... AND stock >= qty`) with an
//! affected-row check, so concurrent decrements of the same item serialize
//! on the row and can never drive stock negative.

use crate::services::metrics::STOCK_MOVEMENTS;
use sqlx::PgConnection;
use uuid::Uuid;
use workshop_core::error::AppError;

/// Result of a stock availability check.
#[derive(Debug, Clone)]
pub struct StockCheck {
    pub name: String,
    pub stock: i32,
    pub sufficient: bool,
}

pub struct StockLedger;

impl StockLedger {
    /// Read an item's current stock and compare it against `requested`.
    /// Read-only; the authoritative check happens in [`Self::decrement`].
    pub async fn check_available(
        conn: &mut PgConnection,
        item_id: Uuid,
        requested: i32,
    ) -> Result<StockCheck, AppError> {
        let row: Option<(String, i32)> =
            sqlx::query_as("SELECT name, stock FROM inventory_items WHERE item_id = $1")
                .bind(item_id)
                .fetch_optional(&mut *conn)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to read stock: {}", e))
                })?;

        let (name, stock) = row.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Inventory item {} not found", item_id))
        })?;

        Ok(StockCheck {
            name,
            stock,
            sufficient: stock >= requested,
        })
    }

    /// Reserve `qty` units: decrement stock if and only if enough is on
    /// hand. Zero affected rows means the item vanished or the stock check
    /// failed under concurrency; a re-read distinguishes the two.
    pub async fn decrement(
        conn: &mut PgConnection,
        item_id: Uuid,
        qty: i32,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE inventory_items SET stock = stock - $2 WHERE item_id = $1 AND stock >= $2",
        )
        .bind(item_id)
        .bind(qty)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to decrement stock: {}", e)))?;

        if result.rows_affected() == 0 {
            let check = Self::check_available(&mut *conn, item_id, qty).await?;
            return Err(AppError::InsufficientStock {
                item: check.name,
                available: check.stock,
                requested: qty,
            });
        }

        STOCK_MOVEMENTS.with_label_values(&["reserve"]).inc();
        Ok(())
    }

    /// Release `qty` units back to stock. No upper bound. Zero affected
    /// rows means the item row is gone, which indicates referential
    /// integrity was violated elsewhere.
    pub async fn increment(
        conn: &mut PgConnection,
        item_id: Uuid,
        qty: i32,
    ) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE inventory_items SET stock = stock + $2 WHERE item_id = $1")
            .bind(item_id)
            .bind(qty)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to increment stock: {}", e))
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::DatabaseError(anyhow::anyhow!(
                "Inventory item {} missing during stock restore",
                item_id
            )));
        }

        STOCK_MOVEMENTS.with_label_values(&["release"]).inc();
        Ok(())
    }

    /// Apply a signed stock delta: positive adds to stock, negative
    /// reserves. Used by the quantity-update path, which passes the inverse
    /// of the quantity delta.
    pub async fn adjust(
        conn: &mut PgConnection,
        item_id: Uuid,
        delta: i32,
    ) -> Result<(), AppError> {
        match delta {
            0 => Ok(()),
            d if d > 0 => Self::increment(conn, item_id, d).await,
            d => Self::decrement(conn, item_id, -d).await,
        }
    }
}
