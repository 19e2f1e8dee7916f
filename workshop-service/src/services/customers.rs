//! Customer operations.

use crate::models::{CreateCustomer, Customer, UpdateCustomer};
use crate::services::Database;
use tracing::{info, instrument};
use uuid::Uuid;
use workshop_core::error::AppError;
use workshop_core::utils::pagination::PaginationParams;

impl Database {
    #[instrument(skip(self, input))]
    pub async fn create_customer(&self, input: &CreateCustomer) -> Result<Customer, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            INSERT INTO customers (customer_id, name, phone_number)
            VALUES ($1, $2, $3)
            RETURNING customer_id, name, phone_number, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(&input.phone_number)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create customer: {}", e)))?;

        info!(customer_id = %customer.customer_id, "Customer created");

        Ok(customer)
    }

    pub async fn get_customer(&self, customer_id: Uuid) -> Result<Option<Customer>, AppError> {
        let customer = sqlx::query_as::<_, Customer>(
            "SELECT customer_id, name, phone_number, created_utc FROM customers WHERE customer_id = $1",
        )
        .bind(customer_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get customer: {}", e)))?;

        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        customer_id: Uuid,
        input: &UpdateCustomer,
    ) -> Result<Customer, AppError> {
        self.get_customer(customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;

        let customer = sqlx::query_as::<_, Customer>(
            r#"
            UPDATE customers
            SET name = COALESCE($2, name),
                phone_number = COALESCE($3, phone_number)
            WHERE customer_id = $1
            RETURNING customer_id, name, phone_number, created_utc
            "#,
        )
        .bind(customer_id)
        .bind(&input.name)
        .bind(&input.phone_number)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update customer: {}", e)))?;

        Ok(customer)
    }

    /// Delete a customer. Vehicles cascade, but a vehicle with service
    /// orders blocks the cascade (the orders' FK is RESTRICT, since
    /// dropping them would strand their stock reservations) and the whole
    /// delete surfaces as a conflict.
    #[instrument(skip(self), fields(customer_id = %customer_id))]
    pub async fn delete_customer(&self, customer_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM customers WHERE customer_id = $1")
            .bind(customer_id)
            .execute(self.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Customer has vehicles with service orders and cannot be deleted"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete customer: {}", e)),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("Customer not found")));
        }

        info!(customer_id = %customer_id, "Customer deleted");

        Ok(())
    }

    pub async fn list_customers(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<Customer>, i64), AppError> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT customer_id, name, phone_number, created_utc
            FROM customers
            ORDER BY name ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list customers: {}", e)))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to count customers: {}", e))
            })?;

        Ok((customers, total))
    }
}
