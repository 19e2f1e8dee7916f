//! Vehicle operations.

use crate::models::{CreateVehicle, UpdateVehicle, Vehicle, VehicleWithCustomer};
use crate::services::Database;
use tracing::{info, instrument};
use uuid::Uuid;
use workshop_core::error::AppError;
use workshop_core::utils::pagination::PaginationParams;

impl Database {
    /// Create a vehicle for an existing customer.
    #[instrument(skip(self, input), fields(customer_id = %input.customer_id))]
    pub async fn create_vehicle(&self, input: &CreateVehicle) -> Result<Vehicle, AppError> {
        self.get_customer(input.customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (vehicle_id, registration_plate, make, model, customer_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING vehicle_id, registration_plate, make, model, customer_id, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.registration_plate)
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.customer_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create vehicle: {}", e)))?;

        info!(vehicle_id = %vehicle.vehicle_id, plate = %vehicle.registration_plate, "Vehicle created");

        Ok(vehicle)
    }

    pub async fn get_vehicle(&self, vehicle_id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT vehicle_id, registration_plate, make, model, customer_id, created_utc FROM vehicles WHERE vehicle_id = $1",
        )
        .bind(vehicle_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get vehicle: {}", e)))?;

        Ok(vehicle)
    }

    /// Vehicle with its owning customer, for nested responses.
    pub async fn get_vehicle_with_customer(
        &self,
        vehicle_id: Uuid,
    ) -> Result<Option<VehicleWithCustomer>, AppError> {
        let vehicle = match self.get_vehicle(vehicle_id).await? {
            Some(v) => v,
            None => return Ok(None),
        };

        let customer = self.get_customer(vehicle.customer_id).await?.ok_or_else(|| {
            AppError::DatabaseError(anyhow::anyhow!(
                "Customer {} missing for vehicle {}",
                vehicle.customer_id,
                vehicle_id
            ))
        })?;

        Ok(Some(VehicleWithCustomer { vehicle, customer }))
    }

    pub async fn update_vehicle(
        &self,
        vehicle_id: Uuid,
        input: &UpdateVehicle,
    ) -> Result<Vehicle, AppError> {
        self.get_vehicle(vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Vehicle not found")))?;

        if let Some(customer_id) = input.customer_id {
            self.get_customer(customer_id)
                .await?
                .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Customer not found")))?;
        }

        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET registration_plate = COALESCE($2, registration_plate),
                make = COALESCE($3, make),
                model = COALESCE($4, model),
                customer_id = COALESCE($5, customer_id)
            WHERE vehicle_id = $1
            RETURNING vehicle_id, registration_plate, make, model, customer_id, created_utc
            "#,
        )
        .bind(vehicle_id)
        .bind(&input.registration_plate)
        .bind(&input.make)
        .bind(&input.model)
        .bind(input.customer_id)
        .fetch_one(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update vehicle: {}", e)))?;

        Ok(vehicle)
    }

    /// Delete a vehicle. Vehicles with service orders are protected by the
    /// foreign key and surface as a conflict, since cascading the orders
    /// away would strand their stock reservations.
    #[instrument(skip(self), fields(vehicle_id = %vehicle_id))]
    pub async fn delete_vehicle(&self, vehicle_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM vehicles WHERE vehicle_id = $1")
            .bind(vehicle_id)
            .execute(self.pool())
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                    AppError::Conflict(anyhow::anyhow!(
                        "Vehicle has service orders and cannot be deleted"
                    ))
                }
                _ => AppError::DatabaseError(anyhow::anyhow!("Failed to delete vehicle: {}", e)),
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(anyhow::anyhow!("Vehicle not found")));
        }

        info!(vehicle_id = %vehicle_id, "Vehicle deleted");

        Ok(())
    }

    pub async fn list_vehicles(
        &self,
        params: &PaginationParams,
    ) -> Result<(Vec<VehicleWithCustomer>, i64), AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT vehicle_id, registration_plate, make, model, customer_id, created_utc
            FROM vehicles
            ORDER BY registration_plate ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list vehicles: {}", e)))?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vehicles")
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to count vehicles: {}", e))
            })?;

        let mut result = Vec::with_capacity(vehicles.len());
        for vehicle in vehicles {
            let customer = self.get_customer(vehicle.customer_id).await?.ok_or_else(|| {
                AppError::DatabaseError(anyhow::anyhow!(
                    "Customer {} missing for vehicle {}",
                    vehicle.customer_id,
                    vehicle.vehicle_id
                ))
            })?;
            result.push(VehicleWithCustomer { vehicle, customer });
        }

        Ok((result, total))
    }
}
