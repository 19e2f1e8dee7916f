//! Staff lookups. Staff records are provisioned out of band; the service
//! only dereferences the authenticated actor identifier.

use crate::models::Staff;
use crate::services::Database;
use uuid::Uuid;
use workshop_core::error::AppError;

impl Database {
    pub async fn get_staff(&self, staff_id: Uuid) -> Result<Option<Staff>, AppError> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT staff_id, name, email, created_utc FROM staff WHERE staff_id = $1",
        )
        .bind(staff_id)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get staff: {}", e)))?;

        Ok(staff)
    }
}
