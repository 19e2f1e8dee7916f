use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Vehicle {
    pub vehicle_id: Uuid,
    pub registration_plate: String,
    pub make: String,
    pub model: String,
    pub customer_id: Uuid,
    pub created_utc: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateVehicle {
    #[validate(length(min = 1, max = 20))]
    pub registration_plate: String,
    #[validate(length(min = 1, max = 50))]
    pub make: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    pub customer_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateVehicle {
    #[validate(length(min = 1, max = 20))]
    pub registration_plate: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub model: Option<String>,
    pub customer_id: Option<Uuid>,
}
