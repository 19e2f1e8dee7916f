//! Staff model. Authentication is handled upstream; callers identify the
//! acting staff member via the `X-Staff-ID` header.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Staff {
    pub staff_id: Uuid,
    pub name: String,
    pub email: String,
    pub created_utc: DateTime<Utc>,
}
