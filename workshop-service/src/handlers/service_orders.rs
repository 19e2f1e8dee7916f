use crate::middleware::StaffId;
use crate::models::{CreateServiceOrder, UpdateServiceOrder};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;
use workshop_core::error::AppError;
use workshop_core::utils::pagination::{Paginated, PaginationParams};

/// Create an order with its line items. The acting staff member comes from
/// the X-Staff-ID header, never from the body.
pub async fn create_service_order(
    State(state): State<AppState>,
    staff_id: StaffId,
    Json(input): Json<CreateServiceOrder>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    let order = state.db.create_service_order(staff_id.0, &input).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get_service_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let order = state
        .db
        .get_service_order(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service order not found")))?;
    Ok(Json(order))
}

pub async fn update_service_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<UpdateServiceOrder>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    let order = state.db.update_service_order(order_id, &input).await?;
    Ok(Json(order))
}

pub async fn delete_service_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.db.delete_service_order(order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_service_orders(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let (orders, total) = state.db.list_service_orders(&params).await?;
    Ok(Json(Paginated::new(orders, total, &params)))
}
