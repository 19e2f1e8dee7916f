use crate::models::{CreateVehicle, UpdateVehicle};
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

pub async fn create_vehicle(
    State(state): State<AppState>,
    Json(input): Json<CreateVehicle>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    let vehicle = state.db.create_vehicle(&input).await?;
    Ok((StatusCode::CREATED, Json(vehicle)))
}

pub async fn get_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let vehicle = state
        .db
        .get_vehicle_with_customer(vehicle_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Vehicle not found")))?;
    Ok(Json(vehicle))
}

pub async fn update_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
    Json(input): Json<UpdateVehicle>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    let vehicle = state.db.update_vehicle(vehicle_id, &input).await?;
    Ok(Json(vehicle))
}

pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path(vehicle_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.db.delete_vehicle(vehicle_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_vehicles(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, AppError> {
    let (vehicles, total) = state.db.list_vehicles(&params).await?;
    Ok(Json(Paginated::new(vehicles, total, &params)))
}
