use crate::models::{CreateServiceItem, UpdateServiceItem};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;
use workshop_core::error::AppError;

pub async fn list_order_items(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.db.list_service_items(order_id).await?;
    Ok(Json(items))
}

pub async fn create_service_item(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<CreateServiceItem>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    let item = state.db.create_service_item(order_id, &input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_service_item(
    State(state): State<AppState>,
    Path(service_item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .db
        .get_service_item(service_item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Service item not found")))?;
    Ok(Json(item))
}

pub async fn update_service_item(
    State(state): State<AppState>,
    Path(service_item_id): Path<Uuid>,
    Json(input): Json<UpdateServiceItem>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    let item = state.db.update_service_item(service_item_id, &input).await?;
    Ok(Json(item))
}

pub async fn delete_service_item(
    State(state): State<AppState>,
    Path(service_item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.db.delete_service_item(service_item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
