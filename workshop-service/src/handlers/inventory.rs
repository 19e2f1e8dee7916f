use crate::models::{CreateInventoryItem, InventoryListParams, UpdateInventoryItem};
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
use workshop_core::utils::pagination::Paginated;

pub async fn create_inventory_item(
    State(state): State<AppState>,
    Json(input): Json<CreateInventoryItem>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    let item = state.db.create_inventory_item(&input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

pub async fn get_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let item = state
        .db
        .get_inventory_item(item_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Inventory item not found")))?;
    Ok(Json(item))
}

pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
    Json(input): Json<UpdateInventoryItem>,
) -> Result<impl IntoResponse, AppError> {
    input.validate()?;
    let item = state.db.update_inventory_item(item_id, &input).await?;
    Ok(Json(item))
}

pub async fn delete_inventory_item(
    State(state): State<AppState>,
    Path(item_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    state.db.delete_inventory_item(item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_inventory_items(
    State(state): State<AppState>,
    Query(params): Query<InventoryListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (items, total) = state.db.list_inventory_items(&params).await?;
    Ok(Json(Paginated::new(items, total, &params.pagination())))
}

pub async fn low_stock_items(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.db.low_stock_items().await?;
    Ok(Json(items))
}

pub async fn out_of_stock_items(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let items = state.db.out_of_stock_items().await?;
    Ok(Json(items))
}
