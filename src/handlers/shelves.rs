use axum::{extract::Path, Extension, Json};
use serde::Serialize;

use super::{required_name, NameRequest};
use crate::database::models::{Shelf, ShelfWithUnit};
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct ShelfListPayload {
    pub total: usize,
    pub items: Vec<Shelf>,
}

#[derive(Debug, Serialize)]
pub struct CatalogListPayload {
    pub total: usize,
    pub items: Vec<ShelfWithUnit>,
}

/// POST /estantes/:id/prateleiras
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(unit_id): Path<i64>,
    payload: Option<Json<NameRequest>>,
) -> ApiResult<Shelf> {
    let name = required_name(payload, "Nome da prateleira é obrigatório.")?;
    let shelf = state.shelves().create(user.id, unit_id, &name).await?;

    Ok(ApiResponse::created(shelf).with_message("Prateleira criada com sucesso."))
}

/// GET /estantes/:id/prateleiras
pub async fn list_by_unit(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(unit_id): Path<i64>,
) -> ApiResult<ShelfListPayload> {
    let items = state.shelves().list_by_unit(user.id, unit_id).await?;

    Ok(ApiResponse::success(ShelfListPayload {
        total: items.len(),
        items,
    }))
}

/// GET /prateleiras - every shelf the caller owns, with the parent unit name
pub async fn list_all(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<CatalogListPayload> {
    let items = state.shelves().list_all(user.id).await?;

    Ok(ApiResponse::success(CatalogListPayload {
        total: items.len(),
        items,
    }))
}

/// PUT /prateleiras/:id
pub async fn update(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    payload: Option<Json<NameRequest>>,
) -> ApiResult<()> {
    let name = required_name(payload, "Nome da prateleira é obrigatório para atualização.")?;
    state.shelves().update(user.id, id, &name).await?;

    Ok(ApiResponse::message(format!(
        "Prateleira com ID {id} atualizada com sucesso."
    )))
}

/// DELETE /prateleiras/:id
pub async fn delete(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.shelves().delete(user.id, id).await?;

    Ok(ApiResponse::message(format!(
        "Prateleira com ID {id} excluída com sucesso."
    )))
}
