use axum::{extract::Path, Extension, Json};
use serde::Serialize;

use super::{required_name, NameRequest};
use crate::database::models::ShelvingUnit;
use crate::middleware::{ApiResponse, ApiResult, CurrentUser};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UnitListPayload {
    pub total: usize,
    pub items: Vec<ShelvingUnit>,
}

/// POST /estantes
pub async fn create(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    payload: Option<Json<NameRequest>>,
) -> ApiResult<ShelvingUnit> {
    let name = required_name(payload, "Nome da estante é obrigatório.")?;
    let unit = state.shelving_units().create(user.id, &name).await?;

    Ok(ApiResponse::created(unit).with_message("Estante criada com sucesso."))
}

/// GET /estantes
pub async fn list(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<UnitListPayload> {
    let items = state.shelving_units().list(user.id).await?;

    Ok(ApiResponse::success(UnitListPayload {
        total: items.len(),
        items,
    }))
}

/// PUT /estantes/:id
pub async fn update(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
    payload: Option<Json<NameRequest>>,
) -> ApiResult<()> {
    let name = required_name(payload, "Nome da estante é obrigatório para atualização.")?;
    state.shelving_units().update(user.id, id, &name).await?;

    Ok(ApiResponse::message(format!(
        "Estante com ID {id} atualizada com sucesso."
    )))
}

/// DELETE /estantes/:id
pub async fn delete(
    Extension(state): Extension<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> ApiResult<()> {
    state.shelving_units().delete(user.id, id).await?;

    Ok(ApiResponse::message(format!(
        "Estante com ID {id} excluída com sucesso."
    )))
}
