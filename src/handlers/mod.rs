pub mod auth;
pub mod health;
pub mod shelves;
pub mod shelving_units;

use axum::Json;
use serde::Deserialize;

use crate::error::ApiError;

/// Request body shared by every create/rename route: a single `name` field.
#[derive(Debug, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

/// Body must be present with a non-empty name after trimming; `missing` is
/// the resource-specific message for both the absent and blank cases.
fn required_name(payload: Option<Json<NameRequest>>, missing: &str) -> Result<String, ApiError> {
    let Some(Json(body)) = payload else {
        return Err(ApiError::validation(missing));
    };

    let name = body.name.trim();
    if name.is_empty() {
        return Err(ApiError::validation(missing));
    }

    Ok(name.to_string())
}
