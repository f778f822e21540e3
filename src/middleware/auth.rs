use axum::{
    extract::{Extension, Request},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller extracted from the bearer token. Protected handlers
/// take this as an `Extension`, making the auth dependency visible in their
/// signatures.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
}

/// Bearer-token middleware for the protected route groups: rejects missing
/// or invalid credentials with the error envelope and injects `CurrentUser`
/// into request extensions.
pub async fn require_auth(
    Extension(state): Extension<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers)?;

    let claims = state
        .tokens
        .verify(&token)
        .map_err(|_| ApiError::unauthorized("Token de autenticação inválido ou expirado."))?;

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| ApiError::unauthorized("Token de autenticação ausente."))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::unauthorized("Cabeçalho de autorização inválido."))?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err(ApiError::unauthorized("Token de autenticação ausente."));
        }
        Ok(token.to_string())
    } else {
        Err(ApiError::unauthorized(
            "Cabeçalho de autorização deve usar o formato Bearer.",
        ))
    }
}
