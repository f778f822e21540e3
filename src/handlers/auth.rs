use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisteredPayload {
    pub id: i64,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginPayload {
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Serialize)]
pub struct LoginUser {
    pub id: i64,
    pub username: String,
}

/// POST /registrar - create an account
pub async fn register(
    Extension(state): Extension<AppState>,
    payload: Option<Json<RegisterRequest>>,
) -> ApiResult<RegisteredPayload> {
    let Some(Json(body)) = payload else {
        return Err(ApiError::validation(
            "Nome de usuário, senha e email são obrigatórios.",
        ));
    };

    let username = body.username.trim();
    let email = body.email.trim();
    validate_username(username)?;
    validate_email(email)?;
    if body.password.is_empty() {
        return Err(ApiError::validation("Senha é obrigatória."));
    }

    let password_hash = state.passwords.hash(&body.password)?;
    let id = state.users().create(username, email, &password_hash).await?;

    tracing::info!("Registered user '{}'", username);

    Ok(
        ApiResponse::created(RegisteredPayload {
            id,
            username: username.to_string(),
        })
        .with_message("Usuário registrado com sucesso."),
    )
}

/// POST /login - verify credentials and mint a bearer token
pub async fn login(
    Extension(state): Extension<AppState>,
    payload: Option<Json<LoginRequest>>,
) -> ApiResult<LoginPayload> {
    let Some(Json(body)) = payload else {
        return Err(ApiError::validation("Nome de usuário e senha são obrigatórios."));
    };

    let username = body.username.trim();
    if username.is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("Nome de usuário e senha são obrigatórios."));
    }

    let user = state
        .users()
        .find_by_username(username)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Credenciais inválidas."))?;

    if !state.passwords.verify(&body.password, &user.password_hash)? {
        return Err(ApiError::unauthorized("Credenciais inválidas."));
    }

    let token = state.tokens.mint(user.id, &user.username)?;

    Ok(ApiResponse::success(LoginPayload {
        token,
        user: LoginUser {
            id: user.id,
            username: user.username,
        },
    })
    .with_message("Login realizado com sucesso."))
}

fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::validation("Nome de usuário é obrigatório."));
    }
    if username.len() < 3 || username.len() > 50 {
        return Err(ApiError::validation(
            "Nome de usuário deve ter entre 3 e 50 caracteres.",
        ));
    }
    // Alphanumeric plus underscore and hyphen, starting alphanumeric
    let mut chars = username.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !starts_ok || !rest_ok {
        return Err(ApiError::validation(
            "Nome de usuário deve conter apenas letras, números, '_' ou '-'.",
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || !parts[1].contains('.') {
        return Err(ApiError::validation("Email inválido."));
    }
    Ok(())
}
