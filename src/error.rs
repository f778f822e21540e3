// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages.
/// Every variant renders as the `{"status": "erro", "mensagem": ...}` envelope.
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error (storage/infra failures, already logged)
    Storage(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::Storage(_) => 500,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::Storage(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "status": "erro",
            "mensagem": self.message(),
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::Storage(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::DatabaseError> for ApiError {
    fn from(err: crate::database::DatabaseError) -> Self {
        use crate::database::DatabaseError;

        match err {
            DatabaseError::NotFound(msg) => ApiError::not_found(msg),
            DatabaseError::Conflict(msg) => ApiError::conflict(msg),
            DatabaseError::ConfigMissing(what) => {
                tracing::error!("Missing configuration: {}", what);
                ApiError::storage("Falha ao conectar ao banco de dados.")
            }
            DatabaseError::InvalidDatabaseUrl => {
                tracing::error!("DATABASE_URL is not a valid connection string");
                ApiError::storage("Falha ao conectar ao banco de dados.")
            }
            DatabaseError::Sqlx(sqlx_err) => {
                // Log the real error but return a generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::storage("Erro interno ao processar a requisição.")
            }
            DatabaseError::Migration(msg) => {
                tracing::error!("Migration error: {}", msg);
                ApiError::storage("Erro interno ao processar a requisição.")
            }
        }
    }
}

impl From<crate::auth::AuthError> for ApiError {
    fn from(err: crate::auth::AuthError) -> Self {
        use crate::auth::AuthError;

        match err {
            AuthError::InvalidToken(_) => {
                ApiError::unauthorized("Token de autenticação inválido ou expirado.")
            }
            AuthError::TokenGeneration(msg) => {
                tracing::error!("JWT generation failed: {}", msg);
                ApiError::storage("Erro interno ao processar a requisição.")
            }
            AuthError::Hashing(msg) => {
                tracing::error!("Password hashing failed: {}", msg);
                ApiError::storage("Erro interno ao processar a requisição.")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
