use axum::Extension;

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET / - plain greeting, no dependencies
pub async fn root() -> &'static str {
    "Olá, mundo! O backend do seu catálogo de livros está funcionando!"
}

/// GET /testar-db - acquire a connection and report connectivity
pub async fn test_db(Extension(state): Extension<AppState>) -> ApiResult<()> {
    crate::database::ping(&state.pool).await.map_err(|err| {
        tracing::error!("Database ping failed: {}", err);
        ApiError::storage(
            "Falha ao conectar ao banco de dados. Verifique as credenciais e se o PostgreSQL está rodando.",
        )
    })?;

    Ok(ApiResponse::message(
        "Conexão com o banco de dados PostgreSQL bem-sucedida!",
    ))
}
