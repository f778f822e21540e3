use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// Wrapper for success responses that renders the
/// `{"status": "sucesso", "mensagem"?, ...payload}` envelope. The payload's
/// own fields are flattened into the envelope object, so a payload of
/// `{total, items}` becomes `{"status": "sucesso", "total": ..., "items": ...}`.
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    payload: T,
    mensagem: Option<String>,
    status_code: Option<StatusCode>,
}

impl ApiResponse<()> {
    /// Message-only success body, for update/delete confirmations.
    pub fn message(mensagem: impl Into<String>) -> Self {
        Self {
            payload: (),
            mensagem: Some(mensagem.into()),
            status_code: None,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Successful response with default 200 status
    pub fn success(payload: T) -> Self {
        Self {
            payload,
            mensagem: None,
            status_code: None,
        }
    }

    /// Response with custom status code
    pub fn with_status(payload: T, status_code: StatusCode) -> Self {
        Self {
            payload,
            mensagem: None,
            status_code: Some(status_code),
        }
    }

    /// 201 Created response
    pub fn created(payload: T) -> Self {
        Self::with_status(payload, StatusCode::CREATED)
    }

    /// Attach a `mensagem` field to the envelope
    pub fn with_message(mut self, mensagem: impl Into<String>) -> Self {
        self.mensagem = Some(mensagem.into());
        self
    }

    /// Build the flattened envelope object. The payload must serialize to a
    /// JSON object (or null for message-only bodies).
    fn envelope(&self) -> Result<Value, String> {
        let payload_value =
            serde_json::to_value(&self.payload).map_err(|e| e.to_string())?;

        let mut envelope = Map::new();
        envelope.insert("status".to_string(), Value::String("sucesso".to_string()));
        if let Some(mensagem) = &self.mensagem {
            envelope.insert("mensagem".to_string(), Value::String(mensagem.clone()));
        }

        match payload_value {
            Value::Object(fields) => envelope.extend(fields),
            Value::Null => {}
            other => return Err(format!("payload is not a JSON object: {other}")),
        }

        Ok(Value::Object(envelope))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code.unwrap_or(StatusCode::OK);

        match self.envelope() {
            Ok(body) => (status, Json(body)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response payload: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "status": "erro",
                        "mensagem": "Erro interno ao serializar a resposta.",
                    })),
                )
                    .into_response()
            }
        }
    }
}

// Convenience type alias
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
