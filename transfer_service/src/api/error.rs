use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::TransferError;

// Definimos un error unificado para la API del servicio
#[derive(Debug)]
pub struct ApiError(pub TransferError);

// Permitimos convertir errores de dominio al ApiError implícitamente
impl From<TransferError> for ApiError {
    fn from(err: TransferError) -> Self {
        ApiError(err)
    }
}

/// Código externo estable de cada variante. Los clientes programan contra
/// estos códigos, no contra los mensajes.
pub fn error_code(err: &TransferError) -> &'static str {
    match err {
        TransferError::InvalidRequest(_) => "INVALID_REQUEST",
        TransferError::WalletNotFound(_) => "WALLET_NOT_FOUND",
        TransferError::InactiveWallet(_) => "INACTIVE_WALLET",
        TransferError::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
        TransferError::ConcurrentTransfer(_) => "CONCURRENT_IN_PROGRESS",
        TransferError::VersionConflict(_) => "VERSION_CONFLICT",
        TransferError::DuplicateKey(_) => "CONCURRENT_IN_PROGRESS",
        TransferError::TransactionNotFound(_) => "TRANSACTION_NOT_FOUND",
        TransferError::InvalidTransition(_)
        | TransferError::UnbalancedEntries(_)
        | TransferError::RepositoryError(_)
        | TransferError::CacheError(_) => "INTERNAL_ERROR",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = error_code(&self.0);

        let (status, body) = match &self.0 {
            TransferError::InvalidRequest(_) | TransferError::InactiveWallet(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "status": "error", "code": code, "message": self.0.to_string() }),
            ),
            TransferError::InsufficientFunds {
                available,
                required,
            } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "status": "error",
                    "code": code,
                    "message": self.0.to_string(),
                    "details": { "available": available, "required": required },
                }),
            ),
            TransferError::WalletNotFound(_) | TransferError::TransactionNotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "status": "error", "code": code, "message": self.0.to_string() }),
            ),
            TransferError::ConcurrentTransfer(_)
            | TransferError::VersionConflict(_)
            | TransferError::DuplicateKey(_) => (
                StatusCode::CONFLICT,
                json!({ "status": "error", "code": code, "message": self.0.to_string() }),
            ),
            TransferError::InvalidTransition(_)
            | TransferError::UnbalancedEntries(_)
            | TransferError::RepositoryError(_)
            | TransferError::CacheError(_) => {
                tracing::error!("Internal error serving request: {}", self.0);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "status": "error",
                        "code": code,
                        "message": "Internal server error",
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
