use common::money::Money;
use thiserror::Error;

use crate::domain::types::{TransactionId, WalletId};

/// Taxonomía de errores del servicio. Cada variante es un tipo de fallo de
/// negocio o de infraestructura con un código externo estable (ver `api::error`).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    #[error("Invalid transfer request: {0}")]
    InvalidRequest(String),

    #[error("Wallet not found with ID: {0}")]
    WalletNotFound(WalletId),

    #[error("Wallet {0} is not active")]
    InactiveWallet(WalletId),

    #[error("Insufficient funds: available {available}, required {required}")]
    InsufficientFunds { available: Money, required: Money },

    #[error("A transfer with idempotency key '{0}' is already in progress or terminally failed")]
    ConcurrentTransfer(String),

    #[error("Concurrent update conflict: {0}")]
    VersionConflict(String),

    #[error("Duplicate idempotency key: {0}")]
    DuplicateKey(String),

    #[error("Transaction {0} is not in the expected status for this transition")]
    InvalidTransition(TransactionId),

    #[error("Transaction not found with ID: {0}")]
    TransactionNotFound(TransactionId),

    #[error("Unbalanced ledger pair: {0}")]
    UnbalancedEntries(String),

    #[error("Repository error: {0}")]
    RepositoryError(String),

    #[error("Cache error: {0}")]
    CacheError(String),
}

impl TransferError {
    /// Mapea errores de sqlx dentro de la sección serializable.
    ///
    /// Un fallo de serialización (SQLSTATE 40001) puede aparecer en cualquier
    /// statement de una transacción SERIALIZABLE, no solo en el commit, y es
    /// la forma en que se manifiesta un conflicto de concurrencia: el caller
    /// puede reintentar. Todo lo demás es un error de repositorio.
    pub fn from_sqlx(e: sqlx::Error) -> TransferError {
        if let sqlx::Error::Database(db) = &e {
            if db.code().as_deref() == Some("40001") {
                return TransferError::VersionConflict(
                    "serializable transaction conflict".to_string(),
                );
            }
        }
        TransferError::RepositoryError(e.to_string())
    }
}
