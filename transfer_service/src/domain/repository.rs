use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::money::Money;

use crate::domain::entities::{LedgerEntry, TransactionLog, Wallet};
use crate::domain::error::TransferError;
use crate::domain::interest::InterestCalculation;
use crate::domain::types::{TransactionId, WalletId};

/// Handle explícito de transacción de base de datos.
///
/// Los métodos que participan de la sección serializable lo reciben del
/// coordinador; el rollback ocurre automáticamente si el handle se descarta
/// sin commit.
pub type PgTransaction<'t> = sqlx::Transaction<'t, sqlx::Postgres>;

// Interface (Port) for Wallet persistence
#[async_trait]
pub trait WalletRepository: Send + Sync {
    /// Lectura sin lock, para superficies de solo lectura.
    async fn find_by_id(&self, id: WalletId) -> Result<Option<Wallet>, TransferError>;

    /// `SELECT ... FOR UPDATE` dentro de la transacción del caller.
    async fn lock_for_update(
        &self,
        txn: &mut PgTransaction<'_>,
        id: WalletId,
    ) -> Result<Option<Wallet>, TransferError>;

    /// Update con predicado de versión. Retorna filas afectadas: cero
    /// significa que la versión avanzó por debajo nuestro (lost update).
    async fn update_balance_versioned(
        &self,
        txn: &mut PgTransaction<'_>,
        id: WalletId,
        new_balance: Money,
        expected_version: i32,
    ) -> Result<u64, TransferError>;
}

// Interface (Port) for TransactionLog persistence
#[async_trait]
pub trait TransactionLogRepository: Send + Sync {
    /// Inserta el registro de intención con estado PENDING. Una violación de
    /// unicidad sobre `idempotency_key` se reporta como `DuplicateKey`.
    async fn insert_pending(&self, log: TransactionLog) -> Result<TransactionLog, TransferError>;

    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<TransactionLog>, TransferError>;

    async fn find_by_id(&self, id: TransactionId) -> Result<Option<TransactionLog>, TransferError>;

    /// PENDING → PROCESSING, dentro de la transacción serializable.
    async fn mark_processing(
        &self,
        txn: &mut PgTransaction<'_>,
        id: TransactionId,
    ) -> Result<(), TransferError>;

    /// PROCESSING → COMPLETED con `completed_at`, dentro de la misma transacción.
    async fn mark_completed(
        &self,
        txn: &mut PgTransaction<'_>,
        id: TransactionId,
        completed_at: DateTime<Utc>,
    ) -> Result<(), TransferError>;

    /// Marca terminal FAILED, fuera de la transacción abortada (best-effort).
    async fn mark_failed(&self, id: TransactionId, error_message: &str)
        -> Result<(), TransferError>;
}

// Interface (Port) for LedgerEntry persistence
#[async_trait]
pub trait LedgerRepository: Send + Sync {
    /// Inserta el par débito/crédito dentro de la transacción del caller,
    /// verificando primero que el par balancea.
    async fn append_pair(
        &self,
        txn: &mut PgTransaction<'_>,
        debit: LedgerEntry,
        credit: LedgerEntry,
    ) -> Result<(), TransferError>;

    /// Asientos de una transacción, usados para reconstruir resultados en replay.
    async fn find_by_transaction_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<LedgerEntry>, TransferError>;
}

// Interface (Port) for InterestCalculation persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterestCalculationRepository: Send + Sync {
    /// Registra el cálculo de interés como fila de auditoría (append-only).
    async fn insert(
        &self,
        calculation: InterestCalculation,
    ) -> Result<InterestCalculation, TransferError>;
}
