use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::entities::{TransactionLog, TransactionStatus};
use crate::domain::error::TransferError;
use crate::domain::repository::{PgTransaction, TransactionLogRepository};
use crate::domain::types::TransactionId;
use crate::infrastructure::persistence::models::TransactionLogModel;

/// Repositorio del registro de transacciones implementado para PostgreSQL.
///
/// Utiliza consultas SQL parametrizadas directas con `sqlx` (Runtime-checked).
/// Las transiciones de estado llevan el estado esperado en el WHERE, de modo
/// que la máquina de estados PENDING → PROCESSING → COMPLETED/FAILED también
/// se hace cumplir en la base de datos.
pub struct PostgresTransactionLogRepository {
    /// Pool de conexiones a la base de datos PostgreSQL.
    pool: PgPool,
}

impl PostgresTransactionLogRepository {
    /// Crea una nueva instancia del repositorio.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db) if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation)
    )
}

#[async_trait]
impl TransactionLogRepository for PostgresTransactionLogRepository {
    /// Guarda la intención durable (INSERT con estado PENDING).
    ///
    /// Se ejecuta *antes* de cualquier movimiento de saldo. Si otro worker ya
    /// insertó la misma `idempotency_key`, el UNIQUE dispara y lo reportamos
    /// como `DuplicateKey` para que el coordinador resuelva el empate.
    async fn insert_pending(&self, log: TransactionLog) -> Result<TransactionLog, TransferError> {
        let key = log.idempotency_key.clone();
        let model = TransactionLogModel::from(log);

        let saved_model = sqlx::query_as::<_, TransactionLogModel>(
            r#"
            INSERT INTO transaction_logs (
                id, idempotency_key, transaction_type, from_wallet_id, to_wallet_id,
                amount, currency, status, description, error_message, metadata,
                completed_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(model.id)
        .bind(model.idempotency_key)
        .bind(model.transaction_type)
        .bind(model.from_wallet_id)
        .bind(model.to_wallet_id)
        .bind(model.amount)
        .bind(model.currency)
        .bind(model.status)
        .bind(model.description)
        .bind(model.error_message)
        .bind(model.metadata)
        .bind(model.completed_at)
        .bind(model.created_at)
        .bind(model.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                TransferError::DuplicateKey(key.clone())
            } else {
                TransferError::RepositoryError(e.to_string())
            }
        })?;

        Ok(saved_model.into())
    }

    /// Busca por clave de idempotencia.
    async fn find_by_idempotency_key(
        &self,
        key: &str,
    ) -> Result<Option<TransactionLog>, TransferError> {
        let model_opt = sqlx::query_as::<_, TransactionLogModel>(
            r#"SELECT * FROM transaction_logs WHERE idempotency_key = $1"#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TransferError::RepositoryError(e.to_string()))?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Busca una transacción por su ID único (UUID).
    async fn find_by_id(&self, id: TransactionId) -> Result<Option<TransactionLog>, TransferError> {
        let model_opt = sqlx::query_as::<_, TransactionLogModel>(
            r#"SELECT * FROM transaction_logs WHERE id = $1"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TransferError::RepositoryError(e.to_string()))?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// PENDING → PROCESSING a la entrada de la sección serializable.
    async fn mark_processing(
        &self,
        txn: &mut PgTransaction<'_>,
        id: TransactionId,
    ) -> Result<(), TransferError> {
        let result = sqlx::query(
            r#"
            UPDATE transaction_logs
            SET status = $1, updated_at = now()
            WHERE id = $2 AND status = $3
            "#,
        )
        .bind(TransactionStatus::PROCESSING)
        .bind(id)
        .bind(TransactionStatus::PENDING)
        .execute(&mut **txn)
        .await
        .map_err(TransferError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(TransferError::InvalidTransition(id));
        }

        Ok(())
    }

    /// PROCESSING → COMPLETED en el mismo commit que mueve los saldos.
    async fn mark_completed(
        &self,
        txn: &mut PgTransaction<'_>,
        id: TransactionId,
        completed_at: DateTime<Utc>,
    ) -> Result<(), TransferError> {
        let result = sqlx::query(
            r#"
            UPDATE transaction_logs
            SET status = $1, completed_at = $2, updated_at = now()
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(TransactionStatus::COMPLETED)
        .bind(completed_at)
        .bind(id)
        .bind(TransactionStatus::PROCESSING)
        .execute(&mut **txn)
        .await
        .map_err(TransferError::from_sqlx)?;

        if result.rows_affected() == 0 {
            return Err(TransferError::InvalidTransition(id));
        }

        Ok(())
    }

    /// Marca terminal FAILED, fuera de la transacción principal.
    ///
    /// Tras el rollback la fila quedó PENDING (la transición a PROCESSING se
    /// deshizo con todo lo demás), así que aceptamos ambos estados de partida.
    async fn mark_failed(
        &self,
        id: TransactionId,
        error_message: &str,
    ) -> Result<(), TransferError> {
        sqlx::query(
            r#"
            UPDATE transaction_logs
            SET status = $1, error_message = $2, updated_at = now()
            WHERE id = $3 AND status IN ($4, $5)
            "#,
        )
        .bind(TransactionStatus::FAILED)
        .bind(error_message)
        .bind(id)
        .bind(TransactionStatus::PENDING)
        .bind(TransactionStatus::PROCESSING)
        .execute(&self.pool)
        .await
        .map_err(|e| TransferError::RepositoryError(e.to_string()))?;

        Ok(())
    }
}
