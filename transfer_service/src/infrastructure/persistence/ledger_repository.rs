use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::entities::LedgerEntry;
use crate::domain::error::TransferError;
use crate::domain::repository::{LedgerRepository, PgTransaction};
use crate::domain::types::TransactionId;
use crate::infrastructure::persistence::models::LedgerEntryModel;

/// Repositorio del ledger de doble partida basado en PostgreSQL.
///
/// La tabla es append-only: solo INSERT, nunca UPDATE ni DELETE.
pub struct PostgresLedgerRepository {
    pool: PgPool,
}

impl PostgresLedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_entry(
        txn: &mut PgTransaction<'_>,
        entry: LedgerEntry,
    ) -> Result<(), TransferError> {
        let model = LedgerEntryModel::from(entry);

        sqlx::query(
            r#"
            INSERT INTO ledger_entries (
                id, transaction_id, wallet_id, entry_type, amount, currency,
                balance_after, description, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(model.id)
        .bind(model.transaction_id)
        .bind(model.wallet_id)
        .bind(model.entry_type)
        .bind(model.amount)
        .bind(model.currency)
        .bind(model.balance_after)
        .bind(model.description)
        .bind(model.created_at)
        .bind(model.updated_at)
        .execute(&mut **txn)
        .await
        .map_err(TransferError::from_sqlx)?;

        Ok(())
    }
}

#[async_trait]
impl LedgerRepository for PostgresLedgerRepository {
    /// Inserta el par débito/crédito dentro de la transacción del caller.
    ///
    /// Verifica primero que el par balancea (mismo monto, misma moneda, lados
    /// opuestos, misma transacción). Un par desbalanceado es un bug del
    /// coordinador y aborta la transacción completa.
    async fn append_pair(
        &self,
        txn: &mut PgTransaction<'_>,
        debit: LedgerEntry,
        credit: LedgerEntry,
    ) -> Result<(), TransferError> {
        LedgerEntry::verify_pair(&debit, &credit)?;

        Self::insert_entry(txn, debit).await?;
        Self::insert_entry(txn, credit).await?;

        Ok(())
    }

    /// Recupera los asientos de una transacción, débito primero.
    async fn find_by_transaction_id(
        &self,
        transaction_id: TransactionId,
    ) -> Result<Vec<LedgerEntry>, TransferError> {
        let models = sqlx::query_as::<_, LedgerEntryModel>(
            r#"
            SELECT * FROM ledger_entries
            WHERE transaction_id = $1
            ORDER BY entry_type, created_at ASC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TransferError::RepositoryError(e.to_string()))?;

        Ok(models.into_iter().map(|m| m.into()).collect())
    }
}
