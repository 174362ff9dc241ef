use async_trait::async_trait;
use common::money::Money;
use sqlx::PgPool;

use crate::domain::entities::Wallet;
use crate::domain::error::TransferError;
use crate::domain::repository::{PgTransaction, WalletRepository};
use crate::domain::types::WalletId;
use crate::infrastructure::persistence::models::WalletModel;

/// Repositorio de Billeteras basado en PostgreSQL.
pub struct PostgresWalletRepository {
    pool: PgPool,
}

impl PostgresWalletRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WalletRepository for PostgresWalletRepository {
    /// Busca una billetera por su ID, sin lock.
    async fn find_by_id(&self, id: WalletId) -> Result<Option<Wallet>, TransferError> {
        let model_opt = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT * FROM wallets
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TransferError::RepositoryError(e.to_string()))?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Toma el row lock exclusivo y lee el estado vigente.
    ///
    /// Puede bloquear si otra transacción tiene la fila; el orden de
    /// adquisición lo decide el coordinador (ascendente por id).
    async fn lock_for_update(
        &self,
        txn: &mut PgTransaction<'_>,
        id: WalletId,
    ) -> Result<Option<Wallet>, TransferError> {
        let model_opt = sqlx::query_as::<_, WalletModel>(
            r#"
            SELECT * FROM wallets
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **txn)
        .await
        .map_err(TransferError::from_sqlx)?;

        Ok(model_opt.map(|m| m.into()))
    }

    /// Update con predicado de versión (optimistic locking).
    ///
    /// Redundante bajo aislamiento SERIALIZABLE, pero queda como segunda
    /// línea de defensa contra lost updates y es verificable de forma aislada.
    async fn update_balance_versioned(
        &self,
        txn: &mut PgTransaction<'_>,
        id: WalletId,
        new_balance: Money,
        expected_version: i32,
    ) -> Result<u64, TransferError> {
        let result = sqlx::query(
            r#"
            UPDATE wallets
            SET balance = $1,
                version = version + 1,
                updated_at = now()
            WHERE id = $2 AND version = $3
            "#,
        )
        .bind(new_balance.as_decimal())
        .bind(id)
        .bind(expected_version)
        .execute(&mut **txn)
        .await
        .map_err(TransferError::from_sqlx)?;

        Ok(result.rows_affected())
    }
}
