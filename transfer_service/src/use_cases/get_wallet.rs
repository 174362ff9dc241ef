use std::sync::Arc;

use crate::domain::{entities::Wallet, error::TransferError, repository::WalletRepository};
use crate::domain::types::WalletId;

/// Caso de uso para obtener los detalles de una billetera en particular.
///
/// Lectura sin lock: sirve superficies de consulta y nunca participa del
/// protocolo de transferencia.
pub struct GetWalletUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
}

impl GetWalletUseCase {
    pub fn new(wallet_repo: Arc<dyn WalletRepository>) -> Self {
        Self { wallet_repo }
    }

    /// Retorna la billetera o `WalletNotFound` si no existe.
    #[tracing::instrument(name = "GetWalletUseCase::execute", skip(self))]
    pub async fn execute(&self, wallet_id: WalletId) -> Result<Wallet, TransferError> {
        self.wallet_repo
            .find_by_id(wallet_id)
            .await?
            .ok_or(TransferError::WalletNotFound(wallet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{WalletStatus, WalletType};
    use crate::domain::repository::PgTransaction;
    use async_trait::async_trait;
    use chrono::Utc;
    use common::money::Money;
    use std::collections::HashMap;

    struct StubWalletRepository {
        wallets: HashMap<WalletId, Wallet>,
    }

    #[async_trait]
    impl WalletRepository for StubWalletRepository {
        async fn find_by_id(&self, id: WalletId) -> Result<Option<Wallet>, TransferError> {
            Ok(self.wallets.get(&id).cloned())
        }

        async fn lock_for_update(
            &self,
            _txn: &mut PgTransaction<'_>,
            _id: WalletId,
        ) -> Result<Option<Wallet>, TransferError> {
            Err(TransferError::RepositoryError(
                "lock_for_update is not available in unit tests".to_string(),
            ))
        }

        async fn update_balance_versioned(
            &self,
            _txn: &mut PgTransaction<'_>,
            _id: WalletId,
            _new_balance: Money,
            _expected_version: i32,
        ) -> Result<u64, TransferError> {
            Err(TransferError::RepositoryError(
                "update_balance_versioned is not available in unit tests".to_string(),
            ))
        }
    }

    fn wallet(id: WalletId, balance: &str) -> Wallet {
        let now = Utc::now();
        Wallet {
            id,
            owner_id: "owner-1".to_string(),
            wallet_type: WalletType::USER,
            balance: balance.parse().unwrap(),
            currency: "NGN".to_string(),
            status: WalletStatus::ACTIVE,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_wallet_success() {
        let wallet_id = WalletId::new();
        let mut wallets = HashMap::new();
        wallets.insert(wallet_id, wallet(wallet_id, "1000.00"));

        let use_case = GetWalletUseCase::new(Arc::new(StubWalletRepository { wallets }));
        let result = use_case.execute(wallet_id).await.unwrap();

        assert_eq!(result.id, wallet_id);
        assert_eq!(result.balance.to_string(), "1000.00");
    }

    #[tokio::test]
    async fn test_get_wallet_not_found() {
        let use_case = GetWalletUseCase::new(Arc::new(StubWalletRepository {
            wallets: HashMap::new(),
        }));

        let wallet_id = WalletId::new();
        let result = use_case.execute(wallet_id).await;

        assert_eq!(result.unwrap_err(), TransferError::WalletNotFound(wallet_id));
    }
}
