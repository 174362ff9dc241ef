use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::domain::error::TransferError;
use crate::domain::interest::{daily_interest, InterestCalculation};
use crate::domain::repository::{InterestCalculationRepository, WalletRepository};
use crate::domain::types::WalletId;

/// Caso de uso del cálculo de interés diario.
///
/// Computa el interés de un día sobre el saldo vigente de la billetera y deja
/// una fila de auditoría por cada corrida. No acredita nada: mover el interés
/// a la billetera es una transferencia normal desde una billetera POOL.
pub struct CalculateDailyInterestUseCase {
    wallet_repo: Arc<dyn WalletRepository>,
    interest_repo: Arc<dyn InterestCalculationRepository>,
}

impl CalculateDailyInterestUseCase {
    pub fn new(
        wallet_repo: Arc<dyn WalletRepository>,
        interest_repo: Arc<dyn InterestCalculationRepository>,
    ) -> Self {
        Self {
            wallet_repo,
            interest_repo,
        }
    }

    /// Calcula y registra el interés de hoy para `wallet_id` a `annual_rate`.
    ///
    /// La tasa es una fracción decimal en `[0, 1]`; la billetera debe existir
    /// y estar ACTIVE.
    #[tracing::instrument(name = "CalculateDailyInterestUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        wallet_id: WalletId,
        annual_rate: Decimal,
    ) -> Result<InterestCalculation, TransferError> {
        if annual_rate < Decimal::ZERO || annual_rate > Decimal::ONE {
            return Err(TransferError::InvalidRequest(
                "annual_rate must be a decimal fraction between 0 and 1".to_string(),
            ));
        }

        let wallet = self
            .wallet_repo
            .find_by_id(wallet_id)
            .await?
            .ok_or(TransferError::WalletNotFound(wallet_id))?;

        if !wallet.is_active() {
            return Err(TransferError::InactiveWallet(wallet_id));
        }

        let interest_amount = daily_interest(wallet.balance, annual_rate)?;

        let calculation = InterestCalculation::new(
            wallet_id,
            wallet.balance,
            annual_rate,
            interest_amount,
            Utc::now().date_naive(),
        );

        self.interest_repo.insert(calculation).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Wallet, WalletStatus, WalletType};
    use crate::domain::repository::{MockInterestCalculationRepository, PgTransaction};
    use async_trait::async_trait;
    use common::money::Money;
    use rust_decimal_macros::dec;

    struct StubWalletRepository {
        wallet: Option<Wallet>,
    }

    #[async_trait]
    impl WalletRepository for StubWalletRepository {
        async fn find_by_id(&self, _id: WalletId) -> Result<Option<Wallet>, TransferError> {
            Ok(self.wallet.clone())
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

    fn active_wallet(id: WalletId, balance: &str) -> Wallet {
        let now = chrono::Utc::now();
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
    async fn test_calculate_interest_persists_audit_row() {
        // Arrange
        let wallet_id = WalletId::new();
        let wallet_repo = StubWalletRepository {
            wallet: Some(active_wallet(wallet_id, "10000.00")),
        };

        let mut interest_repo = MockInterestCalculationRepository::new();
        interest_repo
            .expect_insert()
            .withf(move |c: &InterestCalculation| {
                c.wallet_id == wallet_id
                    && c.principal.to_string() == "10000.00"
                    && c.interest_amount.to_string() == "1.00"
            })
            .times(1)
            .returning(|c| Ok(c));

        let use_case =
            CalculateDailyInterestUseCase::new(Arc::new(wallet_repo), Arc::new(interest_repo));

        // Act
        let result = use_case.execute(wallet_id, dec!(0.0365)).await.unwrap();

        // Assert
        assert_eq!(result.interest_amount.to_string(), "1.00");
        assert_eq!(result.annual_rate, dec!(0.0365));
    }

    #[tokio::test]
    async fn test_calculate_interest_rejects_out_of_range_rate() {
        let use_case = CalculateDailyInterestUseCase::new(
            Arc::new(StubWalletRepository { wallet: None }),
            Arc::new(MockInterestCalculationRepository::new()),
        );

        let result = use_case.execute(WalletId::new(), dec!(1.5)).await;
        assert!(matches!(result, Err(TransferError::InvalidRequest(_))));

        let result = use_case.execute(WalletId::new(), dec!(-0.01)).await;
        assert!(matches!(result, Err(TransferError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_calculate_interest_wallet_not_found() {
        let use_case = CalculateDailyInterestUseCase::new(
            Arc::new(StubWalletRepository { wallet: None }),
            Arc::new(MockInterestCalculationRepository::new()),
        );

        let wallet_id = WalletId::new();
        let result = use_case.execute(wallet_id, dec!(0.05)).await;

        assert_eq!(result.unwrap_err(), TransferError::WalletNotFound(wallet_id));
    }

    #[tokio::test]
    async fn test_calculate_interest_rejects_inactive_wallet() {
        let wallet_id = WalletId::new();
        let mut wallet = active_wallet(wallet_id, "500.00");
        wallet.status = WalletStatus::SUSPENDED;

        let use_case = CalculateDailyInterestUseCase::new(
            Arc::new(StubWalletRepository {
                wallet: Some(wallet),
            }),
            Arc::new(MockInterestCalculationRepository::new()),
        );

        let result = use_case.execute(wallet_id, dec!(0.05)).await;

        assert_eq!(result.unwrap_err(), TransferError::InactiveWallet(wallet_id));
    }
}
