use std::sync::Arc;

use crate::domain::entities::TransactionLog;
use crate::domain::error::TransferError;
use crate::domain::repository::TransactionLogRepository;
use crate::domain::types::TransactionId;

/// Caso de uso para consultar el registro de una transferencia por su ID.
pub struct GetTransactionUseCase {
    log_repo: Arc<dyn TransactionLogRepository>,
}

impl GetTransactionUseCase {
    pub fn new(log_repo: Arc<dyn TransactionLogRepository>) -> Self {
        Self { log_repo }
    }

    #[tracing::instrument(name = "GetTransactionUseCase::execute", skip(self))]
    pub async fn execute(&self, id: TransactionId) -> Result<TransactionLog, TransferError> {
        self.log_repo
            .find_by_id(id)
            .await?
            .ok_or(TransferError::TransactionNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{TransactionStatus, TransactionType};
    use crate::domain::repository::PgTransaction;
    use crate::domain::types::WalletId;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};

    struct StubTransactionLogRepository {
        log: Option<TransactionLog>,
    }

    #[async_trait]
    impl TransactionLogRepository for StubTransactionLogRepository {
        async fn insert_pending(
            &self,
            _log: TransactionLog,
        ) -> Result<TransactionLog, TransferError> {
            Err(TransferError::RepositoryError(
                "insert_pending is not available in unit tests".to_string(),
            ))
        }

        async fn find_by_idempotency_key(
            &self,
            _key: &str,
        ) -> Result<Option<TransactionLog>, TransferError> {
            Ok(None)
        }

        async fn find_by_id(
            &self,
            _id: TransactionId,
        ) -> Result<Option<TransactionLog>, TransferError> {
            Ok(self.log.clone())
        }

        async fn mark_processing(
            &self,
            _txn: &mut PgTransaction<'_>,
            _id: TransactionId,
        ) -> Result<(), TransferError> {
            Err(TransferError::RepositoryError(
                "mark_processing is not available in unit tests".to_string(),
            ))
        }

        async fn mark_completed(
            &self,
            _txn: &mut PgTransaction<'_>,
            _id: TransactionId,
            _completed_at: DateTime<Utc>,
        ) -> Result<(), TransferError> {
            Err(TransferError::RepositoryError(
                "mark_completed is not available in unit tests".to_string(),
            ))
        }

        async fn mark_failed(
            &self,
            _id: TransactionId,
            _error_message: &str,
        ) -> Result<(), TransferError> {
            Ok(())
        }
    }

    fn sample_log() -> TransactionLog {
        let now = Utc::now();
        TransactionLog {
            id: TransactionId::new(),
            idempotency_key: "t-details".to_string(),
            transaction_type: TransactionType::TRANSFER,
            from_wallet_id: WalletId::new(),
            to_wallet_id: WalletId::new(),
            amount: "100.00".parse().unwrap(),
            currency: "NGN".to_string(),
            status: TransactionStatus::COMPLETED,
            description: None,
            error_message: None,
            metadata: None,
            completed_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_get_transaction_success() {
        let log = sample_log();
        let use_case = GetTransactionUseCase::new(Arc::new(StubTransactionLogRepository {
            log: Some(log.clone()),
        }));

        let result = use_case.execute(log.id).await.unwrap();

        assert_eq!(result.id, log.id);
        assert_eq!(result.status, TransactionStatus::COMPLETED);
    }

    #[tokio::test]
    async fn test_get_transaction_not_found() {
        let use_case =
            GetTransactionUseCase::new(Arc::new(StubTransactionLogRepository { log: None }));

        let id = TransactionId::new();
        let result = use_case.execute(id).await;

        assert_eq!(result.unwrap_err(), TransferError::TransactionNotFound(id));
    }
}
