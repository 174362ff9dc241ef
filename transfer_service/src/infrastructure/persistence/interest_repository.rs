use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::error::TransferError;
use crate::domain::interest::InterestCalculation;
use crate::domain::repository::InterestCalculationRepository;
use crate::infrastructure::persistence::models::InterestCalculationModel;

/// Repositorio de cálculos de interés basado en PostgreSQL (append-only).
pub struct PostgresInterestCalculationRepository {
    pool: PgPool,
}

impl PostgresInterestCalculationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterestCalculationRepository for PostgresInterestCalculationRepository {
    async fn insert(
        &self,
        calculation: InterestCalculation,
    ) -> Result<InterestCalculation, TransferError> {
        let model = InterestCalculationModel::from(calculation);

        let saved_model = sqlx::query_as::<_, InterestCalculationModel>(
            r#"
            INSERT INTO interest_calculations (
                id, wallet_id, principal, annual_rate, interest_amount,
                calculation_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(model.id)
        .bind(model.wallet_id)
        .bind(model.principal)
        .bind(model.annual_rate)
        .bind(model.interest_amount)
        .bind(model.calculation_date)
        .bind(model.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TransferError::RepositoryError(e.to_string()))?;

        Ok(saved_model.into())
    }
}
