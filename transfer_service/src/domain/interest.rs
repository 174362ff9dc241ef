use chrono::{DateTime, NaiveDate, Utc};
use common::money::{Money, INTERNAL_SCALE};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::TransferError;
use crate::domain::types::WalletId;

/// Base de días para el devengo diario de intereses.
pub const DAYS_IN_YEAR: i64 = 365;

/// Registro auditable de un cálculo de interés.
///
/// Una fila por cálculo; nunca se muta ni se borra. El interés no se acredita
/// aquí: acreditarlo es una transferencia desde una billetera POOL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestCalculation {
    pub id: Uuid,
    pub wallet_id: WalletId,
    pub principal: Money,
    pub annual_rate: Decimal,
    pub interest_amount: Money,
    pub calculation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl InterestCalculation {
    pub fn new(
        wallet_id: WalletId,
        principal: Money,
        annual_rate: Decimal,
        interest_amount: Money,
        calculation_date: NaiveDate,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            principal,
            annual_rate,
            interest_amount,
            calculation_date,
            created_at: Utc::now(),
        }
    }
}

/// Interés de un día: `principal × tasa_anual ÷ 365`.
///
/// El cálculo intermedio trabaja a escala 10 y el resultado se normaliza a
/// escala 2 con redondeo bancario, de modo que corridas repetidas sobre el
/// mismo principal no acumulan sesgo.
///
/// # Examples
/// ```
/// use common::money::Money;
/// use rust_decimal_macros::dec;
/// use transfer_service::domain::interest::daily_interest;
///
/// let principal: Money = "10000.00".parse().unwrap();
/// let interest = daily_interest(principal, dec!(0.0365)).unwrap();
/// assert_eq!(interest.to_string(), "1.00");
/// ```
pub fn daily_interest(principal: Money, annual_rate: Decimal) -> Result<Money, TransferError> {
    let annual = principal
        .as_decimal()
        .checked_mul(annual_rate)
        .ok_or_else(|| {
            TransferError::InvalidRequest("interest computation out of range".to_string())
        })?;

    let daily = annual
        .checked_div(Decimal::from(DAYS_IN_YEAR))
        .ok_or_else(|| {
            TransferError::InvalidRequest("interest computation out of range".to_string())
        })?
        .round_dp_with_strategy(INTERNAL_SCALE, RoundingStrategy::MidpointNearestEven);

    Ok(Money::from_decimal(daily))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case("10000.00", dec!(0.0365), "1.00")]
    #[case("0.00", dec!(0.10), "0.00")]
    #[case("100.00", dec!(0), "0.00")]
    #[case("365.00", dec!(1), "1.00")]
    #[case("1000000.00", dec!(0.045), "123.29")]
    fn test_daily_interest_values(
        #[case] principal: &str,
        #[case] rate: Decimal,
        #[case] expected: &str,
    ) {
        let principal: Money = principal.parse().unwrap();
        let interest = daily_interest(principal, rate).unwrap();
        assert_eq!(interest.to_string(), expected);
    }

    #[test]
    fn test_daily_interest_rounds_half_to_even() {
        // 100.01 × 0.0365 ÷ 365 = 0.010001 → escala 2 bancaria → 0.01
        let principal: Money = "100.01".parse().unwrap();
        let interest = daily_interest(principal, dec!(0.0365)).unwrap();
        assert_eq!(interest.to_string(), "0.01");

        // 50.00 × 0.0365 ÷ 365 = 0.005 → empate → 0.00 (par)
        let principal: Money = "50.00".parse().unwrap();
        let interest = daily_interest(principal, dec!(0.0365)).unwrap();
        assert_eq!(interest.to_string(), "0.00");
    }
}
