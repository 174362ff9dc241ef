use chrono::{DateTime, Utc};
use common::money::Money;
use serde::{Deserialize, Serialize};

use crate::domain::entities::TransactionStatus;
use crate::domain::error::TransferError;
use crate::domain::types::{TransactionId, WalletId};

/// Moneda asumida cuando la petición no trae una explícita.
pub const DEFAULT_CURRENCY: &str = "NGN";

/// Longitud máxima de la clave de idempotencia.
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = 255;

/// Petición de transferencia tal como llega del borde (montos como texto).
///
/// La validación completa ocurre en [`TransferRequest::validate`], antes de
/// tocar base de datos o cache. Una petición que no valida no deja rastro.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferRequest {
    pub idempotency_key: String,
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub amount: String,
    pub currency: Option<String>,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

/// Petición ya validada: monto parseado y moneda resuelta.
#[derive(Debug, Clone)]
pub struct ValidatedTransfer {
    pub idempotency_key: String,
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub amount: Money,
    pub currency: String,
    pub description: Option<String>,
    pub metadata: Option<serde_json::Value>,
}

impl TransferRequest {
    /// Validación fail-fast de la petición (sin I/O).
    ///
    /// Reglas: clave de idempotencia no vacía, de hasta 255 caracteres
    /// `[A-Za-z0-9_-]`; billeteras distintas; monto canónico positivo y no
    /// mayor que `max_amount`; moneda de tres letras mayúsculas (default NGN).
    pub fn validate(self, max_amount: Money) -> Result<ValidatedTransfer, TransferError> {
        let key = self.idempotency_key;
        if key.is_empty() || key.len() > MAX_IDEMPOTENCY_KEY_LEN {
            return Err(TransferError::InvalidRequest(format!(
                "idempotency_key must be between 1 and {} characters",
                MAX_IDEMPOTENCY_KEY_LEN
            )));
        }
        if !key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-')
        {
            return Err(TransferError::InvalidRequest(
                "idempotency_key may only contain letters, digits, '_' and '-'".to_string(),
            ));
        }

        if self.from_wallet_id == self.to_wallet_id {
            return Err(TransferError::InvalidRequest(
                "source and destination wallet must differ".to_string(),
            ));
        }

        let amount: Money = self
            .amount
            .parse()
            .map_err(|e| TransferError::InvalidRequest(format!("amount: {}", e)))?;
        if !amount.is_positive() {
            return Err(TransferError::InvalidRequest(
                "amount must be greater than zero".to_string(),
            ));
        }
        if amount > max_amount {
            return Err(TransferError::InvalidRequest(format!(
                "amount exceeds the maximum transferable value of {}",
                max_amount
            )));
        }

        let currency = match self.currency {
            Some(c) => {
                if c.len() != 3 || !c.bytes().all(|b| b.is_ascii_uppercase()) {
                    return Err(TransferError::InvalidRequest(
                        "currency must be a three-letter uppercase code".to_string(),
                    ));
                }
                c
            }
            None => DEFAULT_CURRENCY.to_string(),
        };

        Ok(ValidatedTransfer {
            idempotency_key: key,
            from_wallet_id: self.from_wallet_id,
            to_wallet_id: self.to_wallet_id,
            amount,
            currency,
            description: self.description,
            metadata: self.metadata,
        })
    }
}

/// Orden de adquisición de row locks: siempre ascendente por `id`.
///
/// Dos transferencias cruzadas `A→B` y `B→A` bloquean las mismas filas; si
/// cada una las tomara en su propio orden origen→destino se produciría una
/// inversión de orden de locks. Con orden total por `id` no hay espera circular.
pub fn lock_order(a: WalletId, b: WalletId) -> (WalletId, WalletId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Saldo resultante de una billetera después de la transferencia.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalanceSnapshot {
    pub id: WalletId,
    pub new_balance: Money,
}

/// Resultado externo de una transferencia completada.
///
/// Es la forma que viaja al cliente y la que se serializa al result cache; un
/// replay con la misma clave devuelve exactamente este valor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferReceipt {
    pub success: bool,
    pub transaction_id: TransactionId,
    pub status: TransactionStatus,
    pub from: WalletBalanceSnapshot,
    pub to: WalletBalanceSnapshot,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    fn request(key: &str, amount: &str) -> TransferRequest {
        TransferRequest {
            idempotency_key: key.to_string(),
            from_wallet_id: WalletId::new(),
            to_wallet_id: WalletId::new(),
            amount: amount.to_string(),
            currency: None,
            description: None,
            metadata: None,
        }
    }

    fn max_amount() -> Money {
        "1000000000".parse().unwrap()
    }

    #[test]
    fn test_validate_accepts_well_formed_request() {
        let validated = request("t1", "100.00").validate(max_amount()).unwrap();

        assert_eq!(validated.amount.to_string(), "100.00");
        assert_eq!(validated.currency, DEFAULT_CURRENCY);
    }

    #[test]
    fn test_validate_rejects_same_wallet() {
        let mut req = request("t1", "1.00");
        req.to_wallet_id = req.from_wallet_id;

        let result = req.validate(max_amount());
        assert!(matches!(result, Err(TransferError::InvalidRequest(_))));
    }

    #[rstest]
    #[case("")]
    #[case("clave con espacios")]
    #[case("llave:con:puntos")]
    fn test_validate_rejects_bad_keys(#[case] key: &str) {
        let result = request(key, "1.00").validate(max_amount());
        assert!(matches!(result, Err(TransferError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_rejects_key_over_max_length() {
        let key = "k".repeat(MAX_IDEMPOTENCY_KEY_LEN + 1);
        let result = request(&key, "1.00").validate(max_amount());
        assert!(matches!(result, Err(TransferError::InvalidRequest(_))));
    }

    #[rstest]
    #[case("0.00")]
    #[case("-1.00")]
    #[case("1.999")]
    #[case("abc")]
    #[case("1000000000.01")]
    fn test_validate_rejects_bad_amounts(#[case] amount: &str) {
        let result = request("t1", amount).validate(max_amount());
        assert!(matches!(result, Err(TransferError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_accepts_amount_at_the_cap() {
        let validated = request("t1", "1000000000").validate(max_amount()).unwrap();
        assert_eq!(validated.amount.to_string(), "1000000000.00");
    }

    #[rstest]
    #[case(Some("ngn"))]
    #[case(Some("NG"))]
    #[case(Some("NAIRA"))]
    fn test_validate_rejects_bad_currency(#[case] currency: Option<&str>) {
        let mut req = request("t1", "1.00");
        req.currency = currency.map(str::to_string);

        let result = req.validate(max_amount());
        assert!(matches!(result, Err(TransferError::InvalidRequest(_))));
    }

    #[test]
    fn test_validate_keeps_explicit_currency() {
        let mut req = request("t1", "1.00");
        req.currency = Some("USD".to_string());

        let validated = req.validate(max_amount()).unwrap();
        assert_eq!(validated.currency, "USD");
    }

    #[test]
    fn test_lock_order_is_total_and_symmetric() {
        let low = WalletId(Uuid::from_u128(1));
        let high = WalletId(Uuid::from_u128(2));

        assert_eq!(lock_order(low, high), (low, high));
        assert_eq!(lock_order(high, low), (low, high));
        assert_eq!(lock_order(low, low), (low, low));
    }

    #[test]
    fn test_receipt_serializes_with_wire_field_names() {
        let receipt = TransferReceipt {
            success: true,
            transaction_id: TransactionId::new(),
            status: TransactionStatus::COMPLETED,
            from: WalletBalanceSnapshot {
                id: WalletId::new(),
                new_balance: "900.00".parse().unwrap(),
            },
            to: WalletBalanceSnapshot {
                id: WalletId::new(),
                new_balance: "600.00".parse().unwrap(),
            },
            timestamp: chrono::Utc::now(),
        };

        let json = serde_json::to_value(&receipt).unwrap();
        assert_eq!(json["status"], "COMPLETED");
        assert_eq!(json["from"]["newBalance"], "900.00");
        assert_eq!(json["to"]["newBalance"], "600.00");

        let back: TransferReceipt = serde_json::from_value(json).unwrap();
        assert_eq!(back, receipt);
    }
}
