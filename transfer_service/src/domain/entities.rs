use chrono::{DateTime, Utc};
use common::money::Money;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::TransferError;
use crate::domain::types::{TransactionId, WalletId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "wallet_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletType {
    POOL,
    USER,
    MERCHANT,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "wallet_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WalletStatus {
    ACTIVE,
    SUSPENDED,
    CLOSED,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    PENDING,
    PROCESSING,
    COMPLETED,
    FAILED,
    #[allow(non_camel_case_types)]
    ROLLED_BACK,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    TRANSFER,
    DEPOSIT,
    WITHDRAWAL,
    REFUND,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "ledger_entry_type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEntryType {
    DEBIT,
    CREDIT,
}

/// Modelo de Entidad: Wallet.
///
/// Cuenta portadora de valor. El balance y la versión solo los muta el
/// coordinador de transferencias bajo row lock; la versión crece en cada
/// actualización (optimistic locking).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wallet {
    pub id: WalletId,
    pub owner_id: String,
    pub wallet_type: WalletType,
    pub balance: Money,
    pub currency: String,
    pub status: WalletStatus,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Solo las billeteras ACTIVE pueden ser origen o destino de una transferencia.
    pub fn is_active(&self) -> bool {
        self.status == WalletStatus::ACTIVE
    }
}

/// Modelo de Entidad: TransactionLog.
///
/// Registro durable de un intento lógico de transferencia, identificado por su
/// `idempotency_key` (UNIQUE en base de datos). Nunca se borra.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLog {
    pub id: TransactionId,
    pub idempotency_key: String,
    pub transaction_type: TransactionType,
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub amount: Money,
    pub currency: String,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub error_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Modelo de Entidad: LedgerEntry.
///
/// Una mitad del par de doble partida. Append-only: se inserta dentro de la
/// transacción serializable y nunca se muta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: Uuid,
    pub transaction_id: TransactionId,
    pub wallet_id: WalletId,
    pub entry_type: LedgerEntryType,
    pub amount: Money,
    pub currency: String,
    pub balance_after: Money,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Construye el lado DEBIT del par (sale valor de `wallet_id`).
    pub fn debit(
        transaction_id: TransactionId,
        wallet_id: WalletId,
        amount: Money,
        currency: &str,
        balance_after: Money,
        description: Option<String>,
    ) -> Self {
        Self::build(
            transaction_id,
            wallet_id,
            LedgerEntryType::DEBIT,
            amount,
            currency,
            balance_after,
            description,
        )
    }

    /// Construye el lado CREDIT del par (entra valor a `wallet_id`).
    pub fn credit(
        transaction_id: TransactionId,
        wallet_id: WalletId,
        amount: Money,
        currency: &str,
        balance_after: Money,
        description: Option<String>,
    ) -> Self {
        Self::build(
            transaction_id,
            wallet_id,
            LedgerEntryType::CREDIT,
            amount,
            currency,
            balance_after,
            description,
        )
    }

    fn build(
        transaction_id: TransactionId,
        wallet_id: WalletId,
        entry_type: LedgerEntryType,
        amount: Money,
        currency: &str,
        balance_after: Money,
        description: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            transaction_id,
            wallet_id,
            entry_type,
            amount,
            currency: currency.to_string(),
            balance_after,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Verifica que dos asientos forman un par balanceado de doble partida.
    ///
    /// Guarda contra errores de programación: mismo `transaction_id`, misma
    /// moneda, mismo monto positivo, lados opuestos y billeteras distintas.
    /// El store de ledger la ejecuta antes de emitir los INSERT.
    pub fn verify_pair(debit: &LedgerEntry, credit: &LedgerEntry) -> Result<(), TransferError> {
        if debit.entry_type != LedgerEntryType::DEBIT || credit.entry_type != LedgerEntryType::CREDIT
        {
            return Err(TransferError::UnbalancedEntries(
                "pair must be one DEBIT and one CREDIT".to_string(),
            ));
        }
        if debit.transaction_id != credit.transaction_id {
            return Err(TransferError::UnbalancedEntries(
                "entries belong to different transactions".to_string(),
            ));
        }
        if debit.wallet_id == credit.wallet_id {
            return Err(TransferError::UnbalancedEntries(
                "debit and credit target the same wallet".to_string(),
            ));
        }
        if debit.amount != credit.amount {
            return Err(TransferError::UnbalancedEntries(format!(
                "debit {} does not match credit {}",
                debit.amount, credit.amount
            )));
        }
        if !debit.amount.is_positive() {
            return Err(TransferError::UnbalancedEntries(
                "entry amount must be positive".to_string(),
            ));
        }
        if debit.currency != credit.currency {
            return Err(TransferError::UnbalancedEntries(format!(
                "currency {} does not match {}",
                debit.currency, credit.currency
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(amount: &str) -> (LedgerEntry, LedgerEntry) {
        let txn = TransactionId::new();
        let amount: Money = amount.parse().unwrap();
        let debit = LedgerEntry::debit(
            txn,
            WalletId::new(),
            amount,
            "NGN",
            "900.00".parse().unwrap(),
            None,
        );
        let credit = LedgerEntry::credit(
            txn,
            WalletId::new(),
            amount,
            "NGN",
            "600.00".parse().unwrap(),
            None,
        );
        (debit, credit)
    }

    #[test]
    fn test_verify_pair_accepts_balanced_entries() {
        let (debit, credit) = pair("100.00");
        assert!(LedgerEntry::verify_pair(&debit, &credit).is_ok());
    }

    #[test]
    fn test_verify_pair_rejects_amount_mismatch() {
        let (debit, mut credit) = pair("100.00");
        credit.amount = "99.99".parse().unwrap();

        let result = LedgerEntry::verify_pair(&debit, &credit);
        assert!(matches!(result, Err(TransferError::UnbalancedEntries(_))));
    }

    #[test]
    fn test_verify_pair_rejects_same_side_entries() {
        let (debit, mut credit) = pair("100.00");
        credit.entry_type = LedgerEntryType::DEBIT;

        let result = LedgerEntry::verify_pair(&debit, &credit);
        assert!(matches!(result, Err(TransferError::UnbalancedEntries(_))));
    }

    #[test]
    fn test_verify_pair_rejects_currency_mismatch() {
        let (debit, mut credit) = pair("100.00");
        credit.currency = "USD".to_string();

        let result = LedgerEntry::verify_pair(&debit, &credit);
        assert!(matches!(result, Err(TransferError::UnbalancedEntries(_))));
    }

    #[test]
    fn test_verify_pair_rejects_cross_transaction_entries() {
        let (debit, mut credit) = pair("100.00");
        credit.transaction_id = TransactionId::new();

        let result = LedgerEntry::verify_pair(&debit, &credit);
        assert!(matches!(result, Err(TransferError::UnbalancedEntries(_))));
    }
}
