use chrono::{DateTime, NaiveDate, Utc};
use common::money::Money;
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use crate::domain::entities::{
    LedgerEntry, LedgerEntryType, TransactionLog, TransactionStatus, TransactionType, Wallet,
    WalletStatus, WalletType,
};
use crate::domain::interest::InterestCalculation;
use crate::domain::types::{TransactionId, WalletId};

// Modelo de Base de Datos para Wallet (especifico de SQLx)
// Representa la tabla 'wallets' en PostgreSQL. Los montos viven como NUMERIC
// y se normalizan a Money al reconstruir la entidad.
#[derive(Debug, FromRow)]
pub struct WalletModel {
    pub id: WalletId,
    pub owner_id: String,
    pub wallet_type: WalletType,
    pub balance: Decimal,
    pub currency: String,
    pub status: WalletStatus,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Conversión Modelo -> Dominio
impl From<WalletModel> for Wallet {
    fn from(m: WalletModel) -> Self {
        Self {
            id: m.id,
            owner_id: m.owner_id,
            wallet_type: m.wallet_type,
            balance: Money::from_decimal(m.balance),
            currency: m.currency,
            status: m.status,
            version: m.version,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// Modelo de Base de Datos para TransactionLog.
// Representa la tabla 'transaction_logs'.
#[derive(Debug, FromRow)]
pub struct TransactionLogModel {
    pub id: TransactionId,
    pub idempotency_key: String,
    pub transaction_type: TransactionType,
    pub from_wallet_id: WalletId,
    pub to_wallet_id: WalletId,
    pub amount: Decimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub description: Option<String>,
    pub error_message: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Conversión Dominio -> Modelo (Move Semantics: consume la entidad para no
// clonar strings ni metadata)
impl From<TransactionLog> for TransactionLogModel {
    fn from(t: TransactionLog) -> Self {
        Self {
            id: t.id,
            idempotency_key: t.idempotency_key,
            transaction_type: t.transaction_type,
            from_wallet_id: t.from_wallet_id,
            to_wallet_id: t.to_wallet_id,
            amount: t.amount.as_decimal(),
            currency: t.currency,
            status: t.status,
            description: t.description,
            error_message: t.error_message,
            metadata: t.metadata,
            completed_at: t.completed_at,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

// Conversión Modelo -> Dominio
impl From<TransactionLogModel> for TransactionLog {
    fn from(m: TransactionLogModel) -> Self {
        Self {
            id: m.id,
            idempotency_key: m.idempotency_key,
            transaction_type: m.transaction_type,
            from_wallet_id: m.from_wallet_id,
            to_wallet_id: m.to_wallet_id,
            amount: Money::from_decimal(m.amount),
            currency: m.currency,
            status: m.status,
            description: m.description,
            error_message: m.error_message,
            metadata: m.metadata,
            completed_at: m.completed_at,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// Modelo de Base de Datos para LedgerEntry.
// Representa la tabla 'ledger_entries' (append-only).
#[derive(Debug, FromRow)]
pub struct LedgerEntryModel {
    pub id: Uuid,
    pub transaction_id: TransactionId,
    pub wallet_id: WalletId,
    pub entry_type: LedgerEntryType,
    pub amount: Decimal,
    pub currency: String,
    pub balance_after: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LedgerEntry> for LedgerEntryModel {
    fn from(e: LedgerEntry) -> Self {
        Self {
            id: e.id,
            transaction_id: e.transaction_id,
            wallet_id: e.wallet_id,
            entry_type: e.entry_type,
            amount: e.amount.as_decimal(),
            currency: e.currency,
            balance_after: e.balance_after.as_decimal(),
            description: e.description,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<LedgerEntryModel> for LedgerEntry {
    fn from(m: LedgerEntryModel) -> Self {
        Self {
            id: m.id,
            transaction_id: m.transaction_id,
            wallet_id: m.wallet_id,
            entry_type: m.entry_type,
            amount: Money::from_decimal(m.amount),
            currency: m.currency,
            balance_after: Money::from_decimal(m.balance_after),
            description: m.description,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

// Modelo de Base de Datos para InterestCalculation.
#[derive(Debug, FromRow)]
pub struct InterestCalculationModel {
    pub id: Uuid,
    pub wallet_id: WalletId,
    pub principal: Decimal,
    pub annual_rate: Decimal,
    pub interest_amount: Decimal,
    pub calculation_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl From<InterestCalculation> for InterestCalculationModel {
    fn from(c: InterestCalculation) -> Self {
        Self {
            id: c.id,
            wallet_id: c.wallet_id,
            principal: c.principal.as_decimal(),
            annual_rate: c.annual_rate,
            interest_amount: c.interest_amount.as_decimal(),
            calculation_date: c.calculation_date,
            created_at: c.created_at,
        }
    }
}

impl From<InterestCalculationModel> for InterestCalculation {
    fn from(m: InterestCalculationModel) -> Self {
        Self {
            id: m.id,
            wallet_id: m.wallet_id,
            principal: Money::from_decimal(m.principal),
            annual_rate: m.annual_rate,
            interest_amount: Money::from_decimal(m.interest_amount),
            calculation_date: m.calculation_date,
            created_at: m.created_at,
        }
    }
}
