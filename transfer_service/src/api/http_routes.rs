use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::response::ApiResponse;
use crate::domain::error::TransferError;
use crate::domain::transfer::TransferRequest;
use crate::domain::types::{TransactionId, WalletId};
use crate::use_cases::calculate_interest::CalculateDailyInterestUseCase;
use crate::use_cases::get_transaction::GetTransactionUseCase;
use crate::use_cases::get_wallet::GetWalletUseCase;
use crate::use_cases::transfer_funds::TransferFundsUseCase;

// Estado compartido de la aplicación
pub struct AppState {
    pub transfer_funds_use_case: TransferFundsUseCase,
    pub get_wallet_use_case: GetWalletUseCase,
    pub get_transaction_use_case: GetTransactionUseCase,
    pub calculate_interest_use_case: CalculateDailyInterestUseCase,
}

pub fn routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/wallet/transfer", post(transfer_funds))
        .route("/wallets/{id}", get(get_wallet_details))
        .route("/wallets/{id}/interest/daily", post(calculate_daily_interest))
        .route("/transactions/{id}", get(get_transaction_details))
        .with_state(state) // Inyectamos el estado (Casos de Uso)
}

// DTO de entrada para la transferencia. El monto viaja como string canónico
// ("100.00") para no perder precisión en clientes que manejan floats.
#[derive(Deserialize, ToSchema)]
pub struct TransferFundsRequest {
    pub idempotency_key: String,
    pub from_wallet_id: Uuid,
    pub to_wallet_id: Uuid,
    pub amount: String,
    pub currency: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub metadata: Option<serde_json::Value>,
}

// DTO de entrada para el cálculo de interés diario.
#[derive(Deserialize, ToSchema)]
pub struct DailyInterestRequest {
    /// Tasa anual como fracción decimal, p. ej. "0.045".
    pub annual_rate: String,
}

// Handler: Transferencia idempotente entre billeteras
// POST /wallet/transfer
#[utoipa::path(
    post,
    path = "/wallet/transfer",
    request_body = TransferFundsRequest,
    responses(
        (status = 200, description = "Transfer completed (or replayed)", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid request, inactive wallet or insufficient funds"),
        (status = 404, description = "Source or destination wallet not found"),
        (status = 409, description = "Concurrent transfer in progress or version conflict"),
    )
)]
pub async fn transfer_funds(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TransferFundsRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let request = TransferRequest {
        idempotency_key: payload.idempotency_key,
        from_wallet_id: WalletId(payload.from_wallet_id),
        to_wallet_id: WalletId(payload.to_wallet_id),
        amount: payload.amount,
        currency: payload.currency,
        description: payload.description,
        metadata: payload.metadata,
    };

    let receipt = state.transfer_funds_use_case.execute(request).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": receipt
    })))
}

// Handler: Ver saldo y detalles de una billetera especifica
// GET /wallets/{id}
#[utoipa::path(
    get,
    path = "/wallets/{id}",
    params(("id" = Uuid, Path, description = "Wallet ID")),
    responses(
        (status = 200, description = "Wallet details", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Wallet not found"),
    )
)]
pub async fn get_wallet_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let wallet = state.get_wallet_use_case.execute(WalletId(id)).await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": wallet
    })))
}

// Handler: Ver detalle de una transaccion registrada
// GET /transactions/{id}
#[utoipa::path(
    get,
    path = "/transactions/{id}",
    params(("id" = Uuid, Path, description = "Transaction ID")),
    responses(
        (status = 200, description = "Transaction log row", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Transaction not found"),
    )
)]
pub async fn get_transaction_details(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let log = state
        .get_transaction_use_case
        .execute(TransactionId(id))
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": log
    })))
}

// Handler: Calcular (y auditar) el interés diario de una billetera
// POST /wallets/{id}/interest/daily
#[utoipa::path(
    post,
    path = "/wallets/{id}/interest/daily",
    params(("id" = Uuid, Path, description = "Wallet ID")),
    request_body = DailyInterestRequest,
    responses(
        (status = 200, description = "Interest calculation recorded", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Invalid rate or inactive wallet"),
        (status = 404, description = "Wallet not found"),
    )
)]
pub async fn calculate_daily_interest(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DailyInterestRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let annual_rate = rust_decimal::Decimal::from_str(&payload.annual_rate).map_err(|_| {
        TransferError::InvalidRequest(format!(
            "annual_rate '{}' is not a decimal fraction",
            payload.annual_rate
        ))
    })?;

    let calculation = state
        .calculate_interest_use_case
        .execute(WalletId(id), annual_rate)
        .await?;

    Ok(Json(serde_json::json!({
        "status": "success",
        "data": calculation
    })))
}
