use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::FmtSubscriber;
use transfer_service::{
    api::http_routes::{routes, AppState},
    config::{AppConfig, TransferSettings},
    infrastructure::{
        cache::redis_cache::RedisTransferCache,
        persistence::{
            interest_repository::PostgresInterestCalculationRepository,
            ledger_repository::PostgresLedgerRepository,
            transaction_log_repository::PostgresTransactionLogRepository,
            wallet_repository::PostgresWalletRepository,
        },
    },
    use_cases::{
        calculate_interest::CalculateDailyInterestUseCase, get_transaction::GetTransactionUseCase,
        get_wallet::GetWalletUseCase, transfer_funds::TransferFundsUseCase,
    },
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        transfer_service::api::http_routes::transfer_funds,
        transfer_service::api::http_routes::get_wallet_details,
        transfer_service::api::http_routes::get_transaction_details,
        transfer_service::api::http_routes::calculate_daily_interest
    ),
    components(schemas(
        transfer_service::api::http_routes::TransferFundsRequest,
        transfer_service::api::http_routes::DailyInterestRequest,
        transfer_service::api::response::ApiResponse<serde_json::Value>
    ))
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Cargar variables de entorno
    dotenv().ok();

    // 2. Configurar Logging/Tracing
    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting Transfer Service...");

    // 3. Cargar Configuración tipada
    let config = AppConfig::from_env()?;

    // 4. Configurar Conexión a Base de Datos
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .min_connections(config.db_min_connections)
        .acquire_timeout(Duration::from_secs(config.db_acquire_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.db_idle_timeout_seconds))
        .connect(&config.database_url)
        .await?;

    info!("Connected to Database");

    // 5. Configurar Cache compartido (lease distribuido + result cache)
    let cache = Arc::new(RedisTransferCache::new(
        &config.redis_url,
        config.cache_retry_attempts,
        config.cache_retry_backoff_ms,
    )?);

    // 6. Instanciar Dependencias (Infraestructura)
    let wallet_repo = Arc::new(PostgresWalletRepository::new(pool.clone()));
    let log_repo = Arc::new(PostgresTransactionLogRepository::new(pool.clone()));
    let ledger_repo = Arc::new(PostgresLedgerRepository::new(pool.clone()));
    let interest_repo = Arc::new(PostgresInterestCalculationRepository::new(pool.clone()));

    // 7. Instanciar Casos de Uso
    let transfer_funds_use_case = TransferFundsUseCase::new(
        pool.clone(),
        wallet_repo.clone(),
        log_repo.clone(),
        ledger_repo.clone(),
        cache.clone(),
        TransferSettings::from(&config),
    );
    let get_wallet_use_case = GetWalletUseCase::new(wallet_repo.clone());
    let get_transaction_use_case = GetTransactionUseCase::new(log_repo.clone());
    let calculate_interest_use_case =
        CalculateDailyInterestUseCase::new(wallet_repo.clone(), interest_repo.clone());

    // 8. Configurar Estado de la App Axum
    let app_state = Arc::new(AppState {
        transfer_funds_use_case,
        get_wallet_use_case,
        get_transaction_use_case,
        calculate_interest_use_case,
    });

    // 9. Configurar Rutas y Servidor
    let app = routes(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
