use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use std::time::Duration;

use crate::domain::cache::TransferCache;
use crate::domain::error::TransferError;
use crate::domain::transfer::TransferReceipt;

/// Cache compartido sobre Redis: lease distribuido + result cache.
///
/// El lease usa `SET key 1 NX EX ttl`, que es atómico en el servidor; el
/// result cache guarda el `TransferReceipt` como JSON con `SETEX`. La
/// conexión multiplexada se establece por operación con reintentos y backoff
/// exponencial acotado.
pub struct RedisTransferCache {
    client: redis::Client,
    retry_attempts: u32,
    retry_backoff: Duration,
}

impl RedisTransferCache {
    pub fn new(
        redis_url: &str,
        retry_attempts: u32,
        retry_backoff_ms: u64,
    ) -> Result<Self, TransferError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| TransferError::CacheError(format!("invalid redis url: {}", e)))?;

        Ok(Self {
            client,
            retry_attempts: retry_attempts.max(1),
            retry_backoff: Duration::from_millis(retry_backoff_ms),
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, TransferError> {
        let mut backoff = self.retry_backoff;
        let mut last_error = None;

        for attempt in 0..self.retry_attempts {
            match self.client.get_multiplexed_async_connection().await {
                Ok(conn) => return Ok(conn),
                Err(e) => {
                    if attempt + 1 < self.retry_attempts {
                        tracing::warn!(
                            "Redis connection attempt {} failed: {}. Retrying in {:?}",
                            attempt + 1,
                            e,
                            backoff
                        );
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(TransferError::CacheError(
            last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "redis connection failed".to_string()),
        ))
    }
}

#[async_trait]
impl TransferCache for RedisTransferCache {
    async fn try_acquire(&self, key: &str, ttl_seconds: u64) -> Result<bool, TransferError> {
        let mut conn = self.connection().await?;

        // SET devuelve OK si escribió y Nil si la clave ya existía (NX).
        let reply: Option<String> = redis::cmd("SET")
            .arg(key)
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(|e| TransferError::CacheError(e.to_string()))?;

        Ok(reply.is_some())
    }

    async fn release(&self, key: &str) -> Result<(), TransferError> {
        let mut conn = self.connection().await?;

        let _deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| TransferError::CacheError(e.to_string()))?;

        Ok(())
    }

    async fn put_result(
        &self,
        key: &str,
        receipt: &TransferReceipt,
        ttl_seconds: u64,
    ) -> Result<(), TransferError> {
        let payload = serde_json::to_string(receipt)
            .map_err(|e| TransferError::CacheError(format!("serialize receipt: {}", e)))?;

        let mut conn = self.connection().await?;

        let _: () = conn
            .set_ex(key, payload, ttl_seconds)
            .await
            .map_err(|e| TransferError::CacheError(e.to_string()))?;

        Ok(())
    }

    async fn get_result(&self, key: &str) -> Result<Option<TransferReceipt>, TransferError> {
        let mut conn = self.connection().await?;

        let raw: Option<String> = conn
            .get(key)
            .await
            .map_err(|e| TransferError::CacheError(e.to_string()))?;

        raw.map(|json| {
            serde_json::from_str(&json)
                .map_err(|e| TransferError::CacheError(format!("deserialize receipt: {}", e)))
        })
        .transpose()
    }
}
