use async_trait::async_trait;

use crate::domain::error::TransferError;
use crate::domain::transfer::TransferReceipt;

/// Slot del result cache para una clave de idempotencia.
pub fn result_key(idempotency_key: &str) -> String {
    format!("idempotency:{}", idempotency_key)
}

/// Slot del lease de exclusión mutua para una clave de idempotencia.
pub fn lease_key(idempotency_key: &str) -> String {
    format!("lock:{}", idempotency_key)
}

/// Port del cache compartido: lease exclusivo por clave + result cache.
///
/// El backend es un key-value server externo con set-if-absent atómico y TTL.
/// El lease es advisory: expira solo tras `ttl_seconds` y acota el daño de un
/// proceso caído, no garantiza exclusión a un worker que se cuelga más allá
/// del TTL. La base de datos sigue siendo la autoridad.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferCache: Send + Sync {
    /// `SET key 1 NX EX ttl`. Retorna si este caller ahora posee el lease.
    async fn try_acquire(&self, key: &str, ttl_seconds: u64) -> Result<bool, TransferError>;

    /// DELETE incondicional del lease.
    async fn release(&self, key: &str) -> Result<(), TransferError>;

    /// Guarda el resultado serializado, reemplazando cualquier valor previo.
    async fn put_result(
        &self,
        key: &str,
        receipt: &TransferReceipt,
        ttl_seconds: u64,
    ) -> Result<(), TransferError>;

    /// Lee un resultado previo, si existe.
    async fn get_result(&self, key: &str) -> Result<Option<TransferReceipt>, TransferError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_slots_are_namespaced_by_key() {
        assert_eq!(result_key("t1"), "idempotency:t1");
        assert_eq!(lease_key("t1"), "lock:t1");
        assert_ne!(result_key("t1"), lease_key("t1"));
    }
}
