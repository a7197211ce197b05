use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// A host-provided key-value store holding JSON-equivalent values.
///
/// This is the only persistent state weeklink touches. Implementations can
/// be in-memory, file-backed, Redis-backed, or a bridge to a browser's
/// extension storage area.
#[async_trait]
pub trait KeyValueStore: Send + Sync + 'static {
    /// Gets the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key has never been written.
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Stores `value` under `key`, replacing whatever was there.
    async fn set(&self, key: &str, value: Value) -> Result<()>;
}
