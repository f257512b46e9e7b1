//! Entity source traits

use async_trait::async_trait;
use serde_json::Value;

/// Something that can produce a JSON document of entities
#[async_trait]
pub trait EntitySource: Send + Sync {
    /// Human-readable origin, used in progress and log output
    fn describe(&self) -> String;

    /// Load the raw document
    async fn load(&self) -> anyhow::Result<Value>;
}
