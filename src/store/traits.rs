use crate::model::HybridRecord;
use anyhow::Result;

/// Append-only persisted table of hybrid records.
#[async_trait::async_trait]
pub trait HybridStore: Send + Sync {
    /// Every stored record in insertion order (`SELECT * FROM hybrids`).
    async fn list_hybrids(&self) -> Result<Vec<HybridRecord>>;
    /// Append a record and return its generated id. Any id on `record` is ignored.
    async fn insert_hybrid(&self, record: &HybridRecord) -> Result<i64>;
    /// Number of stored records
    async fn count_hybrids(&self) -> Result<i64>;
}
