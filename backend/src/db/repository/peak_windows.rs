//! Peak window repository trait.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::models::PeakWindowEntry;

/// Durable store for the peak window registry.
///
/// Records are kept in wire form (`HH:MM-HH:MM` strings); parsing is the
/// registry's job so a store never has to understand interval semantics.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to be shared behind an `Arc`.
#[async_trait]
pub trait PeakWindowRepository: Send + Sync {
    /// Load every persisted record.
    ///
    /// A store that has never been written returns an empty list.
    async fn load_all(&self) -> RepositoryResult<Vec<PeakWindowEntry>>;

    /// Replace the entire stored content with `records`.
    ///
    /// Implementations must not leave a partially written state visible to
    /// a later `load_all`.
    async fn replace_all(&self, records: &[PeakWindowEntry]) -> RepositoryResult<()>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;
}
