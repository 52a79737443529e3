//! In-memory local repository implementation.
//!
//! Suitable for unit testing and local development: nothing survives a
//! restart, and health can be toggled to simulate an unreachable store.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::PeakWindowEntry;

/// In-memory local repository.
///
/// # Example
/// ```ignore
/// let repo = LocalRepository::new();
/// repo.replace_all(&[PeakWindowEntry::new(1, ["08:00-09:00"])]).await?;
/// assert_eq!(repo.load_all().await?.len(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    records: Vec<PeakWindowEntry>,
    writes: usize,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            writes: 0,
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with `records`, as if restored from
    /// an earlier run.
    pub fn with_records(records: Vec<PeakWindowEntry>) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                records,
                ..Default::default()
            })),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.records.clear();
        data.writes = 0;
    }

    /// Number of successful `replace_all` calls.
    pub fn write_count(&self) -> usize {
        self.data.read().writes
    }

    fn ensure_healthy(&self, operation: &str) -> RepositoryResult<()> {
        if self.data.read().is_healthy {
            Ok(())
        } else {
            Err(RepositoryError::connection_with_context(
                "Local repository marked unhealthy",
                ErrorContext::new(operation).with_resource("local"),
            ))
        }
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PeakWindowRepository for LocalRepository {
    async fn load_all(&self) -> RepositoryResult<Vec<PeakWindowEntry>> {
        self.ensure_healthy("load_all")?;
        Ok(self.data.read().records.clone())
    }

    async fn replace_all(&self, records: &[PeakWindowEntry]) -> RepositoryResult<()> {
        self.ensure_healthy("replace_all")?;
        let mut data = self.data.write();
        data.records = records.to_vec();
        data.writes += 1;
        Ok(())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    fn backend_name(&self) -> &'static str {
        "local"
    }
}
