//! Service functions over any [`PeakWindowRepository`].
//!
//! These wrap raw repository calls with logging and operation context so
//! callers get uniform errors regardless of backend.

use super::repository::{PeakWindowRepository, RepositoryResult};
use crate::models::PeakWindowEntry;

/// Check that the store is reachable.
pub async fn health_check<R: PeakWindowRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check()
        .await
        .map_err(|e| e.with_operation("health_check"))
}

/// Load all persisted peak window records.
pub async fn load_peak_windows<R: PeakWindowRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<Vec<PeakWindowEntry>> {
    let records = repo
        .load_all()
        .await
        .map_err(|e| e.with_operation("load_peak_windows"))?;
    log::info!(
        "Loaded {} peak window records from {} store",
        records.len(),
        repo.backend_name()
    );
    Ok(records)
}

/// Replace all persisted peak window records.
pub async fn replace_peak_windows<R: PeakWindowRepository + ?Sized>(
    repo: &R,
    records: &[PeakWindowEntry],
) -> RepositoryResult<()> {
    repo.replace_all(records)
        .await
        .map_err(|e| e.with_operation("replace_peak_windows"))?;
    log::info!(
        "Persisted {} peak window records to {} store",
        records.len(),
        repo.backend_name()
    );
    Ok(())
}
