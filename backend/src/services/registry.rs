//! Peak window registry.
//!
//! Holds, per signal, the time-of-day windows during which that signal is
//! considered congested. The working copy lives in memory as an immutable
//! [`PeakWindowSnapshot`]; registration builds a complete replacement
//! snapshot, persists it, and only then swaps it in. Readers therefore see
//! either the old mapping or the new one, never a mixture.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::repository::{PeakWindowRepository, RepositoryError};
use crate::db::services as db_services;
use crate::models::{PeakInterval, PeakWindowEntry, SignalId, TimeOfDay, TimeParseError};

/// Errors raised by registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A peak-hours string is not `HH:MM-HH:MM`. The batch containing it was
    /// rejected as a whole.
    #[error("Malformed peak interval '{raw}' for signal {signal_id}: {reason}")]
    MalformedInterval {
        signal_id: SignalId,
        raw: String,
        reason: TimeParseError,
    },

    /// The backing store failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Start-up behaviour of [`PeakWindowRegistry::load`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegistryOptions {
    /// Start with an empty registry when the store cannot be read, instead of
    /// failing.
    pub empty_on_load_failure: bool,
}

/// Immutable signal id -> peak intervals mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeakWindowSnapshot {
    windows: HashMap<SignalId, Vec<PeakInterval>>,
}

impl PeakWindowSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a full batch of entries.
    ///
    /// Fails on the first malformed string without producing a snapshot.
    /// Entries repeating a signal id have their intervals appended in order.
    pub fn from_entries(entries: &[PeakWindowEntry]) -> Result<Self, RegistryError> {
        let mut windows: HashMap<SignalId, Vec<PeakInterval>> = HashMap::new();
        for entry in entries {
            let intervals = windows.entry(entry.signal_id).or_default();
            for raw in &entry.peak_hours {
                let interval: PeakInterval =
                    raw.parse()
                        .map_err(|reason| RegistryError::MalformedInterval {
                            signal_id: entry.signal_id,
                            raw: raw.clone(),
                            reason,
                        })?;
                if interval.is_degenerate() {
                    log::warn!(
                        "Peak interval {} for signal {} ends before it starts and will never match",
                        interval,
                        entry.signal_id
                    );
                }
                intervals.push(interval);
            }
        }
        Ok(Self { windows })
    }

    /// Intervals registered for `signal_id`; empty if unknown.
    pub fn lookup(&self, signal_id: SignalId) -> &[PeakInterval] {
        self.windows
            .get(&signal_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `time` falls inside any interval of `signal_id`.
    pub fn is_peak(&self, signal_id: SignalId, time: TimeOfDay) -> bool {
        self.lookup(signal_id).iter().any(|i| i.contains(time))
    }

    pub fn signal_count(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Wire form of the mapping, ordered by signal id.
    pub fn to_entries(&self) -> Vec<PeakWindowEntry> {
        let mut entries: Vec<PeakWindowEntry> = self
            .windows
            .iter()
            .map(|(id, intervals)| PeakWindowEntry {
                signal_id: *id,
                peak_hours: intervals.iter().map(ToString::to_string).collect(),
            })
            .collect();
        entries.sort_by_key(|e| e.signal_id);
        entries
    }
}

/// Registry of peak windows backed by a [`PeakWindowRepository`].
pub struct PeakWindowRegistry {
    current: Arc<RwLock<Arc<PeakWindowSnapshot>>>,
    store: Arc<dyn PeakWindowRepository>,
    // Serializes persist + swap so the store and the snapshot agree on the
    // last registration.
    write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl PeakWindowRegistry {
    /// Create an empty registry without reading the store.
    pub fn new(store: Arc<dyn PeakWindowRepository>) -> Self {
        Self::with_snapshot(store, PeakWindowSnapshot::empty())
    }

    fn with_snapshot(store: Arc<dyn PeakWindowRepository>, snapshot: PeakWindowSnapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
            store,
            write_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Build a registry from whatever the store holds.
    ///
    /// Corrupt persisted intervals always fail the load. An unreachable store
    /// fails it too unless `options.empty_on_load_failure` is set.
    pub async fn load(
        store: Arc<dyn PeakWindowRepository>,
        options: RegistryOptions,
    ) -> Result<Self, RegistryError> {
        let records = match db_services::load_peak_windows(store.as_ref()).await {
            Ok(records) => records,
            Err(e) if options.empty_on_load_failure => {
                log::warn!("Peak window store unavailable, starting empty: {}", e);
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot = PeakWindowSnapshot::from_entries(&records)?;
        log::info!(
            "Peak window registry loaded with {} signals",
            snapshot.signal_count()
        );
        Ok(Self::with_snapshot(store, snapshot))
    }

    /// Replace the entire registry with `entries`.
    ///
    /// All strings are parsed before anything is written; one malformed
    /// string rejects the batch. Signals absent from `entries` lose their
    /// windows. Returns the number of signals now registered.
    ///
    /// Persist and swap run on a spawned task: once the batch has parsed,
    /// dropping the returned future does not stop it from being published.
    pub async fn register(&self, entries: &[PeakWindowEntry]) -> Result<usize, RegistryError> {
        let snapshot = PeakWindowSnapshot::from_entries(entries)?;
        let records = snapshot.to_entries();

        let current = Arc::clone(&self.current);
        let store = Arc::clone(&self.store);
        let write_lock = Arc::clone(&self.write_lock);
        let publish = tokio::spawn(async move {
            let _guard = write_lock.lock().await;
            db_services::replace_peak_windows(store.as_ref(), &records).await?;

            let count = snapshot.signal_count();
            *current.write() = Arc::new(snapshot);
            Ok::<usize, RepositoryError>(count)
        });

        let count = publish.await.map_err(|e| {
            RepositoryError::internal(format!("Peak window registration task failed: {}", e))
                .with_operation("register_peak_windows")
        })??;
        log::info!("Registered peak windows for {} signals", count);
        Ok(count)
    }

    /// Intervals registered for `signal_id`; empty if unknown.
    pub fn lookup(&self, signal_id: SignalId) -> Vec<PeakInterval> {
        self.snapshot().lookup(signal_id).to_vec()
    }

    /// The current mapping. Stays valid (and unchanged) across later
    /// registrations.
    pub fn snapshot(&self) -> Arc<PeakWindowSnapshot> {
        self.current.read().clone()
    }

    /// Current mapping in wire form.
    pub fn entries(&self) -> Vec<PeakWindowEntry> {
        self.snapshot().to_entries()
    }

    pub fn store(&self) -> &Arc<dyn PeakWindowRepository> {
        &self.store
    }
}

impl std::fmt::Debug for PeakWindowRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeakWindowRegistry")
            .field("signals", &self.snapshot().signal_count())
            .field("store", &self.store.backend_name())
            .finish()
    }
}
