#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use signal_cycle::db::repositories::LocalRepository;
use signal_cycle::db::repository::PeakWindowRepository;
use signal_cycle::models::{CycleRequest, SignalObservation, TimeOfDay};
use signal_cycle::services::{CycleAllocator, CycleService, FixedClock, PeakWindowRegistry};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn time(s: &str) -> TimeOfDay {
    s.parse().expect("valid time of day")
}

/// The two-signal request used throughout the allocation scenarios.
pub fn two_signal_request() -> CycleRequest {
    CycleRequest::new(
        120.0,
        vec![
            SignalObservation::new(1, 50, 3.0),
            SignalObservation::new(2, 30, 2.0),
        ],
    )
}

/// Service over a fresh in-memory store with the clock pinned to `at`.
pub fn local_service(at: &str) -> (LocalRepository, CycleService) {
    let repo = LocalRepository::new();
    let store: Arc<dyn PeakWindowRepository> = Arc::new(repo.clone());
    let registry = Arc::new(PeakWindowRegistry::new(store));
    let service = CycleService::with_parts(
        registry,
        CycleAllocator::default(),
        Arc::new(FixedClock(time(at))),
    );
    (repo, service)
}
