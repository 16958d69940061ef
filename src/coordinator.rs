/// Refresh coordinator: runs the blocking fetch cycle off the caller's
/// thread and keeps the last good record set available to consumers.
///
/// ## Flow
///
/// 1. `refresh()` hands `FetchClient::get_data` to a single-worker executor
/// 2. waits at most `refresh_timeout` for the result
/// 3. an empty result is a failed update; otherwise records are filtered to
///    the configured lakes
/// 4. the whole snapshot is swapped under a write lock
///
/// On failure the previous records stay visible (stale-but-available) and
/// the failure counter grows. With one worker a hung fetch can never
/// overlap the next cycle; the next cycle fails fast instead.

use crate::ingest::laghi::{FetchClient, Transport};
use crate::model::{LaghiError, LakeRecord, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use threadpool::ThreadPool;

/// Source of "now" for refresh bookkeeping.
pub type Clock = fn() -> DateTime<Utc>;

// ---------------------------------------------------------------------------
// Shared snapshot
// ---------------------------------------------------------------------------

/// Everything consumers see about the latest refresh.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Snapshot {
    /// Records of the last successful cycle.
    pub records: Vec<LakeRecord>,
    pub last_update_success: bool,
    /// When `records` were last replaced.
    pub last_refreshed: Option<DateTime<Utc>>,
    pub consecutive_failures: u32,
}

impl Snapshot {
    pub fn record(&self, lake_name: &str) -> Option<&LakeRecord> {
        self.records.iter().find(|r| r.name == lake_name)
    }
}

/// Cloneable read handle on the coordinator's snapshot.
#[derive(Clone, Default)]
pub struct SnapshotHandle(Arc<RwLock<Snapshot>>);

impl SnapshotHandle {
    /// Consistent copy of the current snapshot.
    pub fn read(&self) -> Snapshot {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn replace(&self, records: Vec<LakeRecord>, now: DateTime<Utc>) {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Snapshot {
            records,
            last_update_success: true,
            last_refreshed: Some(now),
            consecutive_failures: 0,
        };
    }

    fn mark_failure(&self) -> u32 {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        guard.last_update_success = false;
        guard.consecutive_failures += 1;
        guard.consecutive_failures
    }
}

/// Clears the in-flight flag when the job ends, including by panic.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

pub struct Coordinator<T = reqwest::blocking::Client> {
    fetcher: Arc<FetchClient<T>>,
    executor: ThreadPool,
    in_flight: Arc<AtomicBool>,
    configured_lakes: Vec<String>,
    refresh_timeout: Duration,
    snapshot: SnapshotHandle,
    clock: Clock,
}

impl<T: Transport + Send + Sync + 'static> Coordinator<T> {
    pub fn new(fetcher: FetchClient<T>, configured_lakes: Vec<String>, refresh_timeout: Duration) -> Self {
        Coordinator {
            fetcher: Arc::new(fetcher),
            executor: ThreadPool::with_name("laghi-refresh".to_string(), 1),
            in_flight: Arc::new(AtomicBool::new(false)),
            configured_lakes,
            refresh_timeout,
            snapshot: SnapshotHandle::default(),
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock used to stamp successful refreshes.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn handle(&self) -> SnapshotHandle {
        self.snapshot.clone()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read()
    }

    pub fn configured_lakes(&self) -> &[String] {
        &self.configured_lakes
    }

    /// Runs one refresh cycle and publishes its result.
    ///
    /// Returns the number of records published.
    ///
    /// # Errors
    /// - `LaghiError::UpdateFailed` — laghi.net produced no records.
    /// - `LaghiError::RefreshTimeout` — the cycle outlived `refresh_timeout`.
    /// - `LaghiError::RefreshInProgress` — a previous cycle is still running.
    pub fn refresh(&self) -> Result<usize> {
        match self.fetch_configured() {
            Ok(records) => {
                let count = records.len();
                self.snapshot.replace(records, (self.clock)());
                log::info!("Refreshed {} lake(s) from laghi.net", count);
                Ok(count)
            }
            Err(e) => {
                let failures = self.snapshot.mark_failure();
                log::warn!("Refresh failed ({} in a row): {}", failures, e);
                Err(e)
            }
        }
    }

    fn fetch_configured(&self) -> Result<Vec<LakeRecord>> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(LaghiError::RefreshInProgress);
        }

        let (tx, rx) = mpsc::channel();
        let fetcher = Arc::clone(&self.fetcher);
        let guard = InFlight(Arc::clone(&self.in_flight));

        self.executor.execute(move || {
            let records = fetcher.get_data();
            drop(guard);
            // Receiver is gone if the coordinator already timed out.
            let _ = tx.send(records);
        });

        let all = match rx.recv_timeout(self.refresh_timeout) {
            Ok(records) => records,
            Err(RecvTimeoutError::Timeout) => {
                return Err(LaghiError::RefreshTimeout(self.refresh_timeout));
            }
            Err(RecvTimeoutError::Disconnected) => {
                log::error!("Refresh worker exited without a result");
                return Err(LaghiError::UpdateFailed("refresh worker panicked".to_string()));
            }
        };

        if all.is_empty() {
            return Err(LaghiError::UpdateFailed("no data from laghi.net".to_string()));
        }

        Ok(filter_configured(all, &self.configured_lakes))
    }
}

/// Keeps records whose name is configured, in payload order.
pub fn filter_configured(records: Vec<LakeRecord>, configured: &[String]) -> Vec<LakeRecord> {
    for lake in configured {
        if !records.iter().any(|r| &r.name == lake) {
            log::warn!("Configured lake '{}' missing from laghi.net payload", lake);
        }
    }

    records
        .into_iter()
        .filter(|r| configured.iter().any(|c| c == &r.name))
        .collect()
}
