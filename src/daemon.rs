/// Core daemon implementation for the lake monitoring service
///
/// This module implements the main daemon loop that:
/// 1. Validates the configured lakes against the registry
/// 2. Builds the laghi.net client and refresh coordinator
/// 3. Performs a first refresh so sensors have data at startup
/// 4. Refreshes on a fixed interval, keeping stale data on failure

use crate::config::LaghiConfig;
use crate::coordinator::{Coordinator, SnapshotHandle};
use crate::ingest::laghi::FetchClient;
use crate::model::{LaghiError, Result};
use crate::sensors::{build_sensors, SensorState};
use chrono::Utc;

// ---------------------------------------------------------------------------
// Daemon State
// ---------------------------------------------------------------------------

/// Main daemon state
pub struct Daemon {
    config: LaghiConfig,
    coordinator: Option<Coordinator>,
}

impl Daemon {
    /// Create a new daemon instance with default configuration
    pub fn new() -> Self {
        Self::with_config(LaghiConfig::default())
    }

    /// Create daemon with custom configuration
    pub fn with_config(config: LaghiConfig) -> Self {
        Self {
            config,
            coordinator: None,
        }
    }

    /// Daemon around an already built coordinator, e.g. one pointed at
    /// other laghi.net endpoints.
    pub fn with_coordinator(config: LaghiConfig, coordinator: Coordinator) -> Self {
        Self {
            config,
            coordinator: Some(coordinator),
        }
    }

    pub fn config(&self) -> &LaghiConfig {
        &self.config
    }

    /// Validate lakes and build the client and coordinator, without
    /// fetching anything yet.
    pub fn prepare(&mut self) -> Result<()> {
        let lakes = self.config.validated_lakes()?;
        let fetcher = FetchClient::new(self.config.fetch_timeout())?;
        self.coordinator = Some(Coordinator::new(fetcher, lakes, self.config.refresh_timeout()));
        Ok(())
    }

    /// Initialize daemon: validate lakes, build the client, first refresh.
    ///
    /// A failed first refresh is logged, not returned; the loop retries it.
    pub fn initialize(&mut self) -> Result<()> {
        self.prepare()?;

        if let Err(e) = self.coordinator()?.refresh() {
            log::warn!("Initial refresh failed, will retry on next cycle: {}", e);
        }
        Ok(())
    }

    fn coordinator(&self) -> Result<&Coordinator> {
        self.coordinator
            .as_ref()
            .ok_or_else(|| LaghiError::UpdateFailed("daemon not initialized".to_string()))
    }

    /// Read handle for the endpoint thread.
    pub fn snapshot_handle(&self) -> Result<SnapshotHandle> {
        Ok(self.coordinator()?.handle())
    }

    pub fn configured_lakes(&self) -> Result<Vec<String>> {
        Ok(self.coordinator()?.configured_lakes().to_vec())
    }

    /// Current state of every sensor.
    pub fn sensor_states(&self) -> Result<Vec<SensorState>> {
        let coordinator = self.coordinator()?;
        let snapshot = coordinator.snapshot();
        Ok(build_sensors(&snapshot, coordinator.configured_lakes())
            .iter()
            .map(|s| s.state(&snapshot))
            .collect())
    }

    /// Refresh once and report sensor states; a failed refresh is an error.
    pub fn run_once(&self) -> Result<Vec<SensorState>> {
        self.coordinator()?.refresh()?;
        self.sensor_states()
    }

    /// Main daemon loop (runs indefinitely)
    pub fn run(&self) -> Result<()> {
        let coordinator = self.coordinator()?;
        let interval = self.config.scan_interval();

        log::info!(
            "Starting refresh loop: every {} minutes for {} lake(s)",
            self.config.scan_interval_minutes,
            coordinator.configured_lakes().len()
        );

        // initialize() already ran the first cycle
        let mut sleep_for = interval;

        loop {
            std::thread::sleep(sleep_for);

            let start = Utc::now();
            match coordinator.refresh() {
                Ok(count) => log::debug!("Cycle complete: {} lake(s) published", count),
                Err(e) => log::debug!("Cycle failed: {}", e),
            }

            // Sleep until next refresh interval
            let elapsed = (Utc::now() - start).to_std().unwrap_or_default();
            sleep_for = interval.saturating_sub(elapsed);
        }
    }
}

impl Default for Daemon {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
