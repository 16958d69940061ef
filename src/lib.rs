/// laghi_service: laghi.net lake level monitoring service.
///
/// # Module structure
///
/// ```text
/// laghi_service
/// ├── model       — shared data types (LakeRecord, Measurement, LaghiError, …)
/// ├── lakes       — whitelist of the five monitored lakes
/// ├── config      — service configuration loader (laghi.toml)
/// ├── ingest
/// │   ├── laghi   — laghi.net session + BootWidgetData POST (FetchClient)
/// │   ├── extract — payload normalization into LakeRecords
/// │   └── fixtures (test only) — representative widget payloads
/// ├── coordinator — executor hand-off, timeout, stale-but-available snapshot
/// ├── sensors     — one addressable sensor per (lake, measurement)
/// ├── endpoint    — read-only HTTP API over the sensors
/// └── daemon      — startup validation and refresh loop
/// ```

/// Public modules
pub mod config;
pub mod coordinator;
pub mod daemon;
pub mod endpoint;
pub mod ingest;
pub mod lakes;
pub mod model;
pub mod sensors;
