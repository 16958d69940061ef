/// Shared data types for the laghi.net lake monitoring service.
///
/// `LakeRecord` is the normalized, strongly keyed view of one lake object
/// from the laghi.net widget payload. Every record carries all four
/// measurements; series missing from the payload keep a placeholder value.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// laghi.net series ids
// ---------------------------------------------------------------------------

/// "Livello" — lake level.
pub const SERIES_LEVEL: i64 = 3;
/// "Afflusso" — inflow.
pub const SERIES_INFLOW: i64 = 4;
/// "Deflusso" — outflow.
pub const SERIES_OUTFLOW: i64 = 5;
/// "Riempimento" — fill percentage.
pub const SERIES_FILL: i64 = 6;

/// Value used for a measurement whose series is absent from the payload.
pub const PLACEHOLDER_VALUE: f64 = 50.0;

// ---------------------------------------------------------------------------
// Measurement kinds
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementKind {
    Level,
    Inflow,
    Outflow,
    Fill,
}

impl MeasurementKind {
    pub const ALL: [MeasurementKind; 4] = [
        MeasurementKind::Level,
        MeasurementKind::Inflow,
        MeasurementKind::Outflow,
        MeasurementKind::Fill,
    ];

    /// Short key used in sensor ids and JSON output.
    pub fn key(self) -> &'static str {
        match self {
            MeasurementKind::Level => "level",
            MeasurementKind::Inflow => "inflow",
            MeasurementKind::Outflow => "outflow",
            MeasurementKind::Fill => "fill",
        }
    }

    pub fn series_id(self) -> i64 {
        match self {
            MeasurementKind::Level => SERIES_LEVEL,
            MeasurementKind::Inflow => SERIES_INFLOW,
            MeasurementKind::Outflow => SERIES_OUTFLOW,
            MeasurementKind::Fill => SERIES_FILL,
        }
    }

    pub fn from_series_id(id: i64) -> Option<Self> {
        MeasurementKind::ALL.into_iter().find(|k| k.series_id() == id)
    }

    pub fn default_unit(self) -> &'static str {
        match self {
            MeasurementKind::Level => "m",
            MeasurementKind::Inflow | MeasurementKind::Outflow => "m³/s",
            MeasurementKind::Fill => "%",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            MeasurementKind::Level => "Level",
            MeasurementKind::Inflow => "Inflow",
            MeasurementKind::Outflow => "Outflow",
            MeasurementKind::Fill => "Fill Percentage",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            MeasurementKind::Level => "mdi:water",
            MeasurementKind::Inflow => "mdi:water-plus",
            MeasurementKind::Outflow => "mdi:water-minus",
            MeasurementKind::Fill => "mdi:water-percent",
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A single value with its unit of measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

impl Measurement {
    pub fn placeholder(kind: MeasurementKind) -> Self {
        Measurement {
            value: PLACEHOLDER_VALUE,
            unit: kind.default_unit().to_string(),
        }
    }
}

/// Normalized telemetry for one lake, rebuilt in full on every refresh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LakeRecord {
    pub name: String,
    pub level: Measurement,
    pub inflow: Measurement,
    pub outflow: Measurement,
    pub fill: Measurement,
    /// Unix epoch seconds of the latest fill sample; 0 if unavailable.
    pub timestamp: i64,
}

impl LakeRecord {
    /// Record with every measurement at its placeholder and no timestamp.
    pub fn new(name: impl Into<String>) -> Self {
        LakeRecord {
            name: name.into(),
            level: Measurement::placeholder(MeasurementKind::Level),
            inflow: Measurement::placeholder(MeasurementKind::Inflow),
            outflow: Measurement::placeholder(MeasurementKind::Outflow),
            fill: Measurement::placeholder(MeasurementKind::Fill),
            timestamp: 0,
        }
    }

    pub fn measurement(&self, kind: MeasurementKind) -> &Measurement {
        match kind {
            MeasurementKind::Level => &self.level,
            MeasurementKind::Inflow => &self.inflow,
            MeasurementKind::Outflow => &self.outflow,
            MeasurementKind::Fill => &self.fill,
        }
    }

    pub fn measurement_mut(&mut self, kind: MeasurementKind) -> &mut Measurement {
        match kind {
            MeasurementKind::Level => &mut self.level,
            MeasurementKind::Inflow => &mut self.inflow,
            MeasurementKind::Outflow => &mut self.outflow,
            MeasurementKind::Fill => &mut self.fill,
        }
    }

    /// Time of the latest fill sample, `None` when the payload had none.
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        if self.timestamp == 0 {
            return None;
        }
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised inside the service. The fetch path never lets these
/// escape `get_data()`; they surface in logs and in the coordinator.
#[derive(Error, Debug)]
pub enum LaghiError {
    /// Transport failure (DNS, connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response
    #[error("{step} returned HTTP {status}")]
    Status { step: &'static str, status: u16 },

    /// Response body was not JSON
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(String),

    /// Upstream answered with `success: false`
    #[error("laghi.net reported success=false")]
    UpstreamFailure,

    /// JSON parsed but lacks the expected envelope
    #[error("Unexpected response shape: {0}")]
    MissingShape(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No valid lakes configured")]
    NoValidLakes,

    #[error("Update failed: {0}")]
    UpdateFailed(String),

    #[error("Refresh did not complete within {0:?}")]
    RefreshTimeout(Duration),

    #[error("Previous refresh is still running")]
    RefreshInProgress,
}

pub type Result<T> = std::result::Result<T, LaghiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_uses_placeholders() {
        let record = LakeRecord::new("Lago di Como");
        assert_eq!(record.name, "Lago di Como");
        assert_eq!(record.level, Measurement { value: 50.0, unit: "m".to_string() });
        assert_eq!(record.inflow.unit, "m³/s");
        assert_eq!(record.outflow.unit, "m³/s");
        assert_eq!(record.fill.unit, "%");
        assert_eq!(record.timestamp, 0);
        assert!(record.last_updated().is_none());
    }

    #[test]
    fn test_series_ids_map_back_to_kinds() {
        for kind in MeasurementKind::ALL {
            assert_eq!(MeasurementKind::from_series_id(kind.series_id()), Some(kind));
        }
        assert_eq!(MeasurementKind::from_series_id(7), None);
        assert_eq!(MeasurementKind::from_series_id(SERIES_FILL), Some(MeasurementKind::Fill));
    }

    #[test]
    fn test_measurement_mut_targets_matching_field() {
        let mut record = LakeRecord::new("Lago d'Idro");
        record.measurement_mut(MeasurementKind::Outflow).value = 12.5;
        assert_eq!(record.outflow.value, 12.5);
        assert_eq!(record.inflow.value, PLACEHOLDER_VALUE);
        assert_eq!(record.measurement(MeasurementKind::Outflow).value, 12.5);
    }

    #[test]
    fn test_last_updated_converts_epoch_seconds() {
        let mut record = LakeRecord::new("Lago di Garda");
        record.timestamp = 1_717_228_800;
        let dt = record.last_updated().expect("non-zero timestamp");
        assert_eq!(dt.to_rfc3339(), "2024-06-01T08:00:00+00:00");
    }
}
