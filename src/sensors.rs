/// Sensor view of the lake records.
///
/// Each (lake, measurement kind) pair is one addressable sensor with a
/// stable unique id, e.g. `laghi_lago_di_garda_level`. Sensors hold no
/// data of their own; every read goes against a coordinator `Snapshot`.

use crate::coordinator::Snapshot;
use crate::lakes::find_lake;
use crate::model::{LakeRecord, MeasurementKind};
use chrono::{Local, TimeZone};
use serde::Serialize;

pub const STATE_CLASS_MEASUREMENT: &str = "measurement";

#[derive(Debug, Clone, PartialEq)]
pub struct LakeSensor {
    lake_name: String,
    kind: MeasurementKind,
}

/// Extra attributes published next to the value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorAttributes {
    pub lake_name: String,
    pub sensor_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub basin: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// Serializable point-in-time state of one sensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorState {
    pub unique_id: String,
    pub name: String,
    pub icon: &'static str,
    pub state_class: &'static str,
    pub value: Option<f64>,
    pub unit: Option<String>,
    pub available: bool,
    pub attributes: Option<SensorAttributes>,
}

impl LakeSensor {
    pub fn new(lake_name: impl Into<String>, kind: MeasurementKind) -> Self {
        LakeSensor {
            lake_name: lake_name.into(),
            kind,
        }
    }

    pub fn lake_name(&self) -> &str {
        &self.lake_name
    }

    pub fn kind(&self) -> MeasurementKind {
        self.kind
    }

    pub fn unique_id(&self) -> String {
        format!(
            "laghi_{}_{}",
            self.lake_name.to_lowercase().replace(' ', "_"),
            self.kind.key()
        )
    }

    /// Friendly name, e.g. "Lago di Garda Fill Percentage".
    pub fn name(&self) -> String {
        format!("{} {}", self.lake_name, self.kind.display_name())
    }

    pub fn icon(&self) -> &'static str {
        self.kind.icon()
    }

    fn record<'a>(&self, snapshot: &'a Snapshot) -> Option<&'a LakeRecord> {
        snapshot.record(&self.lake_name)
    }

    pub fn native_value(&self, snapshot: &Snapshot) -> Option<f64> {
        self.record(snapshot).map(|r| r.measurement(self.kind).value)
    }

    pub fn native_unit(&self, snapshot: &Snapshot) -> Option<String> {
        self.record(snapshot).map(|r| r.measurement(self.kind).unit.clone())
    }

    /// Attributes in the host's local time zone.
    pub fn attributes(&self, snapshot: &Snapshot) -> Option<SensorAttributes> {
        self.attributes_in(snapshot, &Local)
    }

    /// Attributes with `last_updated` rendered in `tz`; the timestamp is
    /// omitted when the record has none.
    pub fn attributes_in<Tz>(&self, snapshot: &Snapshot, tz: &Tz) -> Option<SensorAttributes>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        let record = self.record(snapshot)?;
        Some(SensorAttributes {
            lake_name: self.lake_name.clone(),
            sensor_type: self.kind.key(),
            basin: find_lake(&self.lake_name).map(|lake| lake.basin),
            last_updated: record
                .last_updated()
                .map(|dt| dt.with_timezone(tz).format("%Y-%m-%dT%H:%M:%S%:z").to_string()),
        })
    }

    /// A sensor is available when the last cycle succeeded and its lake is
    /// present in the snapshot.
    pub fn available(&self, snapshot: &Snapshot) -> bool {
        snapshot.last_update_success && self.native_value(snapshot).is_some()
    }

    pub fn state(&self, snapshot: &Snapshot) -> SensorState {
        SensorState {
            unique_id: self.unique_id(),
            name: self.name(),
            icon: self.icon(),
            state_class: STATE_CLASS_MEASUREMENT,
            value: self.native_value(snapshot),
            unit: self.native_unit(snapshot),
            available: self.available(snapshot),
            attributes: self.attributes(snapshot),
        }
    }
}

/// One sensor per measurement kind for every configured lake present in
/// the snapshot, in record order.
pub fn build_sensors(snapshot: &Snapshot, configured: &[String]) -> Vec<LakeSensor> {
    snapshot
        .records
        .iter()
        .filter(|r| configured.iter().any(|c| c == &r.name))
        .flat_map(|r| MeasurementKind::ALL.into_iter().map(move |kind| LakeSensor::new(r.name.clone(), kind)))
        .collect()
}

pub fn find_sensor<'a>(sensors: &'a [LakeSensor], unique_id: &str) -> Option<&'a LakeSensor> {
    sensors.iter().find(|s| s.unique_id() == unique_id)
}
