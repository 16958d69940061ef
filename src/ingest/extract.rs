/// Record extraction for the laghi.net widget payload.
///
/// Turns the loosely structured BootWidgetData JSON into one `LakeRecord`
/// per lake object. Series descriptors and series data are correlated by
/// array position only, so every positional access is bounds-checked and a
/// defect in one lake (or one series) never discards the rest of the batch.
/// See `fixtures.rs` for annotated examples of the payload.

use crate::model::{LaghiError, LakeRecord, MeasurementKind, Result};
use chrono::{Local, NaiveDateTime, TimeZone};
use serde::Deserialize;
use serde_json::Value;

/// Format of `data_serie[].data`, local wall-clock time.
pub const SAMPLE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// Serde structures for the per-lake pieces
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct TooltipConfig {
    titolo: String,
    // Descriptors stay untyped so one odd entry cannot sink the lake.
    #[serde(default)]
    series: Vec<Value>,
}

#[derive(Deserialize)]
struct SeriesData {
    #[serde(default)]
    anagrafica_serie: SeriesInfo,
    #[serde(default)]
    data_serie: Vec<Sample>,
}

#[derive(Deserialize, Default)]
struct SeriesInfo {
    #[serde(rename = "UnMis")]
    unit: Option<String>,
}

#[derive(Deserialize)]
struct Sample {
    #[serde(default)]
    val: Option<SampleValue>,
    #[serde(default)]
    data: Option<String>,
}

/// laghi.net mostly sends numbers, occasionally numeric strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum SampleValue {
    Number(f64),
    Text(String),
}

impl SampleValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            SampleValue::Number(n) if n.is_finite() => Some(*n),
            SampleValue::Number(_) => None,
            SampleValue::Text(s) => s.trim().replace(',', ".").parse().ok(),
        }
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

/// Extracts lake records, interpreting sample timestamps in the host's
/// local time zone.
pub fn extract_lakes(payload: &Value) -> Vec<LakeRecord> {
    extract_lakes_in(payload, &Local)
}

/// Extracts one record per well-formed lake object in `payload["data"]`,
/// preserving input order. Sample timestamps are interpreted in `tz`.
///
/// Lake objects without a readable `tooltip_config` are logged and skipped.
/// A missing or non-array `data` yields no records.
pub fn extract_lakes_in<Tz: TimeZone>(payload: &Value, tz: &Tz) -> Vec<LakeRecord> {
    let Some(lakes) = payload.get("data").and_then(Value::as_array) else {
        log::warn!("Payload has no data array, nothing to extract");
        return Vec::new();
    };

    lakes
        .iter()
        .enumerate()
        .filter_map(|(index, lake)| match extract_lake(lake, tz) {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("Skipping lake object #{}: {}", index, e);
                None
            }
        })
        .collect()
}

/// Builds the record for a single lake object.
///
/// # Errors
/// `LaghiError::MissingShape` when the object has no usable
/// `tooltip_config` (and therefore no name).
pub fn extract_lake<Tz: TimeZone>(lake: &Value, tz: &Tz) -> Result<LakeRecord> {
    let config_value = lake
        .get("tooltip_config")
        .ok_or_else(|| LaghiError::MissingShape("lake object has no tooltip_config".to_string()))?;

    let config = TooltipConfig::deserialize(config_value)
        .map_err(|e| LaghiError::MissingShape(format!("unreadable tooltip_config: {}", e)))?;

    let series_data: &[Value] = lake
        .get("tooltip_data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[]);

    let mut record = LakeRecord::new(config.titolo);

    // The position advances for every descriptor, matched or not.
    for (position, descriptor) in config.series.iter().enumerate() {
        let Some(kind) = descriptor
            .get("id")
            .and_then(series_id)
            .and_then(MeasurementKind::from_series_id)
        else {
            continue;
        };

        let Some(entry) = series_data.get(position) else {
            log::debug!(
                "{}: series {} declared at position {} has no data entry",
                record.name,
                kind.key(),
                position
            );
            continue;
        };

        apply_series(&mut record, kind, entry, tz);
    }

    Ok(record)
}

/// Numeric descriptor id; integral floats such as `3.0` count as `3`.
fn series_id(id: &Value) -> Option<i64> {
    id.as_i64().or_else(|| {
        id.as_f64()
            .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// Copies the most recent sample of one series into `record`.
fn apply_series<Tz: TimeZone>(record: &mut LakeRecord, kind: MeasurementKind, entry: &Value, tz: &Tz) {
    let series = match SeriesData::deserialize(entry) {
        Ok(series) => series,
        Err(e) => {
            log::warn!("{}: unreadable {} series: {}", record.name, kind.key(), e);
            return;
        }
    };

    // data_serie is newest first
    let Some(latest) = series.data_serie.first() else {
        log::debug!("{}: {} series has no samples", record.name, kind.key());
        return;
    };

    let Some(value) = latest.val.as_ref().and_then(SampleValue::as_f64) else {
        log::warn!("{}: {} sample has no numeric value", record.name, kind.key());
        return;
    };

    let measurement = record.measurement_mut(kind);
    measurement.value = value;
    if let Some(unit) = series.anagrafica_serie.unit {
        measurement.unit = unit;
    }

    if kind == MeasurementKind::Fill {
        match latest.data.as_deref().and_then(|raw| parse_sample_timestamp(raw, tz)) {
            Some(timestamp) => record.timestamp = timestamp,
            None => log::warn!(
                "{}: could not parse fill timestamp {:?}",
                record.name,
                latest.data
            ),
        }
    }
}

/// Parses a `YYYY-MM-DD HH:MM` sample time in `tz` into epoch seconds.
///
/// Returns `None` for malformed strings and for wall-clock times that do
/// not exist in `tz`. Ambiguous times resolve to the earlier instant.
pub fn parse_sample_timestamp<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<i64> {
    let naive = NaiveDateTime::parse_from_str(raw.trim(), SAMPLE_DATE_FORMAT).ok()?;
    tz.from_local_datetime(&naive).earliest().map(|dt| dt.timestamp())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
