//! Wire rows exchanged with the spreadsheet-shaped backend
//!
//! Column names match the spreadsheet backend. Numeric cells are decimal
//! strings: comma or point separator is accepted on the way in, persisted
//! form is always point-decimal (see `poolmon_core::decimal`).

use chrono::{NaiveDate, NaiveTime};
use poolmon_core::decimal::{normalize_decimal, parse_decimal};
use poolmon_core::types::{MaintenanceRecord, Measurement, TaskState};
use serde::{Deserialize, Serialize};

use crate::{StoreError, StoreResult};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// One measurement sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRow {
    #[serde(rename = "Dia")]
    pub date: String,
    #[serde(rename = "Hora")]
    pub time: String,
    #[serde(rename = "pH", default)]
    pub ph: String,
    #[serde(rename = "Conductividad", default)]
    pub conductivity: String,
    #[serde(rename = "TDS", default)]
    pub tds: String,
    #[serde(rename = "Sal", default)]
    pub salinity: String,
    #[serde(rename = "ORP", default)]
    pub orp: String,
    #[serde(rename = "FAC", default)]
    pub fac: String,
    /// Absent in the older schema.
    #[serde(rename = "Temperatura", default)]
    pub temperature: String,
}

impl MeasurementRow {
    /// Typed record → wire row. Always emits point-decimal strings.
    pub fn from_measurement(measurement: &Measurement) -> Self {
        Self {
            date: measurement.date.format(DATE_FORMAT).to_string(),
            time: measurement.time.format(TIME_FORMAT).to_string(),
            ph: cell(measurement.ph),
            conductivity: cell(measurement.conductivity),
            tds: cell(measurement.tds),
            salinity: cell(measurement.salinity),
            orp: cell(measurement.orp),
            fac: cell(measurement.fac),
            temperature: cell(measurement.temperature),
        }
    }

    /// Wire row → typed record.
    ///
    /// A malformed date or time fails the row; a malformed or blank
    /// numeric cell just yields `None` for that parameter, so one bad cell
    /// cannot take the whole history down.
    pub fn to_measurement(&self) -> StoreResult<Measurement> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|e| StoreError::InvalidRecord(format!("bad date {:?}: {}", self.date, e)))?;
        let time = NaiveTime::parse_from_str(self.time.trim(), TIME_FORMAT)
            .map_err(|e| StoreError::InvalidRecord(format!("bad time {:?}: {}", self.time, e)))?;
        Ok(Measurement {
            date,
            time,
            ph: value(&self.ph),
            conductivity: value(&self.conductivity),
            tds: value(&self.tds),
            salinity: value(&self.salinity),
            orp: value(&self.orp),
            fac: value(&self.fac),
            temperature: value(&self.temperature),
        })
    }
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) => normalize_decimal(&v.to_string()),
        None => String::new(),
    }
}

fn value(cell: &str) -> Option<f64> {
    if cell.trim().is_empty() {
        return None;
    }
    parse_decimal(cell).ok()
}

/// One maintenance sheet row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRow {
    #[serde(rename = "Fecha")]
    pub date: String,
    #[serde(rename = "Tipo")]
    pub kind: String,
    #[serde(rename = "Estado_Antes", default)]
    pub state_before: String,
    #[serde(rename = "Tiempo_Minutos", default)]
    pub minutes_spent: u32,
    #[serde(rename = "Notas", default)]
    pub notes: String,
    /// Empty string when no reminder is set.
    #[serde(rename = "Proximo_Mantenimiento", default)]
    pub next_due: String,
}

impl MaintenanceRow {
    pub fn from_record(record: &MaintenanceRecord) -> Self {
        Self {
            date: record.date.format(DATE_FORMAT).to_string(),
            kind: record.kind.clone(),
            state_before: record.state_before.label().to_string(),
            minutes_spent: record.minutes_spent,
            notes: record.notes.clone(),
            next_due: record
                .next_due
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    pub fn to_record(&self) -> StoreResult<MaintenanceRecord> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT)
            .map_err(|e| StoreError::InvalidRecord(format!("bad date {:?}: {}", self.date, e)))?;
        let state_before = TaskState::from_label(&self.state_before).unwrap_or_else(|| {
            tracing::warn!(state = %self.state_before, "unrecognized task state, assuming Bueno");
            TaskState::Good
        });
        let next_due = if self.next_due.trim().is_empty() {
            None
        } else {
            Some(
                NaiveDate::parse_from_str(self.next_due.trim(), DATE_FORMAT).map_err(|e| {
                    StoreError::InvalidRecord(format!("bad due date {:?}: {}", self.next_due, e))
                })?,
            )
        };
        Ok(MaintenanceRecord {
            date,
            kind: self.kind.clone(),
            state_before,
            minutes_spent: self.minutes_spent,
            notes: self.notes.clone(),
            next_due,
        })
    }
}

/// Append-boundary validation: numeric fields must be finite and
/// non-negative, pH within 0–14. Violations reject the record before
/// anything is written.
pub fn validate_measurement(measurement: &Measurement) -> StoreResult<()> {
    use poolmon_core::types::Parameter;

    for parameter in Parameter::ALL {
        let Some(v) = measurement.value(parameter) else {
            continue;
        };
        if !v.is_finite() || v < 0.0 {
            return Err(StoreError::InvalidRecord(format!(
                "{} must be a finite non-negative number, got {}",
                parameter.name(),
                v
            )));
        }
    }
    if let Some(ph) = measurement.ph {
        if !(0.0..=14.0).contains(&ph) {
            return Err(StoreError::InvalidRecord(format!(
                "pH must be within 0-14, got {}",
                ph
            )));
        }
    }
    Ok(())
}
