//! Core data types for pool water measurements and maintenance

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

/// Tracked water parameter.
///
/// Closed set; the wire names match the measurement sheet columns
/// ("Sal" for salinity, "Temperatura" for temperature, etc.).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Parameter {
    Ph,
    Conductivity,
    Tds,
    Salinity,
    Orp,
    Fac,
    Temperature,
}

impl Parameter {
    /// All tracked parameters, in dashboard order.
    pub const ALL: [Parameter; 7] = [
        Parameter::Ph,
        Parameter::Salinity,
        Parameter::Fac,
        Parameter::Orp,
        Parameter::Conductivity,
        Parameter::Tds,
        Parameter::Temperature,
    ];

    /// Sheet/display name for this parameter.
    pub fn name(self) -> &'static str {
        match self {
            Parameter::Ph => "pH",
            Parameter::Conductivity => "Conductividad",
            Parameter::Tds => "TDS",
            Parameter::Salinity => "Sal",
            Parameter::Orp => "ORP",
            Parameter::Fac => "FAC",
            Parameter::Temperature => "Temperatura",
        }
    }

    /// Resolve a sheet/display name back to a parameter.
    pub fn from_name(name: &str) -> Option<Parameter> {
        match name {
            "pH" => Some(Parameter::Ph),
            "Conductividad" => Some(Parameter::Conductivity),
            "TDS" => Some(Parameter::Tds),
            "Sal" => Some(Parameter::Salinity),
            "ORP" => Some(Parameter::Orp),
            "FAC" => Some(Parameter::Fac),
            "Temperatura" => Some(Parameter::Temperature),
            _ => None,
        }
    }
}

/// One water-test event.
///
/// Append-only and never mutated; repeated (date, time) combinations are
/// allowed. Every numeric field is optional because older sheets lack the
/// temperature column and individual cells may be blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub ph: Option<f64>,
    /// µS/cm
    pub conductivity: Option<f64>,
    /// ppm
    pub tds: Option<f64>,
    /// ppm
    pub salinity: Option<f64>,
    /// mV
    pub orp: Option<f64>,
    /// Free available chlorine, ppm
    pub fac: Option<f64>,
    /// °C; absent in the older schema
    pub temperature: Option<f64>,
}

impl Measurement {
    /// Value of a single parameter, if recorded.
    pub fn value(&self, parameter: Parameter) -> Option<f64> {
        match parameter {
            Parameter::Ph => self.ph,
            Parameter::Conductivity => self.conductivity,
            Parameter::Tds => self.tds,
            Parameter::Salinity => self.salinity,
            Parameter::Orp => self.orp,
            Parameter::Fac => self.fac,
            Parameter::Temperature => self.temperature,
        }
    }

    /// Combined date+time, the chronological sort key.
    pub fn timestamp(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }
}

/// Condition of the equipment before a maintenance task was performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    Good,
    Fair,
    Poor,
    Critical,
}

impl TaskState {
    /// Sheet label (Spanish, as stored).
    pub fn label(self) -> &'static str {
        match self {
            TaskState::Good => "Bueno",
            TaskState::Fair => "Regular",
            TaskState::Poor => "Malo",
            TaskState::Critical => "Crítico",
        }
    }

    /// Parse a sheet label, tolerating case and the unaccented form.
    pub fn from_label(label: &str) -> Option<TaskState> {
        match label.trim().to_lowercase().as_str() {
            "bueno" => Some(TaskState::Good),
            "regular" => Some(TaskState::Fair),
            "malo" => Some(TaskState::Poor),
            "crítico" | "critico" => Some(TaskState::Critical),
            _ => None,
        }
    }
}

/// One maintenance event, optionally carrying a forward-looking reminder.
///
/// Append-only, except that `next_due` may be blanked in place by an
/// explicit dismiss action. A reminder is considered resolved once any
/// record of the same kind is dated on or after the due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    /// Date the task was performed.
    pub date: NaiveDate,
    /// Task kind, e.g. "Limpieza filtro". Free-form but usually one of the
    /// well-known kinds in [`crate::alerts::suggested_interval_days`].
    pub kind: String,
    pub state_before: TaskState,
    pub minutes_spent: u32,
    pub notes: String,
    /// Reminder: when the same task should recur.
    pub next_due: Option<NaiveDate>,
}

/// Alert category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Critical,
    Maintenance,
    Trend,
}

/// Display priority. `High` sorts before `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    High,
    Medium,
}

/// One out-of-range parameter in a critical alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterFinding {
    pub parameter: Parameter,
    pub value: f64,
    pub status: crate::classify::ParameterStatus,
    pub unit: &'static str,
    pub icon: &'static str,
}

/// One unresolved reminder in an overdue-maintenance alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverdueTask {
    pub kind: String,
    pub due: NaiveDate,
}

/// Structured findings attached to an alert.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AlertDetails {
    Parameters(Vec<ParameterFinding>),
    Tasks(Vec<OverdueTask>),
}

/// A derived alert. Recomputed on every analysis pass, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub priority: AlertPriority,
    pub title: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<AlertDetails>,
}

/// A chemical-dosing recommendation. Derived, ephemeral.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DosingRecommendation {
    pub amount: f64,
    pub unit: &'static str,
    pub instructions: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_names_round_trip() {
        for param in Parameter::ALL {
            assert_eq!(
                Parameter::from_name(param.name()),
                Some(param),
                "name round trip failed for {:?}",
                param
            );
        }
        assert_eq!(Parameter::from_name("Alkalinity"), None);
    }

    #[test]
    fn test_measurement_value_accessor() {
        let m = Measurement {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
            ph: Some(7.4),
            conductivity: Some(6000.0),
            tds: Some(3000.0),
            salinity: Some(3200.0),
            orp: Some(700.0),
            fac: Some(1.5),
            temperature: None,
        };
        assert_eq!(m.value(Parameter::Ph), Some(7.4));
        assert_eq!(m.value(Parameter::Temperature), None);
        assert_eq!(
            m.timestamp(),
            NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(10, 30, 0)
                .unwrap()
        );
    }

    #[test]
    fn test_task_state_labels() {
        assert_eq!(TaskState::from_label("Bueno"), Some(TaskState::Good));
        assert_eq!(TaskState::from_label("critico"), Some(TaskState::Critical));
        assert_eq!(TaskState::from_label(" Crítico "), Some(TaskState::Critical));
        assert_eq!(TaskState::from_label("estupendo"), None);
        assert_eq!(TaskState::Poor.label(), "Malo");
    }

    #[test]
    fn test_priority_ordering_high_first() {
        assert!(AlertPriority::High < AlertPriority::Medium);
    }
}
