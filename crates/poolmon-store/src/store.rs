//! Async collaborator traits the core is written against

use chrono::NaiveDate;
use poolmon_core::dosing::pool_volume_liters;
use poolmon_core::types::{MaintenanceRecord, Measurement};
use serde::{Deserialize, Serialize};

use crate::StoreResult;

/// Static facts about the pool itself (dimensions, equipment).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Explicit total volume; 0.0 means "derive from dimensions".
    #[serde(default)]
    pub volume_liters: f64,
    #[serde(default)]
    pub length_m: f64,
    #[serde(default)]
    pub width_m: f64,
    #[serde(default)]
    pub avg_depth_m: f64,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub installed: Option<NaiveDate>,
    #[serde(default)]
    pub pump_model: String,
    #[serde(default)]
    pub filter_kind: String,
    #[serde(default)]
    pub chlorinator_model: String,
    /// Salt chlorine generator output, percent.
    #[serde(default)]
    pub generator_percent: u8,
    #[serde(default)]
    pub notes: String,
}

impl PoolInfo {
    /// Volume used by the dosing calculator: the explicit figure when set,
    /// otherwise computed from dimensions. 0.0 when neither is defined.
    pub fn effective_volume_liters(&self) -> f64 {
        if self.volume_liters > 0.0 {
            self.volume_liters
        } else {
            pool_volume_liters(self.length_m, self.width_m, self.avg_depth_m)
        }
    }
}

/// Measurement history source/sink.
#[async_trait::async_trait]
pub trait MeasurementStore: Send + Sync {
    /// Full history, ascending by (date, time). Empty is normal.
    async fn measurements(&self) -> StoreResult<Vec<Measurement>>;

    /// Append one measurement. Records are append-only and never mutated.
    async fn append_measurement(&mut self, measurement: &Measurement) -> StoreResult<()>;
}

/// Maintenance log source/sink.
#[async_trait::async_trait]
pub trait MaintenanceStore: Send + Sync {
    async fn maintenance(&self) -> StoreResult<Vec<MaintenanceRecord>>;

    async fn append_maintenance(&mut self, record: &MaintenanceRecord) -> StoreResult<()>;

    /// Blank the reminder of the first record matching exactly
    /// (kind, due). Returns whether a record matched.
    async fn clear_reminder(&mut self, kind: &str, due: NaiveDate) -> StoreResult<bool>;
}

/// Pool metadata source/sink.
#[async_trait::async_trait]
pub trait PoolInfoStore: Send + Sync {
    async fn pool_info(&self) -> StoreResult<PoolInfo>;

    async fn update_pool_info(&mut self, info: &PoolInfo) -> StoreResult<()>;
}

/// Convenience bound for code that needs the whole backend.
pub trait PoolStore: MeasurementStore + MaintenanceStore + PoolInfoStore {}
impl<T: MeasurementStore + MaintenanceStore + PoolInfoStore> PoolStore for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume_prefers_explicit_figure() {
        let info = PoolInfo {
            volume_liters: 42_000.0,
            length_m: 8.0,
            width_m: 4.0,
            avg_depth_m: 1.5,
            ..PoolInfo::default()
        };
        assert_eq!(info.effective_volume_liters(), 42_000.0);
    }

    #[test]
    fn test_effective_volume_derives_from_dimensions() {
        let info = PoolInfo {
            length_m: 8.0,
            width_m: 4.0,
            avg_depth_m: 1.5,
            ..PoolInfo::default()
        };
        assert_eq!(info.effective_volume_liters(), 48_000.0);
    }

    #[test]
    fn test_effective_volume_undefined_is_zero() {
        assert_eq!(PoolInfo::default().effective_volume_liters(), 0.0);
    }
}
