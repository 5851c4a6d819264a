//! In-memory store for tests and demos

use chrono::NaiveDate;
use poolmon_core::types::{MaintenanceRecord, Measurement};

use crate::rows::validate_measurement;
use crate::store::{MaintenanceStore, MeasurementStore, PoolInfo, PoolInfoStore};
use crate::StoreResult;

/// Volatile backend holding everything in plain vectors.
#[derive(Debug, Default)]
pub struct MemoryStore {
    measurements: Vec<Measurement>,
    maintenance: Vec<MaintenanceRecord>,
    info: PoolInfo,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populated store, convenient in tests.
    pub fn with_data(
        measurements: Vec<Measurement>,
        maintenance: Vec<MaintenanceRecord>,
        info: PoolInfo,
    ) -> Self {
        Self {
            measurements,
            maintenance,
            info,
        }
    }
}

#[async_trait::async_trait]
impl MeasurementStore for MemoryStore {
    async fn measurements(&self) -> StoreResult<Vec<Measurement>> {
        let mut out = self.measurements.clone();
        out.sort_by_key(Measurement::timestamp);
        Ok(out)
    }

    async fn append_measurement(&mut self, measurement: &Measurement) -> StoreResult<()> {
        validate_measurement(measurement)?;
        self.measurements.push(measurement.clone());
        Ok(())
    }
}

#[async_trait::async_trait]
impl MaintenanceStore for MemoryStore {
    async fn maintenance(&self) -> StoreResult<Vec<MaintenanceRecord>> {
        Ok(self.maintenance.clone())
    }

    async fn append_maintenance(&mut self, record: &MaintenanceRecord) -> StoreResult<()> {
        self.maintenance.push(record.clone());
        Ok(())
    }

    async fn clear_reminder(&mut self, kind: &str, due: NaiveDate) -> StoreResult<bool> {
        for record in &mut self.maintenance {
            if record.kind == kind && record.next_due == Some(due) {
                record.next_due = None;
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait::async_trait]
impl PoolInfoStore for MemoryStore {
    async fn pool_info(&self) -> StoreResult<PoolInfo> {
        Ok(self.info.clone())
    }

    async fn update_pool_info(&mut self, info: &PoolInfo) -> StoreResult<()> {
        self.info = info.clone();
        Ok(())
    }
}
