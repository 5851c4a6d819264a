//! Filesystem-backed store: one JSONL file per sheet
//!
//! Layout under the data directory:
//!   measurements.jsonl   — one `MeasurementRow` per line, append-only
//!   maintenance.jsonl    — one `MaintenanceRow` per line
//!   pool_info.json       — single `PoolInfo` document
//!
//! A missing file reads as empty history, not an error.

use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use poolmon_core::types::{MaintenanceRecord, Measurement};
use tracing::instrument;

use crate::rows::{validate_measurement, MaintenanceRow, MeasurementRow};
use crate::store::{MaintenanceStore, MeasurementStore, PoolInfo, PoolInfoStore};
use crate::{StoreError, StoreResult};

pub struct JsonlStore {
    measurements_file: PathBuf,
    maintenance_file: PathBuf,
    info_file: PathBuf,
}

impl JsonlStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> StoreResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        create_dir_all(&dir)?;
        Ok(Self {
            measurements_file: dir.join("measurements.jsonl"),
            maintenance_file: dir.join("maintenance.jsonl"),
            info_file: dir.join("pool_info.json"),
        })
    }

    fn read_lines(path: &Path) -> StoreResult<Vec<String>> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(content
                .lines()
                .filter(|l| !l.trim().is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn append_line(path: &Path, line: &str) -> StoreResult<()> {
        let mut f = OpenOptions::new().create(true).append(true).open(path)?;
        f.write_all(line.as_bytes())?;
        f.write_all(b"\n")?;
        Ok(())
    }

    fn load_maintenance_rows(&self) -> StoreResult<Vec<MaintenanceRow>> {
        Self::read_lines(&self.maintenance_file)?
            .iter()
            .map(|l| serde_json::from_str(l).map_err(StoreError::from))
            .collect()
    }

    fn write_maintenance_rows(&self, rows: &[MaintenanceRow]) -> StoreResult<()> {
        let mut out = String::new();
        for row in rows {
            out.push_str(&serde_json::to_string(row)?);
            out.push('\n');
        }
        std::fs::write(&self.maintenance_file, out)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl MeasurementStore for JsonlStore {
    #[instrument(skip(self))]
    async fn measurements(&self) -> StoreResult<Vec<Measurement>> {
        let mut out = Vec::new();
        for line in Self::read_lines(&self.measurements_file)? {
            let row: MeasurementRow = serde_json::from_str(&line)?;
            out.push(row.to_measurement()?);
        }
        out.sort_by_key(Measurement::timestamp);
        Ok(out)
    }

    #[instrument(skip(self, measurement))]
    async fn append_measurement(&mut self, measurement: &Measurement) -> StoreResult<()> {
        validate_measurement(measurement)?;
        let row = MeasurementRow::from_measurement(measurement);
        let line = serde_json::to_string(&row)?;
        Self::append_line(&self.measurements_file, &line)?;
        tracing::debug!(date = %measurement.date, time = %measurement.time, "measurement appended");
        Ok(())
    }
}

#[async_trait::async_trait]
impl MaintenanceStore for JsonlStore {
    #[instrument(skip(self))]
    async fn maintenance(&self) -> StoreResult<Vec<MaintenanceRecord>> {
        self.load_maintenance_rows()?
            .iter()
            .map(MaintenanceRow::to_record)
            .collect()
    }

    #[instrument(skip(self, record))]
    async fn append_maintenance(&mut self, record: &MaintenanceRecord) -> StoreResult<()> {
        let row = MaintenanceRow::from_record(record);
        let line = serde_json::to_string(&row)?;
        Self::append_line(&self.maintenance_file, &line)?;
        tracing::debug!(kind = %record.kind, "maintenance record appended");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear_reminder(&mut self, kind: &str, due: NaiveDate) -> StoreResult<bool> {
        let due_str = due.format(crate::rows::DATE_FORMAT).to_string();
        let mut rows = self.load_maintenance_rows()?;
        let Some(row) = rows
            .iter_mut()
            .find(|r| r.kind == kind && r.next_due == due_str)
        else {
            return Ok(false);
        };
        row.next_due.clear();
        self.write_maintenance_rows(&rows)?;
        tracing::debug!(kind, due = %due, "reminder cleared");
        Ok(true)
    }
}

#[async_trait::async_trait]
impl PoolInfoStore for JsonlStore {
    async fn pool_info(&self) -> StoreResult<PoolInfo> {
        match std::fs::read_to_string(&self.info_file) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(PoolInfo::default()),
            Err(e) => Err(e.into()),
        }
    }

    async fn update_pool_info(&mut self, info: &PoolInfo) -> StoreResult<()> {
        let content = serde_json::to_string_pretty(info)?;
        std::fs::write(&self.info_file, content)?;
        Ok(())
    }
}
